//! Wikipedia summaries
//!
//! Resolves a spoken subject to the best matching article title with the
//! opensearch API, then fetches the article's lead extract from the REST
//! summary endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::Encyclopedia;
use crate::{Error, Result};

/// Response from the REST page summary endpoint
#[derive(Deserialize)]
struct SummaryResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    extract: String,
}

/// Opensearch response: `[query, titles, descriptions, urls]`
type OpenSearchResponse = (String, Vec<String>, Vec<String>, Vec<String>);

/// Wikipedia lookup client
pub struct WikipediaClient {
    client: Client,
    base_url: String,
}

impl WikipediaClient {
    /// Create a client for a Wikipedia site (e.g. `https://en.wikipedia.org`)
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("hark/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Find the article title that best matches `query`
    async fn resolve_title(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/w/api.php", self.base_url))
            .query(&[
                ("action", "opensearch"),
                ("search", query),
                ("limit", "1"),
                ("namespace", "0"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Lookup(format!("search failed with {status}")));
        }

        let body = response.text().await?;
        let (_, titles, _, _): OpenSearchResponse = serde_json::from_str(&body)?;

        titles
            .into_iter()
            .next()
            .ok_or_else(|| Error::Lookup(format!("no article matches \"{query}\"")))
    }

    /// Fetch the lead extract of an article
    async fn fetch_extract(&self, title: &str) -> Result<String> {
        let slug = urlencoding::encode(&title.replace(' ', "_")).into_owned();
        let response = self
            .client
            .get(format!("{}/api/rest_v1/page/summary/{slug}", self.base_url))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(Error::Lookup(format!("no article titled \"{title}\"")));
            }
            status if !status.is_success() => {
                return Err(Error::Lookup(format!("summary failed with {status}")));
            }
            _ => {}
        }

        let summary: SummaryResponse = response.json().await?;
        if summary.kind == "disambiguation" {
            return Err(Error::Lookup(format!("\"{title}\" is ambiguous")));
        }
        if summary.extract.trim().is_empty() {
            return Err(Error::Lookup(format!("\"{title}\" has no summary")));
        }

        Ok(summary.extract)
    }
}

#[async_trait(?Send)]
impl Encyclopedia for WikipediaClient {
    async fn summarize(&self, query: &str, max_sentences: usize) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Lookup("empty query".to_string()));
        }

        let title = self.resolve_title(query).await?;
        tracing::debug!(query, title, "resolved article");

        let extract = self.fetch_extract(&title).await?;
        Ok(first_sentences(&extract, max_sentences))
    }
}

/// Keep the first `count` sentences of `text`
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text.
#[must_use]
pub fn first_sentences(text: &str, count: usize) -> String {
    let text = text.trim();
    if count == 0 {
        return String::new();
    }

    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
        if at_boundary {
            seen += 1;
            if seen == count {
                return text[..idx + c.len_utf8()].to_string();
            }
        }
    }

    text.to_string()
}
