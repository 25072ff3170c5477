//! Fallback site parsing for "open <site>" commands

use thiserror::Error;

/// Top-level domain appended when the site has no dot
const DEFAULT_TLD: &str = ".com";

/// Why no site could be taken from a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SiteParseError {
    /// The command has no standalone "open" word
    #[error("command has no \"open\" word")]
    MissingOpen,
    /// "open" is the last word
    #[error("no site follows \"open\"")]
    MissingSite,
}

/// Take the word after "open" as the site name, adding `.com` if it has no dot
///
/// # Errors
///
/// Returns error if there is no "open" word or nothing follows it
pub fn parse_site(command: &str) -> Result<String, SiteParseError> {
    let mut tokens = command.split_whitespace();
    tokens
        .position(|t| t == "open")
        .ok_or(SiteParseError::MissingOpen)?;

    let site = tokens.next().ok_or(SiteParseError::MissingSite)?;
    if site.contains('.') {
        Ok(site.to_string())
    } else {
        Ok(format!("{site}{DEFAULT_TLD}"))
    }
}

/// Secure URL for a bare host
#[must_use]
pub fn site_url(site: &str) -> String {
    format!("https://{site}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tld_appended_once() {
        assert_eq!(parse_site("please open github").unwrap(), "github.com");
        assert_eq!(site_url(&parse_site("please open github").unwrap()), "https://github.com");
    }

    #[test]
    fn test_dotted_site_kept() {
        assert_eq!(parse_site("open docs.rs please").unwrap(), "docs.rs");
        assert_eq!(parse_site("open github.com").unwrap(), "github.com");
    }

    #[test]
    fn test_missing_site() {
        assert_eq!(parse_site("please open"), Err(SiteParseError::MissingSite));
    }

    #[test]
    fn test_open_inside_word() {
        assert_eq!(parse_site("reopen the tab"), Err(SiteParseError::MissingOpen));
    }

    #[test]
    fn test_spoken_dot_is_literal() {
        assert_eq!(parse_site("open site dot org").unwrap(), "site.com");
    }
}
