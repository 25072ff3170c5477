//! Command dispatcher
//!
//! Executes one classified command against the collaborators. Collaborator
//! failures are caught here and turned into a spoken apology; the only
//! error this module returns is `Error::Dispatch`, for commands that reach
//! it in an inconsistent state.

mod intent;
mod site;

use chrono::NaiveTime;

pub use intent::{
    FollowUp, GOOGLE, Intent, LOOKUP_ANNOUNCEMENT, LOOKUP_KEYWORD, RULES, Rule, SiteTarget,
    WellKnownSite, classify, lookup_subject,
};
pub use site::{SiteParseError, parse_site, site_url};

use crate::gate::Utterance;
use crate::services::Collaborators;
use crate::{Error, Result};

const HELP_REPLY: &str =
    "I didn't understand that command. Try: wikipedia, open youtube, time, joke, quit.";

/// A command utterance with its intent and any follow-up text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub utterance: Utterance,
    pub intent: Intent,
    /// Text from the follow-up listen; empty when that listen heard nothing
    pub follow_up: Option<String>,
}

impl Command {
    /// Classify an utterance; follow-up text is attached later
    #[must_use]
    pub fn new(utterance: Utterance) -> Self {
        let intent = classify(utterance.as_str());
        Self {
            utterance,
            intent,
            follow_up: None,
        }
    }

    /// Attach the follow-up text
    #[must_use]
    pub fn with_follow_up(mut self, text: String) -> Self {
        self.follow_up = Some(text);
        self
    }

    /// The follow-up this command still needs
    #[must_use]
    pub fn pending_follow_up(&self) -> Option<FollowUp> {
        if self.follow_up.is_some() {
            return None;
        }
        self.intent.follow_up(&self.utterance)
    }

    fn required_follow_up(&self) -> Result<&str> {
        self.follow_up.as_deref().ok_or_else(|| {
            Error::Dispatch(format!(
                "{:?} reached the dispatcher without follow-up text",
                self.intent
            ))
        })
    }
}

/// What the session does after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Go back to waiting for the wake phrase
    Continue,
    /// Stop the session
    Terminate,
}

/// Runs intents against the collaborators
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    lookup_sentences: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Dispatcher {
    /// Create a dispatcher that keeps `lookup_sentences` of each summary
    #[must_use]
    pub const fn new(lookup_sentences: usize) -> Self {
        Self { lookup_sentences }
    }

    /// Execute `command`
    ///
    /// # Errors
    ///
    /// Returns `Error::Dispatch` if an intent that needs follow-up text
    /// arrives without it
    pub async fn dispatch(
        &self,
        command: &Command,
        services: &mut Collaborators,
    ) -> Result<ActionOutcome> {
        tracing::info!(intent = ?command.intent, command = %command.utterance, "dispatching");

        match command.intent {
            Intent::Lookup => self.lookup(command, services).await?,
            Intent::PlayMedia => play_media(command.required_follow_up()?, services).await,
            Intent::OpenSite(SiteTarget::WellKnown(site)) => {
                services.launcher.open(&site_url(&format!("www.{}", site.host)));
                services.speech.speak(&format!("Opening {}", site.name)).await;
            }
            Intent::OpenSite(SiteTarget::Arbitrary) => {
                open_arbitrary(command.utterance.as_str(), services).await;
            }
            Intent::QueryTime => {
                let now = services.clock.now();
                services.speech.speak(&format_time(now)).await;
            }
            Intent::Joke => {
                let joke = services.jokes.joke();
                services.speech.speak(&joke).await;
            }
            Intent::Dictate => dictate(services).await,
            Intent::Terminate => {
                services.speech.speak("Goodbye!").await;
                return Ok(ActionOutcome::Terminate);
            }
            Intent::Unrecognized => services.speech.speak(HELP_REPLY).await,
        }

        Ok(ActionOutcome::Continue)
    }

    async fn lookup(&self, command: &Command, services: &mut Collaborators) -> Result<()> {
        let subject = lookup_subject(command.utterance.as_str());
        let query = if subject.is_empty() {
            // Announced together with the follow-up prompt
            command.required_follow_up()?.to_string()
        } else {
            services.speech.speak(LOOKUP_ANNOUNCEMENT).await;
            subject
        };

        match services
            .encyclopedia
            .summarize(&query, self.lookup_sentences)
            .await
        {
            Ok(summary) => {
                services.speech.speak("According to Wikipedia").await;
                services.speech.speak(&summary).await;
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "wikipedia lookup failed");
                services
                    .speech
                    .speak("Sorry, I couldn't fetch from Wikipedia.")
                    .await;
            }
        }

        Ok(())
    }
}

async fn play_media(query: &str, services: &mut Collaborators) {
    let query = query.trim();
    if query.is_empty() {
        services.speech.speak("No query provided.").await;
        return;
    }

    services.launcher.open(&youtube_search_url(query));
    services
        .speech
        .speak(&format!("Playing {query} on YouTube"))
        .await;
}

async fn open_arbitrary(command: &str, services: &mut Collaborators) {
    match parse_site(command) {
        Ok(site) => {
            services.launcher.open(&site_url(&site));
            services.speech.speak(&format!("Opening {site}")).await;
        }
        Err(e) => {
            tracing::warn!(command, error = %e, "could not parse site");
            services
                .speech
                .speak("Sorry I couldn't open that site.")
                .await;
        }
    }
}

async fn dictate(services: &mut Collaborators) {
    services
        .speech
        .speak("Please type the text you want me to speak. Press Enter when done.")
        .await;

    match services.text_input.read_line("Text to speak: ").await {
        Ok(Some(line)) if !line.trim().is_empty() => {
            services.speech.speak(line.trim()).await;
        }
        Ok(_) => services.speech.speak("No text provided.").await,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read typed text");
            services
                .speech
                .speak("Sorry, I couldn't read that text.")
                .await;
        }
    }
}

/// YouTube search results URL, words joined with `+`
#[must_use]
pub fn youtube_search_url(query: &str) -> String {
    let terms = query
        .split_whitespace()
        .map(|w| urlencoding::encode(w).into_owned())
        .collect::<Vec<_>>()
        .join("+");
    format!("https://www.youtube.com/results?search_query={terms}")
}

/// Spoken time in 12-hour form, e.g. "The time is 02:05 PM"
#[must_use]
pub fn format_time(time: NaiveTime) -> String {
    format!("The time is {}", time.format("%I:%M %p"))
}
