//! Collaborator contracts
//!
//! The session only talks to the outside world through these traits:
//! audio input, speech output, encyclopedia lookup, page launching, jokes,
//! typed text and the clock. Every call is awaited to completion before the
//! next one starts, so none of them need to be `Send`.

mod browser;
mod console;
mod jokes;
mod wikipedia;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveTime;

pub use browser::{SystemBrowser, open_url};
pub use console::ConsoleTextInput;
pub use jokes::ProgrammerJokes;
pub use wikipedia::{WikipediaClient, first_sentences};

use crate::Result;

/// Bounds for one listen request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenWindow {
    /// How long to wait for speech to start
    pub timeout: Duration,

    /// Longest phrase accepted once speech started
    pub phrase_limit: Duration,
}

impl ListenWindow {
    /// Create a window from whole seconds
    #[must_use]
    pub const fn from_secs(timeout: u64, phrase_limit: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout),
            phrase_limit: Duration::from_secs(phrase_limit),
        }
    }
}

/// Outcome of one recognition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Speech was recognized
    Recognized(String),
    /// Nothing was said before the timeout
    NoSpeech,
    /// Something was said but could not be understood
    Inaudible,
    /// The recognition backend failed
    ChannelError(String),
}

/// Source of recognized speech
#[async_trait(?Send)]
pub trait AudioInput {
    /// Capture and recognize one utterance within `window`
    async fn capture(&mut self, window: ListenWindow) -> Capture;
}

/// Spoken output; resolves once the text has been rendered
#[async_trait(?Send)]
pub trait SpeechOutput {
    /// Speak `text`, best effort
    async fn speak(&mut self, text: &str);
}

/// Encyclopedia summaries
#[async_trait(?Send)]
pub trait Encyclopedia {
    /// Summarize `query` in at most `max_sentences` sentences
    ///
    /// # Errors
    ///
    /// Returns error for unknown or ambiguous subjects and transport failures
    async fn summarize(&self, query: &str, max_sentences: usize) -> Result<String>;
}

/// Opens pages in an external browser without waiting for them
pub trait PageLauncher {
    /// Open `url`
    fn open(&self, url: &str);
}

/// Joke source
pub trait JokeProvider {
    /// Return one joke
    fn joke(&self) -> String;
}

/// Synchronous, non-voice line input
#[async_trait(?Send)]
pub trait TextInput {
    /// Show `prompt` and read one line; `None` at end of input
    ///
    /// # Errors
    ///
    /// Returns error if the input channel cannot be read
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Wall clock used for greetings and time queries
pub trait Clock {
    /// Current local time of day
    fn now(&self) -> NaiveTime;
}

/// Local system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        chrono::Local::now().time()
    }
}

/// Handles to every collaborator, owned by the session
pub struct Collaborators {
    pub input: Box<dyn AudioInput>,
    pub speech: Box<dyn SpeechOutput>,
    pub encyclopedia: Box<dyn Encyclopedia>,
    pub launcher: Box<dyn PageLauncher>,
    pub jokes: Box<dyn JokeProvider>,
    pub text_input: Box<dyn TextInput>,
    pub clock: Box<dyn Clock>,
}
