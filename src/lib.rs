//! Hark - Wake-phrase voice command dispatcher
//!
//! Listens for a wake phrase, then classifies one spoken command into a
//! fixed set of intents and runs it:
//! - Listening gate (silence, recognition failures, wake and emergency stop)
//! - Ordered keyword classification with a fallback "open <site>" parser
//! - Actions delegated to collaborators (Wikipedia, browser, jokes, typed text)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      Session                         │
//! │   AwaitingWake → AwaitingCommand → AwaitingWake      │
//! └───────────┬───────────────────────────┬──────────────┘
//!             │                           │
//! ┌───────────▼───────────┐   ┌───────────▼──────────────┐
//! │    Listening Gate     │   │    Command Dispatcher    │
//! │  wake / stop / retry  │   │   RULES → Intent → act   │
//! └───────────┬───────────┘   └───────────┬──────────────┘
//!             │                           │
//! ┌───────────▼───────────────────────────▼──────────────┐
//! │                   Collaborators                      │
//! │  Mic+STT │ TTS │ Wikipedia │ Browser │ Jokes │ Stdin │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod services;
pub mod session;
pub mod voice;

pub use config::Config;
pub use dispatch::{ActionOutcome, Command, Dispatcher, Intent, SiteTarget, classify};
pub use error::{Error, Result};
pub use gate::{Heard, ListeningGate, Utterance};
pub use services::{Capture, Collaborators, ListenWindow};
pub use session::{Session, SessionState, Termination};
