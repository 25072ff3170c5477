//! Session loop
//!
//! Drives the wake-then-command cycle:
//!
//! ```text
//! AwaitingWake ──wake phrase──▶ AwaitingCommand ──command / nothing──▶ AwaitingWake
//!      │                              │
//!      └──── emergency stop, Terminate, interrupt or fault ────▶ Terminated
//! ```
//!
//! The state value is owned by the loop and handed from step to step.

use chrono::Timelike;
use tokio::sync::mpsc;

use crate::config::ListenConfig;
use crate::dispatch::{ActionOutcome, Command, Dispatcher};
use crate::gate::{Heard, ListeningGate, Utterance};
use crate::services::{Collaborators, ListenWindow};

const WAKE_REPLY: &str = "Yes, I am listening. How can I help?";
const RETRY_REPLY: &str = "I didn't catch that. Please say again.";
const EMERGENCY_REPLY: &str = "Shutting down. Bye.";
const INTERRUPT_REPLY: &str = "Interrupted by user. Exiting.";
const FAULT_REPLY: &str = "An error occurred. Check the console for details.";

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The user asked to quit
    Farewell,
    /// An emergency-stop phrase was heard
    EmergencyStop,
    /// Interrupted from the terminal
    Interrupted,
    /// An unexpected failure stopped the loop
    Fault,
}

impl Termination {
    /// Whether the process should exit successfully; a fault exits with status 1
    #[must_use]
    pub const fn is_graceful(self) -> bool {
        !matches!(self, Self::Fault)
    }
}

/// Where the session is in the wake/command cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Passively listening for a wake phrase
    AwaitingWake,
    /// Woken; the next utterance is a command
    AwaitingCommand,
    /// Finished; stepping further changes nothing
    Terminated(Termination),
}

/// One assistant session over a set of collaborators
pub struct Session {
    gate: ListeningGate,
    dispatcher: Dispatcher,
    listen: ListenConfig,
    services: Collaborators,
}

impl Session {
    /// Create a session
    #[must_use]
    pub const fn new(
        gate: ListeningGate,
        dispatcher: Dispatcher,
        listen: ListenConfig,
        services: Collaborators,
    ) -> Self {
        Self {
            gate,
            dispatcher,
            listen,
            services,
        }
    }

    /// Greet, then run cycles until a terminal state
    ///
    /// A message on `shutdown` abandons the cycle in flight.
    pub async fn run(&mut self, shutdown: &mut mpsc::Receiver<()>) -> Termination {
        self.greet().await;

        let mut state = SessionState::AwaitingWake;
        loop {
            let next = tokio::select! {
                biased;
                Some(()) = shutdown.recv() => None,
                next = self.step(state) => Some(next),
            };

            let Some(next) = next else {
                tracing::info!("interrupted");
                self.services.speech.speak(INTERRUPT_REPLY).await;
                return Termination::Interrupted;
            };

            if let SessionState::Terminated(reason) = next {
                tracing::info!(?reason, "session ended");
                return reason;
            }
            state = next;
        }
    }

    /// Advance the state machine by one listen
    pub async fn step(&mut self, state: SessionState) -> SessionState {
        match state {
            SessionState::AwaitingWake => self.await_wake().await,
            SessionState::AwaitingCommand => self.await_command().await,
            SessionState::Terminated(reason) => SessionState::Terminated(reason),
        }
    }

    /// Speak a time-of-day greeting and how to wake the assistant
    pub async fn greet(&mut self) {
        let salutation = match self.services.clock.now().hour() {
            h if h < 12 => "Good morning!",
            h if h < 18 => "Good afternoon!",
            _ => "Good evening!",
        };
        self.services.speech.speak(salutation).await;

        let intro = format!(
            "I am your assistant. Say '{}' to activate me.",
            self.gate.primary_wake_phrase()
        );
        self.services.speech.speak(&intro).await;
    }

    async fn await_wake(&mut self) -> SessionState {
        match self.hear(self.listen.wake).await {
            Heard::Nothing => SessionState::AwaitingWake,
            Heard::EmergencyStop => self.emergency_stop().await,
            Heard::Utterance(u) if self.gate.is_wake(&u) => {
                tracing::info!(utterance = %u, "wake phrase detected");
                self.services.speech.speak(WAKE_REPLY).await;
                SessionState::AwaitingCommand
            }
            Heard::Utterance(u) => {
                tracing::debug!(utterance = %u, "ignoring ambient speech");
                SessionState::AwaitingWake
            }
        }
    }

    async fn await_command(&mut self) -> SessionState {
        match self.hear(self.listen.command).await {
            Heard::Nothing => {
                self.services.speech.speak(RETRY_REPLY).await;
                SessionState::AwaitingWake
            }
            Heard::EmergencyStop => self.emergency_stop().await,
            Heard::Utterance(u) => self.handle_command(u).await,
        }
    }

    async fn handle_command(&mut self, utterance: Utterance) -> SessionState {
        let mut command = Command::new(utterance);

        if let Some(follow_up) = command.pending_follow_up() {
            if let Some(announcement) = follow_up.announcement {
                self.services.speech.speak(announcement).await;
            }
            self.services.speech.speak(follow_up.prompt).await;
            let text = match self.hear(self.listen.follow_up).await {
                Heard::Nothing => String::new(),
                Heard::EmergencyStop => return self.emergency_stop().await,
                Heard::Utterance(u) => u.into_string(),
            };
            command = command.with_follow_up(text);
        }

        self.execute(&command).await
    }

    /// Run a classified command and pick the next state
    ///
    /// A dispatcher error is a fault: it is logged, apologized for and
    /// ends the session.
    pub async fn execute(&mut self, command: &Command) -> SessionState {
        match self.dispatcher.dispatch(&command, &mut self.services).await {
            Ok(ActionOutcome::Continue) => SessionState::AwaitingWake,
            Ok(ActionOutcome::Terminate) => SessionState::Terminated(Termination::Farewell),
            Err(e) => {
                tracing::error!(error = %e, command = ?command, "command failed, stopping");
                self.services.speech.speak(FAULT_REPLY).await;
                SessionState::Terminated(Termination::Fault)
            }
        }
    }

    async fn emergency_stop(&mut self) -> SessionState {
        self.services.speech.speak(EMERGENCY_REPLY).await;
        SessionState::Terminated(Termination::EmergencyStop)
    }

    async fn hear(&mut self, window: ListenWindow) -> Heard {
        let services = &mut self.services;
        self.gate
            .listen(services.input.as_mut(), services.speech.as_mut(), window)
            .await
    }
}
