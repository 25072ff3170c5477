//! Scripted collaborators for driving a session without audio hardware

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::NaiveTime;
use hark::config::ListenConfig;
use hark::services::{
    AudioInput, Capture, Clock, Collaborators, Encyclopedia, JokeProvider, ListenWindow,
    PageLauncher, SpeechOutput, TextInput,
};
use hark::voice::WakeWordDetector;
use hark::{Dispatcher, Error, ListeningGate, Session};

pub const JOKE: &str = "Why do programmers prefer dark mode? Because light attracts bugs.";

type Shared<T> = Rc<RefCell<Vec<T>>>;

/// Plays back a fixed list of capture results
struct ScriptedInput {
    script: VecDeque<Capture>,
    windows: Shared<ListenWindow>,
}

#[async_trait(?Send)]
impl AudioInput for ScriptedInput {
    async fn capture(&mut self, window: ListenWindow) -> Capture {
        self.windows.borrow_mut().push(window);
        self.script
            .pop_front()
            .expect("session listened more often than scripted")
    }
}

struct RecordingSpeech {
    spoken: Shared<String>,
}

#[async_trait(?Send)]
impl SpeechOutput for RecordingSpeech {
    async fn speak(&mut self, text: &str) {
        self.spoken.borrow_mut().push(text.to_string());
    }
}

/// Knows one article; empty and unknown subjects fail like a real lookup
struct FakeEncyclopedia {
    queries: Shared<String>,
}

#[async_trait(?Send)]
impl Encyclopedia for FakeEncyclopedia {
    async fn summarize(&self, query: &str, max_sentences: usize) -> hark::Result<String> {
        self.queries.borrow_mut().push(query.to_string());
        if query.trim().is_empty() || query.contains("nonexistent") {
            return Err(Error::Lookup(format!("no article for \"{query}\"")));
        }
        Ok(format!("Summary of {query} in {max_sentences} sentences."))
    }
}

struct RecordingLauncher {
    opened: Shared<String>,
}

impl PageLauncher for RecordingLauncher {
    fn open(&self, url: &str) {
        self.opened.borrow_mut().push(url.to_string());
    }
}

struct FixedJoke;

impl JokeProvider for FixedJoke {
    fn joke(&self) -> String {
        JOKE.to_string()
    }
}

/// Typed line results: `Ok(Some)` line, `Ok(None)` end of input, `Err` read failure
struct ScriptedText {
    lines: VecDeque<Result<Option<String>, String>>,
    prompts: Shared<String>,
}

#[async_trait(?Send)]
impl TextInput for ScriptedText {
    async fn read_line(&mut self, prompt: &str) -> hark::Result<Option<String>> {
        self.prompts.borrow_mut().push(prompt.to_string());
        match self.lines.pop_front() {
            Some(Ok(line)) => Ok(line),
            Some(Err(e)) => Err(Error::Input(e)),
            None => Ok(None),
        }
    }
}

/// Typing that never finishes
struct StalledText {
    prompts: Shared<String>,
}

#[async_trait(?Send)]
impl TextInput for StalledText {
    async fn read_line(&mut self, prompt: &str) -> hark::Result<Option<String>> {
        self.prompts.borrow_mut().push(prompt.to_string());
        std::future::pending().await
    }
}

struct FixedClock(NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

/// What the collaborators observed
#[derive(Default)]
pub struct Probes {
    pub spoken: Shared<String>,
    pub opened: Shared<String>,
    pub queries: Shared<String>,
    pub windows: Shared<ListenWindow>,
    pub prompts: Shared<String>,
}

impl Probes {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.borrow().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }

    pub fn windows(&self) -> Vec<ListenWindow> {
        self.windows.borrow().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn said(&self, text: &str) -> bool {
        self.spoken.borrow().iter().any(|s| s == text)
    }
}

/// Builds a session over scripted collaborators
pub struct TestBed {
    captures: Vec<Capture>,
    typed: Vec<Result<Option<String>, String>>,
    stalled_typing: bool,
    time: NaiveTime,
    listen: ListenConfig,
}

impl TestBed {
    pub fn new() -> Self {
        Self {
            captures: Vec::new(),
            typed: Vec::new(),
            stalled_typing: false,
            time: NaiveTime::from_hms_opt(14, 5, 0).unwrap(),
            listen: ListenConfig::default(),
        }
    }

    /// Recognized phrases, in order
    pub fn heard<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.captures
            .extend(phrases.into_iter().map(|p| Capture::Recognized(p.into())));
        self
    }

    /// One raw capture result
    pub fn capture(mut self, capture: Capture) -> Self {
        self.captures.push(capture);
        self
    }

    /// One typed line for dictation
    pub fn typed(mut self, line: Result<Option<String>, String>) -> Self {
        self.typed.push(line);
        self
    }

    /// Typed input that blocks forever once read
    pub fn stalled_typing(mut self) -> Self {
        self.stalled_typing = true;
        self
    }

    pub fn at(mut self, hour: u32, minute: u32) -> Self {
        self.time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        self
    }

    pub fn collaborators(self) -> (Collaborators, Probes) {
        let probes = Probes::default();
        let services = Collaborators {
            input: Box::new(ScriptedInput {
                script: self.captures.into(),
                windows: Rc::clone(&probes.windows),
            }),
            speech: Box::new(RecordingSpeech {
                spoken: Rc::clone(&probes.spoken),
            }),
            encyclopedia: Box::new(FakeEncyclopedia {
                queries: Rc::clone(&probes.queries),
            }),
            launcher: Box::new(RecordingLauncher {
                opened: Rc::clone(&probes.opened),
            }),
            jokes: Box::new(FixedJoke),
            text_input: if self.stalled_typing {
                Box::new(StalledText {
                    prompts: Rc::clone(&probes.prompts),
                })
            } else {
                Box::new(ScriptedText {
                    lines: self.typed.into(),
                    prompts: Rc::clone(&probes.prompts),
                })
            },
            clock: Box::new(FixedClock(self.time)),
        };
        (services, probes)
    }

    pub fn build(self) -> (Session, Probes) {
        let listen = self.listen;
        let detector =
            WakeWordDetector::new(vec!["hello python".to_string(), "hey python".to_string()])
                .unwrap();
        let (services, probes) = self.collaborators();
        let session = Session::new(
            ListeningGate::new(detector),
            Dispatcher::default(),
            listen,
            services,
        );
        (session, probes)
    }
}
