//! Intent classification
//!
//! A command is classified by walking `RULES` in order and taking the first
//! rule with a keyword contained in the text. Position in the list is the
//! only tie-breaker.

use crate::gate::Utterance;

/// A site with a fixed address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownSite {
    /// Spoken name
    pub name: &'static str,
    /// Host without the `www.` prefix
    pub host: &'static str,
}

/// Google's home page
pub const GOOGLE: WellKnownSite = WellKnownSite {
    name: "Google",
    host: "google.com",
};

/// Which site an `OpenSite` intent targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteTarget {
    /// A site with a fixed address
    WellKnown(WellKnownSite),
    /// A host parsed from the words after "open"
    Arbitrary,
}

/// What a command asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Encyclopedia summary
    Lookup,
    /// Media search on YouTube
    PlayMedia,
    /// Open a web page
    OpenSite(SiteTarget),
    /// Say the current time
    QueryTime,
    /// Tell a joke
    Joke,
    /// Speak typed text
    Dictate,
    /// Say goodbye and stop
    Terminate,
    /// Nothing matched
    Unrecognized,
}

/// One classification rule: any keyword contained in the text selects `intent`
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub keywords: &'static [&'static str],
    pub intent: Intent,
}

impl Rule {
    /// Check whether any keyword occurs in `text`
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
    }
}

/// Keyword that selects `Lookup` and is stripped from the search subject
pub const LOOKUP_KEYWORD: &str = "wikipedia";

/// Spoken when a lookup starts, ahead of any follow-up prompt
pub const LOOKUP_ANNOUNCEMENT: &str = "Searching Wikipedia...";

/// Classification rules in priority order
pub const RULES: &[Rule] = &[
    Rule {
        keywords: &[LOOKUP_KEYWORD],
        intent: Intent::Lookup,
    },
    Rule {
        keywords: &["open youtube", "play youtube"],
        intent: Intent::PlayMedia,
    },
    Rule {
        keywords: &["open google"],
        intent: Intent::OpenSite(SiteTarget::WellKnown(GOOGLE)),
    },
    Rule {
        keywords: &["time"],
        intent: Intent::QueryTime,
    },
    Rule {
        keywords: &["joke"],
        intent: Intent::Joke,
    },
    Rule {
        keywords: &["type", "text to speech"],
        intent: Intent::Dictate,
    },
    Rule {
        keywords: &["quit", "exit", "stop"],
        intent: Intent::Terminate,
    },
    Rule {
        keywords: &["open"],
        intent: Intent::OpenSite(SiteTarget::Arbitrary),
    },
];

/// Classify command text; first matching rule wins
#[must_use]
pub fn classify(text: &str) -> Intent {
    RULES
        .iter()
        .find(|rule| rule.matches(text))
        .map_or(Intent::Unrecognized, |rule| rule.intent)
}

/// Search subject left after removing the lookup keyword
#[must_use]
pub fn lookup_subject(text: &str) -> String {
    text.replace(LOOKUP_KEYWORD, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A second listen an intent needs before it can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUp {
    /// Said before the prompt
    pub announcement: Option<&'static str>,
    /// What to ask the user
    pub prompt: &'static str,
}

impl Intent {
    /// The extra text this intent needs for `utterance`, if any
    #[must_use]
    pub fn follow_up(self, utterance: &Utterance) -> Option<FollowUp> {
        match self {
            Self::Lookup if lookup_subject(utterance.as_str()).is_empty() => Some(FollowUp {
                announcement: Some(LOOKUP_ANNOUNCEMENT),
                prompt: "What should I search on Wikipedia?",
            }),
            Self::PlayMedia => Some(FollowUp {
                announcement: None,
                prompt: "What should I play on YouTube?",
            }),
            _ => None,
        }
    }
}
