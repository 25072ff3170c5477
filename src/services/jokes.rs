//! Built-in joke provider

use rand::seq::SliceRandom;

use super::JokeProvider;

const JOKES: &[&str] = &[
    "There are only 10 kinds of people in this world: those who know binary and those who don't.",
    "A SQL query goes into a bar, walks up to two tables and asks, can I join you?",
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "I would tell you a UDP joke, but you might not get it.",
    "Debugging is like being the detective in a crime movie where you are also the murderer.",
    "Why did the programmer quit his job? Because he didn't get arrays.",
    "Knock knock. Race condition. Who's there?",
    "The best thing about a boolean is that even if you are wrong, you are only off by a bit.",
    "To understand recursion you must first understand recursion.",
];

/// Picks a random programmer joke
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgrammerJokes;

impl JokeProvider for ProgrammerJokes {
    fn joke(&self) -> String {
        JOKES
            .choose(&mut rand::thread_rng())
            .map_or_else(String::new, ToString::to_string)
    }
}
