//! Typed text input on the terminal

use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

use super::TextInput;
use crate::{Error, Result};

/// Reads lines from standard input
pub struct ConsoleTextInput {
    reader: BufReader<Stdin>,
}

impl ConsoleTextInput {
    /// Create a reader over the process's stdin
    #[must_use]
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
        }
    }
}

impl Default for ConsoleTextInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl TextInput for ConsoleTextInput {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "{prompt}")?;
            stdout.flush()?;
        }

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| Error::Input(e.to_string()))?;

        if read == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
