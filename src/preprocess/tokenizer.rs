/*! Tokenizers

Sentences are turned into whitespace-free tokens before being fed to a language model.

- [Words] splits on Unicode word boundaries.
- [Characters] yields one token per character, spaces becoming [SPACE].
- [External] pipes sentences through a long-lived external tokenizer, one line at a time.
!*/
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use log::{debug, error, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Error;

/// Token standing for a space in character-level models.
pub const SPACE: &str = "SPACE";

pub trait Tokenize {
    /// Split a normalized sentence into tokens. Tokens never contain whitespace.
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, Error>;
}

/// Unicode word-boundary tokenizer (UAX #29).
#[derive(Debug, Default, Clone, Copy)]
pub struct Words;

impl Tokenize for Words {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, Error> {
        Ok(sentence
            .split_word_bounds()
            .filter(|segment| !segment.trim().is_empty())
            .map(String::from)
            .collect())
    }
}

/// Character-level tokenizer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Characters;

impl Tokenize for Characters {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, Error> {
        Ok(sentence
            .chars()
            .map(|c| {
                if c.is_whitespace() {
                    SPACE.to_string()
                } else {
                    c.to_string()
                }
            })
            .collect())
    }
}

struct Process {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<io::Result<String>>,
}

/// Time an external tokenizer gets to answer a line.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// External tokenizer, run through `sh -c`.
///
/// The process is spawned once and kept alive: each call writes one line
/// and waits for one line back. Calls are serialized.
///
/// A tokenizer that does not answer within the timeout (for example because it
/// buffers its output) is killed, and every later call fails.
pub struct External {
    command: String,
    timeout: Duration,
    process: Mutex<Process>,
}

impl External {
    /// Spawn the tokenizer command, with [DEFAULT_TIMEOUT].
    ///
    /// # Errors
    /// Fails if the command cannot be started.
    pub fn spawn(command: &str) -> Result<Self, Error> {
        debug!("spawning tokenizer `{command}`");
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Config(format!("could not start tokenizer `{command}`: {e}")))?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Custom(format!("no stdout for tokenizer `{command}`")))?;

        let (tx, lines) = mpsc::channel();
        thread::spawn(move || {
            let mut stdout = BufReader::new(stdout);
            loop {
                let mut buf = String::new();
                match stdout.read_line(&mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.send(Ok(buf)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        break;
                    }
                }
            }
        });

        Ok(Self {
            command: command.to_string(),
            timeout: DEFAULT_TIMEOUT,
            process: Mutex::new(Process {
                child,
                stdin,
                lines,
            }),
        })
    }

    /// Set the time allowed for each line.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Tokenize for External {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, Error> {
        let mut process = self.process.lock().unwrap_or_else(PoisonError::into_inner);
        let Process {
            child,
            stdin,
            lines,
        } = &mut *process;

        let input = stdin
            .as_mut()
            .ok_or_else(|| Error::Custom(format!("tokenizer `{}` is closed", self.command)))?;

        // one sentence per line
        let line = sentence.replace(['\n', '\r'], " ");
        writeln!(input, "{line}")?;
        input.flush()?;

        match lines.recv_timeout(self.timeout) {
            Ok(buf) => Ok(buf?.split_whitespace().map(String::from).collect()),
            Err(RecvTimeoutError::Timeout) => {
                error!(
                    "tokenizer `{}` did not answer within {:?}, killing it",
                    self.command, self.timeout
                );
                stdin.take();
                if let Err(e) = child.kill() {
                    warn!("could not kill tokenizer `{}`: {e}", self.command);
                }
                Err(Error::Subprocess {
                    command: self.command.clone(),
                    status: child.wait()?,
                    stderr: format!("no output after {:?}", self.timeout),
                })
            }
            Err(RecvTimeoutError::Disconnected) => {
                stdin.take();
                Err(match child.try_wait()? {
                    Some(status) => Error::Subprocess {
                        command: self.command.clone(),
                        status,
                        stderr: String::new(),
                    },
                    None => Error::Custom(format!(
                        "tokenizer `{}` closed its output",
                        self.command
                    )),
                })
            }
        }
    }
}

impl Drop for External {
    fn drop(&mut self) {
        let process = self
            .process
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);

        // closing stdin lets the tokenizer exit by itself
        process.stdin.take();
        if let Err(e) = process.child.wait() {
            warn!("could not wait for tokenizer `{}`: {e}", self.command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words() {
        let tokens = Words.tokenize("Hello, world! It's 3.5 km.").unwrap();
        assert_eq!(
            tokens,
            vec!["Hello", ",", "world", "!", "It's", "3.5", "km", "."]
        );
    }

    #[test]
    fn characters() {
        let tokens = Characters.tokenize("ab c").unwrap();
        assert_eq!(tokens, vec!["a", "b", SPACE, "c"]);
        assert!(Characters.tokenize("").unwrap().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn external() {
        // `tr` alone would buffer its output
        let tokenizer = External::spawn("while IFS= read -r l; do echo \"$l\" | tr ',' ' '; done")
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(tokenizer.tokenize("a,b c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(tokenizer.tokenize("d").unwrap(), vec!["d"]);
    }

    #[test]
    #[cfg(unix)]
    fn external_exits() {
        let tokenizer = External::spawn("true").unwrap_or_else(|e| panic!("{e}"));
        assert!(tokenizer.tokenize("a b").is_err());
    }

    #[test]
    #[cfg(unix)]
    fn external_buffering_times_out() {
        let tokenizer = External::spawn("tr ',' ' '")
            .unwrap_or_else(|e| panic!("{e}"))
            .with_timeout(Duration::from_millis(200));
        let start = std::time::Instant::now();
        assert!(matches!(
            tokenizer.tokenize("a,b c"),
            Err(Error::Subprocess { .. })
        ));
        assert!(start.elapsed() < Duration::from_secs(5));
        // killed, not retried
        assert!(tokenizer.tokenize("d").is_err());
    }
}
