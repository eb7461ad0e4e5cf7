//! Error enum
use std::fmt;
use std::process::ExitStatus;

use oxilangtag::LanguageTagParseError;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Regex(regex::Error),
    FastText(String),
    LanguageTag(LanguageTagParseError),
    /// Missing or invalid model directory, metadata or options.
    Config(String),
    /// An external tool exited with a non-zero status.
    Subprocess {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    /// Language model could not be loaded or queried.
    Model(String),
    Custom(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Yaml(e) => write!(f, "metadata error: {e}"),
            Error::Regex(e) => write!(f, "regex error: {e}"),
            Error::FastText(e) => write!(f, "fasttext error: {e}"),
            Error::LanguageTag(e) => write!(f, "invalid language tag: {e}"),
            Error::Config(e) => write!(f, "configuration error: {e}"),
            Error::Subprocess {
                command,
                status,
                stderr,
            } => write!(f, "`{command}` failed ({status}): {stderr}"),
            Error::Model(e) => write!(f, "language model error: {e}"),
            Error::Custom(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Error {
        Error::Yaml(e)
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Error {
        Error::Regex(e)
    }
}

impl From<LanguageTagParseError> for Error {
    fn from(e: LanguageTagParseError) -> Error {
        Error::LanguageTag(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
