//! Error types for template conversion
//!
//! Parse failures are typed with thiserror so callers and tests can match
//! on them; inference failures wrap the client's anyhow chain.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// 1-based position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

impl From<serde_yaml::Location> for Location {
    fn from(location: serde_yaml::Location) -> Self {
        Self {
            line: location.line(),
            column: location.column(),
        }
    }
}

/// Template parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Syntax error{}: {message}", at(.location))]
    Syntax {
        message: String,
        location: Option<Location>,
    },

    #[error("Unknown tag '!{tag}'{}", at(.location))]
    UnknownTag {
        tag: String,
        location: Option<Location>,
    },

    #[error("Invalid payload for '!{tag}': expected {expected}, found {found}")]
    InvalidPayload {
        tag: String,
        expected: &'static str,
        found: &'static str,
    },
}

fn at(location: &Option<Location>) -> String {
    location.map(|l| format!(" at {}", l)).unwrap_or_default()
}

impl From<serde_yaml::Error> for ParseError {
    fn from(error: serde_yaml::Error) -> Self {
        ParseError::Syntax {
            location: error.location().map(Location::from),
            message: error.to_string(),
        }
    }
}

/// Main error type for a conversion run
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{provider} inference failed for model {model}")]
    Inference {
        provider: String,
        model: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}
