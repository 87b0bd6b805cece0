//! Error handling for grammar construction and file input.
//!
//! Tokenization itself never fails: unmatched input becomes `Error` tokens
//! inline with the rest of the stream. Everything here is raised either while
//! a grammar is being built or while reading input from disk.

use crate::grammars::GrammarId;
use thiserror::Error;

/// Unified error type for the crate
#[derive(Error, Debug, Clone)]
pub enum TmlexError {
    /// A state includes itself, directly or through other states
    #[error("cyclic state inclusion in grammar {grammar}: {}", cycle.join(" -> "))]
    CyclicInclusion { grammar: String, cycle: Vec<String> },

    /// A rule, include or root refers to a state the grammar doesn't define
    #[error("grammar {grammar} refers to undefined state '{state}'")]
    UnknownState { grammar: String, state: String },

    /// A rule pattern failed to compile
    #[error("invalid pattern in state '{state}' of grammar {grammar}: {pattern}")]
    InvalidPattern {
        grammar: String,
        state: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A delegating rule names a grammar missing from the delegation table
    #[error("grammar {grammar} delegates to {target} but no handle was registered")]
    UnresolvedDelegate { grammar: String, target: GrammarId },

    /// No grammar is registered under the requested name
    #[error("unknown grammar: {0}")]
    UnknownGrammar(String),

    /// File I/O error
    #[error("file error: {0}")]
    Io(String),
}

/// Flat classification of [`TmlexError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CyclicInclusion,
    UnknownState,
    InvalidPattern,
    UnresolvedDelegate,
    UnknownGrammar,
    Io,
}

impl TmlexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TmlexError::CyclicInclusion { .. } => ErrorKind::CyclicInclusion,
            TmlexError::UnknownState { .. } => ErrorKind::UnknownState,
            TmlexError::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            TmlexError::UnresolvedDelegate { .. } => ErrorKind::UnresolvedDelegate,
            TmlexError::UnknownGrammar(_) => ErrorKind::UnknownGrammar,
            TmlexError::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether this error was raised while building a grammar
    pub fn is_construction_error(&self) -> bool {
        !matches!(self, TmlexError::UnknownGrammar(_) | TmlexError::Io(_))
    }
}

impl From<std::io::Error> for TmlexError {
    fn from(e: std::io::Error) -> Self {
        TmlexError::Io(e.to_string())
    }
}

/// Result type alias
pub type TmlexResult<T> = Result<T, TmlexError>;
