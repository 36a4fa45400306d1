//! Error types for FlintKV
//!
//! Every fallible operation in the crate returns [`Error`]. The `Display`
//! output of each variant doubles as its wire token: front-ends send it
//! to clients verbatim, so the strings must stay stable across releases.
//!
//! A command that fails never leaves a partial mutation behind. All
//! validation happens before the keyspace is touched.

use thiserror::Error;

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for keyspace commands and the command front-end.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Keyspace errors
    // -------------------------------------------------------------------------
    /// The key exists but holds a type the command cannot operate on.
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    /// The command requires an existing key.
    #[error("ERR no such key")]
    MissingKey,

    /// The glob pattern handed to KEYS could not be compiled.
    #[error("ERR invalid pattern: {0}")]
    InvalidPattern(String),

    /// RENAMENX target is already bound.
    #[error("ERR target key name is busy")]
    NameTaken,

    // -------------------------------------------------------------------------
    // Value errors
    // -------------------------------------------------------------------------
    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,

    #[error("ERR value is not a valid float")]
    NotAFloat,

    #[error("ERR increment or decrement would overflow")]
    Overflow,

    #[error("ERR index out of range")]
    IndexOutOfRange,

    // -------------------------------------------------------------------------
    // Command front-end errors
    // -------------------------------------------------------------------------
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),

    #[error("ERR syntax error")]
    Syntax,

    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    #[error("ERR invalid expire time in '{0}' command")]
    InvalidExpireTime(String),

    #[error("ERR unbalanced quotes in request")]
    UnbalancedQuotes,
}

impl Error {
    /// Short classification used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::WrongType => "wrong-type",
            Error::MissingKey => "missing-key",
            Error::InvalidPattern(_) => "invalid-pattern",
            Error::NameTaken => "name-taken",
            Error::NotAnInteger | Error::NotAFloat | Error::Overflow => "invalid-value",
            Error::IndexOutOfRange => "out-of-range",
            Error::WrongArity(_)
            | Error::Syntax
            | Error::UnknownCommand(_)
            | Error::InvalidExpireTime(_)
            | Error::UnbalancedQuotes => "bad-request",
        }
    }
}
