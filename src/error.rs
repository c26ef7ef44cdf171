use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// ConfigError
///
/// Startup-time failures. Any of these aborts the process before the listener is
/// bound, so a partially valid rule table is never served.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("access rule pattern must not be empty")]
    EmptyPattern,

    #[error("access rule pattern `{0}` must start with `/`")]
    NotAbsolute(String),

    #[error("access rule pattern `{0}` contains more than one wildcard")]
    MultipleWildcards(String),

    #[error("access rule pattern `{0}` may only use `*` as its final segment")]
    MisplacedWildcard(String),

    #[error("access rule pattern `{pattern}` is listed twice with different requirements")]
    ConflictingRule { pattern: String },

    #[error("environment variable {0} must be set")]
    MissingVar(&'static str),

    #[error("environment variable {name} has an invalid value `{value}`")]
    InvalidVar { name: &'static str, value: String },

    #[error("failed to read access rules file `{}`", path.display())]
    RulesFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("access rules file is not valid JSON: {0}")]
    RulesParse(#[from] serde_json::Error),
}

/// AuthError
///
/// Raised by the authenticator and the password encoder. The front end never
/// surfaces these directly: a caller whose credentials fail to resolve is treated
/// as anonymous and the rule engine decides what that means for the path.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed credentials: {0}")]
    MalformedCredentials(String),

    #[error("unsupported authorization scheme `{0}`")]
    UnsupportedScheme(String),

    #[error("bearer token is invalid")]
    InvalidToken,

    #[error("bearer token has expired")]
    ExpiredToken,

    #[error("token subject {0} is not a known user")]
    UnknownSubject(Uuid),

    #[error("bad username or password")]
    BadCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}
