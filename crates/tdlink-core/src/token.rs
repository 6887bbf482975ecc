//! Correlation tokens.

use crate::config::Defaults;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::fmt;

/// Opaque per-request correlation value carried in `@extra`.
///
/// A fixed-length random string over `[A-Za-z0-9]`; with 16 characters the
/// chance of two outstanding requests colliding is negligible, and the
/// registry re-mints on the rare collision anyway.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Mint a fresh random token.
    pub fn mint() -> Self {
        let token = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(Defaults::TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
