use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UidError {
    #[error("No uid provided.")]
    Missing,
}

/// Identifier of a user record in the identity provider.
///
/// Only non-empty identifiers can be constructed. Everything else about the
/// format (length, charset) is left to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds a `Uid` from an optional payload field.
    pub fn parse(raw: Option<String>) -> Result<Self, UidError> {
        raw.ok_or(UidError::Missing).and_then(Self::try_from)
    }
}

impl TryFrom<Option<String>> for Uid {
    type Error = UidError;

    fn try_from(value: Option<String>) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Uid {
    type Error = UidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(UidError::Missing);
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Uid {
    type Error = UidError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_string())
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
