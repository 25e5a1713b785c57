use std::fmt;

use lazy_regex::regex_is_match;
use serde::Serialize;

use crate::errors::domain::{DomainError, ValidationKind};

/// Caller-visible identifier grouping one `process` call: 16 lowercase hex chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    pub const LEN: usize = 16;

    /// Validate a caller-supplied id. Case is significant; uppercase is rejected.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if regex_is_match!(r"^[0-9a-f]{16}$", raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(DomainError::validation(
                ValidationKind::InvalidBatchId,
                format!("Batch id must be exactly 16 lowercase hex characters, got '{raw}'"),
            ))
        }
    }

    /// Fresh id from 64 random bits.
    pub fn generate() -> Self {
        Self(format!("{:016x}", rand::random::<u64>()))
    }

    /// Use the supplied id when present, otherwise generate one.
    pub fn resolve(supplied: Option<&str>) -> Result<Self, DomainError> {
        match supplied {
            Some(raw) => Self::parse(raw),
            None => Ok(Self::generate()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
