//! Failures raised by the back-office records themselves.
//!
//! Parsing a tax id or a status label, registering or disabling a party,
//! dating a project: all of these report through [`DomainError`]. Store
//! access and report rendering fail with their own error types.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input that does not describe a valid record: a tax id with a bad check
    /// digit, an unknown document status or transaction tag, a negative price,
    /// a project finishing before it started.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A command reached the wrong party record.
    #[error("record mismatch: {0}")]
    InvariantViolation(String),

    /// A record id that is not a UUID.
    #[error("bad record id: {0}")]
    InvalidId(String),

    /// A lifecycle command on a party that was never registered.
    #[error("record does not exist")]
    NotFound,

    /// A lifecycle command that the record's current state rules out, such as
    /// registering twice or disabling a disabled party.
    #[error("state conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_detail() {
        assert_eq!(
            DomainError::validation("tax id too short").to_string(),
            "invalid input: tax id too short"
        );
        assert_eq!(
            DomainError::conflict("party is already disabled").to_string(),
            "state conflict: party is already disabled"
        );
        assert_eq!(DomainError::not_found().to_string(), "record does not exist");
    }
}
