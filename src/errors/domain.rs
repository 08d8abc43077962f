//! Domain-level error type used by the rules engine.
//!
//! This error type is transport-agnostic. The orchestrator converts it
//! into client-facing `game:error` events (validation) or a match
//! termination (inconsistency) per the recovery policy.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Central domain error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input/user validation or rule violation. Recovered locally: the
    /// offending player gets an error message, state is unchanged.
    Validation(String),
    /// Internal state inconsistency (missing definition, dangling
    /// modifier, unknown player). Fatal for the match.
    Inconsistency(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(d) => write!(f, "validation error: {d}"),
            DomainError::Inconsistency(d) => write!(f, "state inconsistency: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn inconsistency(detail: impl Into<String>) -> Self {
        Self::Inconsistency(detail.into())
    }

    /// Inconsistency errors terminate the affected match; validation
    /// errors are surfaced to the offending player only.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::Inconsistency(_))
    }

    /// Message safe to show the offending player.
    pub fn player_message(&self) -> String {
        match self {
            DomainError::Validation(d) => d.clone(),
            DomainError::Inconsistency(_) => "internal game error".to_string(),
        }
    }
}
