//! Fault kinds and the fault value captured from a failing trial.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::str::FromStr;

/// Closed set of fault categories a target can raise.
///
/// Judging compares kinds by tag, never by type identity or message text. The
/// free-text message is only consulted for the optional substring check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Division or remainder by zero.
    DivisionByZero,
    /// Arithmetic overflow or loss of representable range.
    Overflow,
    /// Input rejected by the target's own validation.
    InvalidInput,
    /// Value outside the domain the target accepts.
    OutOfRange,
    /// Operation or input shape the target does not support.
    Unsupported,
    /// A panic caught while the target was running.
    Panic,
}

impl FaultKind {
    /// Every kind, in declaration order.
    pub const ALL: [FaultKind; 6] = [
        FaultKind::DivisionByZero,
        FaultKind::Overflow,
        FaultKind::InvalidInput,
        FaultKind::OutOfRange,
        FaultKind::Unsupported,
        FaultKind::Panic,
    ];

    /// Stable tag used in declarations and reports.
    pub fn name(&self) -> &'static str {
        match self {
            FaultKind::DivisionByZero => "division_by_zero",
            FaultKind::Overflow => "overflow",
            FaultKind::InvalidInput => "invalid_input",
            FaultKind::OutOfRange => "out_of_range",
            FaultKind::Unsupported => "unsupported",
            FaultKind::Panic => "panic",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a fault-kind tag that is not in the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFaultKind(pub String);

impl fmt::Display for UnknownFaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown fault kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownFaultKind {}

impl FromStr for FaultKind {
    type Err = UnknownFaultKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FaultKind::ALL
            .iter()
            .find(|kind| kind.name() == s)
            .copied()
            .ok_or_else(|| UnknownFaultKind(s.to_string()))
    }
}

/// A raised error condition captured during a trial: a kind plus a free-text
/// message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for the most common target-side rejection.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(FaultKind::InvalidInput, message)
    }

    /// Fold a caught panic payload into a fault.
    ///
    /// Payloads from `panic!` are `&str` or `String`; anything else renders as
    /// an opaque marker.
    pub fn from_panic_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_string()
        };
        Self::new(FaultKind::Panic, message)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Fault {}
