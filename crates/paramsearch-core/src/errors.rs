//! Structured error types shared across paramsearch crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`PsError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (parameter names, lengths, flags).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for table generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum PsError {
    /// Invocation level misconfiguration (device count, sample count, output path).
    #[error("invalid config: {0}")]
    InvalidConfig(ErrorInfo),
    /// Malformed or out-of-domain parameter specification.
    #[error("invalid parameter spec: {0}")]
    InvalidSpec(ErrorInfo),
    /// Value sequences of unequal length reached the assembler.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(ErrorInfo),
    /// Output file could not be opened or written.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl PsError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            PsError::InvalidConfig(info)
            | PsError::InvalidSpec(info)
            | PsError::DimensionMismatch(info)
            | PsError::Io(info) => info,
        }
    }

    /// Shorthand for an [`PsError::InvalidSpec`] scoped to one parameter.
    pub fn spec(param: &str, code: &str, message: impl Into<String>) -> Self {
        PsError::InvalidSpec(ErrorInfo::new(code, message).with_context("param", param))
    }

    /// Shorthand for an [`PsError::InvalidConfig`] scoped to one flag.
    pub fn config(flag: &str, code: &str, message: impl Into<String>) -> Self {
        PsError::InvalidConfig(ErrorInfo::new(code, message).with_context("flag", flag))
    }
}
