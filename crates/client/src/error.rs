#![forbid(unsafe_code)]

use sseq_core::{ChartError, ChartErrorKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchErrorKind {
    UnknownCommand,
    InvalidCommand,
    Validation,
    Reference,
}

impl DispatchErrorKind {
    /// Name used in the outbound `error.client.<name>` command.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownCommand => "UnknownCommandError",
            Self::InvalidCommand => "InvalidCommandError",
            Self::Validation => "ValidationError",
            Self::Reference => "ReferenceError",
        }
    }
}

impl From<ChartErrorKind> for DispatchErrorKind {
    fn from(kind: ChartErrorKind) -> Self {
        match kind {
            ChartErrorKind::Validation => Self::Validation,
            ChartErrorKind::Reference => Self::Reference,
        }
    }
}

/// Failure of one inbound message. Never fatal to the session.
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchError {
    kind: DispatchErrorKind,
    message: String,
}

impl DispatchError {
    pub fn new(kind: DispatchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_command(message: impl Into<String>) -> Self {
        Self::new(DispatchErrorKind::UnknownCommand, message)
    }

    pub fn invalid_command(message: impl Into<String>) -> Self {
        Self::new(DispatchErrorKind::InvalidCommand, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(DispatchErrorKind::Validation, message)
    }

    pub fn reference(message: impl Into<String>) -> Self {
        Self::new(DispatchErrorKind::Reference, message)
    }

    pub fn kind(&self) -> DispatchErrorKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for DispatchError {}

impl From<ChartError> for DispatchError {
    fn from(err: ChartError) -> Self {
        Self::new(err.kind().into(), err.to_string())
    }
}
