// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

/// Failure payload of an asynchronous remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("{message}")]
    Failed { message: String },
    /// The service rolled a pending change back on its own; the record is intact.
    #[error("{message}")]
    Canceled { message: String },
}

impl RemoteError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn canceled(message: impl Into<String>) -> Self {
        Self::Canceled {
            message: message.into(),
        }
    }

    pub const fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Failed { message } | Self::Canceled { message } => message,
        }
    }
}

impl From<anyhow::Error> for RemoteError {
    fn from(error: anyhow::Error) -> Self {
        Self::failed(format!("{error:#}"))
    }
}
