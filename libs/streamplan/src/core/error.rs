// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    /// An edit would leave the plan structurally invalid.
    #[error("Plan validation failed: {0}")]
    Validation(String),

    /// A named operator, stream or port does not exist.
    #[error("Reference not found: {0}")]
    NotFound(String),

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Deployment failed: {0}")]
    Deployment(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of a [`PlanError`].
///
/// Validation failures are expected outcomes of a bad edit and the caller may
/// retry with a different batch. Missing references indicate a caller defect
/// and should not be retried blindly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Usage,
    Internal,
}

impl PlanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanError::Validation(_) => ErrorKind::Validation,
            PlanError::NotFound(_) => ErrorKind::NotFound,
            PlanError::NotSupported(_) | PlanError::Configuration(_) => ErrorKind::Usage,
            PlanError::Deployment(_) | PlanError::Io(_) | PlanError::Other(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
