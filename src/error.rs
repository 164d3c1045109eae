//! Errors raised by session mutations.
//!
//! A mutation that returns an error has not changed the session.

use thiserror::Error;

/// Kind of named entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    CellType,
    Roi,
    Marker,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::CellType => "cell type",
            EntityKind::Roi => "ROI",
            EntityKind::Marker => "marker",
        };
        f.write_str(name)
    }
}

/// Broad class of a rejected mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A name collided or was empty. Nothing changed; the caller may retry.
    ValidationConflict,
    /// The mutation would break a model invariant and was refused.
    InvariantViolation,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{kind} '{name}' already exists")]
    NameConflict { kind: EntityKind, name: String },

    #[error("{kind} name must not be empty")]
    EmptyName { kind: EntityKind },

    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("{kind} index {index} out of range (have {len})")]
    IndexOutOfRange {
        kind: EntityKind,
        index: usize,
        len: usize,
    },

    #[error("cannot delete the last cell type")]
    LastCellType,

    #[error("ROI needs at least {required} points, has {found}")]
    TooFewPoints { required: usize, found: usize },

    #[error("ROI '{name}' is already being drawn")]
    AlreadyDrawing { name: String },

    #[error("no ROI is being drawn")]
    NotDrawing,

    #[error("no active cell type")]
    NoActiveCellType,
}

impl EngineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::NameConflict { .. } | EngineError::EmptyName { .. } => {
                ErrorCategory::ValidationConflict
            }
            EngineError::NotFound { .. }
            | EngineError::IndexOutOfRange { .. }
            | EngineError::LastCellType
            | EngineError::TooFewPoints { .. }
            | EngineError::AlreadyDrawing { .. }
            | EngineError::NotDrawing
            | EngineError::NoActiveCellType => ErrorCategory::InvariantViolation,
        }
    }

    pub(crate) fn conflict(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NameConflict {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
