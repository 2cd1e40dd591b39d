//! Repository failure taxonomy.
//!
//! # Responsibility
//! - Normalize every storage failure into one of four kinds before it
//!   crosses the repository port.
//!
//! # Invariants
//! - No storage-engine error type appears in `RepoError`'s public shape;
//!   unclassified failures are boxed as `dyn Error` inside `Unknown`.
//! - `NotFound` is only produced for a missing identifier.

use crate::model::entity::Entity;
use rusqlite::ffi::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Discriminant of `RepoError`, for callers that map failures to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoErrorKind {
    NotFound,
    ConstraintViolation,
    Connectivity,
    Unknown,
}

impl RepoErrorKind {
    /// Stable snake_case label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::ConstraintViolation => "constraint_violation",
            Self::Connectivity => "connectivity",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for RepoErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure returned by every repository operation.
#[derive(Debug)]
pub enum RepoError {
    /// The operation targeted an identifier with no stored entity.
    NotFound { entity: &'static str, id: String },
    /// Storage rejected the write (uniqueness, CHECK, NOT NULL, ...).
    ConstraintViolation(String),
    /// Storage could not be reached or is unusable (busy, locked, I/O).
    Connectivity(String),
    /// Any other failure, preserved for logging.
    Unknown(Box<dyn Error + Send + Sync + 'static>),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    /// Not-found error for entity `M` and identifier `id`.
    pub fn not_found<M: Entity>(id: M::Id) -> Self {
        Self::NotFound {
            entity: M::NAME,
            id: id.to_string(),
        }
    }

    pub fn unknown(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Unknown(error.into())
    }

    pub fn kind(&self) -> RepoErrorKind {
        match self {
            Self::NotFound { .. } => RepoErrorKind::NotFound,
            Self::ConstraintViolation(_) => RepoErrorKind::ConstraintViolation,
            Self::Connectivity(_) => RepoErrorKind::Connectivity,
            Self::Unknown(_) => RepoErrorKind::Unknown,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == RepoErrorKind::NotFound
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::Connectivity(message) => write!(f, "storage unavailable: {message}"),
            Self::Unknown(err) => write!(f, "unexpected storage failure: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unknown(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        let kind = match &value {
            rusqlite::Error::SqliteFailure(failure, _) => classify_code(failure.code),
            _ => RepoErrorKind::Unknown,
        };

        match kind {
            RepoErrorKind::ConstraintViolation => Self::ConstraintViolation(value.to_string()),
            RepoErrorKind::Connectivity => Self::Connectivity(value.to_string()),
            RepoErrorKind::NotFound | RepoErrorKind::Unknown => Self::Unknown(Box::new(value)),
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Unknown(Box::new(value))
    }
}

fn classify_code(code: ErrorCode) -> RepoErrorKind {
    match code {
        ErrorCode::ConstraintViolation => RepoErrorKind::ConstraintViolation,
        ErrorCode::DatabaseBusy
        | ErrorCode::DatabaseLocked
        | ErrorCode::CannotOpen
        | ErrorCode::SystemIoFailure
        | ErrorCode::NotADatabase
        | ErrorCode::PermissionDenied
        | ErrorCode::FileLockingProtocolFailed => RepoErrorKind::Connectivity,
        _ => RepoErrorKind::Unknown,
    }
}
