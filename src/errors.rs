// errors.rs

use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::error::SqlState;

use crate::context::Interrupt;

/// Failures reported by the store or the connection pool
#[derive(Error, Debug)]
pub enum StoreError {
    /// The server rejected the statement with a SQLSTATE code
    #[error("database error [{code}]: {message}")]
    Db { code: String, message: String },

    /// Connection-level driver failure (closed socket, protocol error, ...)
    #[error("driver error: {0}")]
    Driver(String),

    /// No pooled connection could be handed out
    #[error("pool error: {0}")]
    Pool(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl StoreError {
    /// True when the store reported a uniqueness-constraint violation (23505)
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::Db { code, .. } if code == SqlState::UNIQUE_VIOLATION.code())
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(e: tokio_postgres::Error) -> Self {
        match e.as_db_error() {
            Some(db) => StoreError::Db {
                code: db.code().code().to_string(),
                message: db.message().to_string(),
            },
            None => StoreError::Driver(e.to_string()),
        }
    }
}

impl From<PoolError> for StoreError {
    fn from(e: PoolError) -> Self {
        match e {
            PoolError::Backend(e) => StoreError::from(e),
            PoolError::Timeout(kind) => {
                StoreError::Pool(format!("timed out waiting for a connection ({:?})", kind))
            }
            other => StoreError::Pool(other.to_string()),
        }
    }
}

impl From<Interrupt> for StoreError {
    fn from(i: Interrupt) -> Self {
        match i {
            Interrupt::Cancelled => StoreError::Cancelled,
            Interrupt::DeadlineExceeded => StoreError::DeadlineExceeded,
        }
    }
}

/// Closed set of repository outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoErrorKind {
    NotFound,
    AlreadyExists,
    Unknown,
}

impl std::fmt::Display for RepoErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RepoErrorKind::NotFound => "not found",
                RepoErrorKind::AlreadyExists => "already exists",
                RepoErrorKind::Unknown => "unknown error",
            }
        )
    }
}

/// Repository error: a kind plus the operation that produced it and the
/// store failure behind it. Only the kind is rendered by `Display`.
#[derive(Error, Debug)]
#[error("{kind}")]
pub struct RepoError {
    kind: RepoErrorKind,
    op: &'static str,
    #[source]
    source: Option<StoreError>,
}

impl RepoError {
    pub fn not_found(op: &'static str) -> Self {
        Self { kind: RepoErrorKind::NotFound, op, source: None }
    }

    pub fn already_exists(op: &'static str, source: StoreError) -> Self {
        Self { kind: RepoErrorKind::AlreadyExists, op, source: Some(source) }
    }

    pub fn unknown(op: &'static str, source: StoreError) -> Self {
        Self { kind: RepoErrorKind::Unknown, op, source: Some(source) }
    }

    pub fn kind(&self) -> RepoErrorKind {
        self.kind
    }

    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn store_error(&self) -> Option<&StoreError> {
        self.source.as_ref()
    }
}

/// Service-level outcomes handed to the transport layer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error("message already exists")]
    MessageAlreadyExists,
    #[error("cannot create message")]
    CannotCreateMessage,
    #[error("message not found")]
    MessageNotFound,
    #[error("cannot get message")]
    CannotGetMessage,
}
