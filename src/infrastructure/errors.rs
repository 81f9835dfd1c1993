use std::fmt;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::errors::DomainError;

/// The step of a store call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Begin,
    InsertOrder,
    InsertItem(usize),
    InsertPayment,
    InsertDelivery,
    Query,
    FetchRow,
    Commit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Begin => f.write_str("starting tx"),
            Stage::InsertOrder => f.write_str("inserting order row"),
            Stage::InsertItem(idx) => write!(f, "inserting item row #{idx}"),
            Stage::InsertPayment => f.write_str("inserting payment row"),
            Stage::InsertDelivery => f.write_str("inserting delivery row"),
            Stage::Query => f.write_str("querying orders"),
            Stage::FetchRow => f.write_str("fetching joined row"),
            Stage::Commit => f.write_str("committing tx"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("acquiring a connection: {0}")]
    Unavailable(#[from] r2d2::Error),

    #[error("{stage}: order {order_uid:?} already exists")]
    AlreadyExists {
        stage: Stage,
        order_uid: String,
        #[source]
        source: DieselError,
    },

    #[error("{stage}: {source}")]
    Database {
        stage: Stage,
        #[source]
        source: DieselError,
    },

    #[error("decoding {field} of order {order_uid:?}: not representable as f64")]
    Decode {
        order_uid: String,
        field: &'static str,
    },

    /// The call failed and the rollback that followed failed too, so the
    /// transaction's outcome on the server is unknown.
    #[error("{cause}; during rollback: {rollback}")]
    RollbackFailed {
        #[source]
        cause: Box<StoreError>,
        rollback: DieselError,
    },
}

impl StoreError {
    /// Classify a statement failure, splitting out unique violations on `order_uid`.
    pub(crate) fn statement(stage: Stage, order_uid: &str, source: DieselError) -> Self {
        match source {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::AlreadyExists {
                    stage,
                    order_uid: order_uid.to_string(),
                    source,
                }
            }
            source => StoreError::Database { stage, source },
        }
    }

    pub(crate) fn database(stage: Stage, source: DieselError) -> Self {
        StoreError::Database { stage, source }
    }

    /// Commit failures may already carry a failed rollback reported by Diesel.
    pub(crate) fn commit(source: DieselError) -> Self {
        match source {
            DieselError::RollbackErrorOnCommit {
                rollback_error,
                commit_error,
            } => StoreError::RollbackFailed {
                cause: Box::new(StoreError::database(Stage::Commit, *commit_error)),
                rollback: *rollback_error,
            },
            source => StoreError::database(Stage::Commit, source),
        }
    }

    /// The original failure, looking through a failed rollback.
    pub fn cause(&self) -> &StoreError {
        match self {
            StoreError::RollbackFailed { cause, .. } => cause.cause(),
            other => other,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self.cause() {
            StoreError::AlreadyExists { stage, .. } | StoreError::Database { stage, .. } => {
                Some(*stage)
            }
            _ => None,
        }
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self.cause(), StoreError::AlreadyExists { .. })
    }

    pub fn rollback_error(&self) -> Option<&DieselError> {
        match self {
            StoreError::RollbackFailed { rollback, .. } => Some(rollback),
            _ => None,
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidOrder(msg) => DomainError::InvalidInput(msg),
            StoreError::Unavailable(err) => DomainError::Unavailable(err.to_string()),
            StoreError::AlreadyExists { order_uid, .. } => DomainError::AlreadyExists(order_uid),
            other => DomainError::Internal(other.to_string()),
        }
    }
}
