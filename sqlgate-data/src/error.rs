use sqlgate_core::BoxError;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The execution engine failed; the engine error is kept verbatim.
    #[error(transparent)]
    Database(BoxError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation deadline exceeded")]
    DeadlineExceeded,

    #[error("cannot delete from {table} without a primary key")]
    MissingPrimaryKey { table: &'static str },

    #[error("transaction already committed or rolled back")]
    TransactionClosed,

    #[error("a transaction is already active on this repository")]
    NestedTransaction,

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates (e.g. `sqlgate-data-sqlx`) to wrap
    /// driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    /// `true` for [`Cancelled`](DataError::Cancelled) and
    /// [`DeadlineExceeded`](DataError::DeadlineExceeded).
    pub fn is_interrupted(&self) -> bool {
        matches!(self, DataError::Cancelled | DataError::DeadlineExceeded)
    }
}
