/// Error type for every storage and console operation in the store.
#[derive(Debug, thiserror::Error)]
pub enum RentalError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transaction already finished")]
    TransactionClosed,

    #[error("Transaction commit failed: {0}")]
    CommitFailed(String),

    #[error("Transaction rollback failed: {0}")]
    RollbackFailed(String),

    #[error("Input stream closed")]
    InputClosed,

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("You are unauthorized to {action}")]
    Unauthorized { action: &'static str },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No identifiers left for prefix '{prefix}'")]
    IdSpaceExhausted { prefix: &'static str },
}

impl RentalError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Result type for store operations
pub type RentalResult<T> = Result<T, RentalError>;
