use thiserror::Error;

/// Unified error type for the ledger core and its storage collaborators.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Proof upload failed: {0}")]
    ProofUpload(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
