use crate::error::StoreError;

/// Result type for persistence operations
pub type StoreResult<T> = Result<T, StoreError>;
