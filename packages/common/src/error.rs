use thiserror::Error;

/// Errors surfaced by a persistence backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The ordered ids sent for a reorder no longer match what is stored.
    /// `scope` is the page id (or menu parent scope) being reordered.
    #[error("Reorder conflict in {scope}: missing {missing:?}, unexpected {unexpected:?}")]
    ReorderConflict {
        scope: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("Menu item {0} is already nested and cannot take children")]
    MenuDepthExceeded(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),
}

impl StoreError {
    pub fn reorder_conflict(
        scope: impl Into<String>,
        missing: Vec<String>,
        unexpected: Vec<String>,
    ) -> Self {
        Self::ReorderConflict {
            scope: scope.into(),
            missing,
            unexpected,
        }
    }

    pub fn unavailable(message: impl ToString) -> Self {
        Self::PersistenceUnavailable(message.to_string())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ReorderConflict { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::PersistenceUnavailable(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::InvalidPayload(e.to_string())
    }
}
