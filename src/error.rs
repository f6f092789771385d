//! Error types for permbits

use thiserror::Error;

use crate::flags::Flag;

/// Result type alias for permbits operations
pub type Result<T> = std::result::Result<T, PermissionError>;

/// Everything that can reject a permission operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("invalid permissions {bitmask}: leading/extra bits set")]
    InvalidPermissions { bitmask: i64 },

    #[error("invalid permission digit {position}: must be within 1..=8")]
    InvalidPermissionDigit { position: u32 },

    #[error("{flag} is locked and cannot be re-enabled")]
    LockedPermission { flag: Flag },

    #[error("{flag} is permanently locked and cannot be changed")]
    PermanentlyLockedPermission { flag: Flag },

    #[error("unknown permission flag: {0}")]
    UnknownFlag(String),

    #[error("collection {0} not found")]
    CollectionNotFound(u64),

    #[error("collection {0} already exists")]
    CollectionExists(u64),

    #[error("Not initialized")]
    NotInitialized,

    #[error("Already init at {0}")]
    AlreadyInitialized(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl PermissionError {
    /// True for rejections produced by the codec itself, as opposed to
    /// registry or storage faults.
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            PermissionError::InvalidPermissions { .. }
                | PermissionError::InvalidPermissionDigit { .. }
                | PermissionError::LockedPermission { .. }
                | PermissionError::PermanentlyLockedPermission { .. }
        )
    }
}

/// Convert any storage-level error to PermissionError
pub fn err<E: std::error::Error>(e: E) -> PermissionError {
    PermissionError::Storage(e.to_string())
}
