//! permbits - collection permission flags
//!
//! Eight named permissions packed into one byte, with a one-way lock policy
//! for updates and an LMDB-backed registry that enforces it.

pub mod codec;
pub mod constants;
pub mod db;
pub mod error;
pub mod flags;
pub mod read;
pub mod tx;
pub mod write;

pub use codec::{apply_transition, decode, encode, narrow, set_flag, validate, validate_transition};
pub use constants::*;
pub use db::{clear_all, init, test_lock};
pub use error::{PermissionError, Result};
pub use flags::{Flag, PermissionSet};
pub use read::{check, count_collections, get_flags, get_permissions, list_collections};
pub use tx::{transact, Tx};
pub use write::{create_collection, delete_collection, set_permission, update_permissions};
