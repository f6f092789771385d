//! Public write API - every update passes the lock policy before it is stored

use crate::error::Result;
use crate::flags::Flag;
use crate::tx::transact;

/// Register a collection with its initial permissions
pub fn create_collection(id: u64, bitmask: i64) -> Result<u8> {
    transact(|tx| tx.create(id, bitmask))
}

/// Replace a collection's permissions
pub fn update_permissions(id: u64, bitmask: i64) -> Result<u8> {
    transact(|tx| tx.update(id, bitmask))
}

/// Turn a single flag on or off for a collection
pub fn set_permission(id: u64, flag: Flag, value: bool) -> Result<u8> {
    transact(|tx| tx.set(id, flag, value))
}

/// Remove a collection from the registry
pub fn delete_collection(id: u64) -> Result<bool> {
    transact(|tx| tx.delete(id))
}
