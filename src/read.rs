//! Read operations (direct LMDB access)

use heed::RoTxn;

use crate::codec::{decode, narrow};
use crate::db::{read, Dbs};
use crate::error::Result;
use crate::flags::PermissionSet;

#[inline]
fn stored(d: &Dbs, tx: &RoTxn, id: u64) -> Result<Option<u8>> {
    match d.perms.get(tx, id)? {
        Some(v) => narrow(i64::try_from(v).unwrap_or(i64::MAX)).map(Some),
        None => Ok(None),
    }
}

/// Get the stored permission mask for a collection
#[inline]
pub fn get_permissions(id: u64) -> Result<Option<u8>> {
    read(|d, tx| stored(d, tx, id))
}

/// Get the decoded permissions for a collection
pub fn get_flags(id: u64) -> Result<Option<PermissionSet>> {
    Ok(get_permissions(id)?.map(decode))
}

/// Check if a collection has every required flag enabled
#[inline]
pub fn check(id: u64, required: u8) -> Result<bool> {
    Ok(get_permissions(id)?.map(|m| (m & required) == required).unwrap_or(false))
}

/// List all collections with their masks
pub fn list_collections() -> Result<Vec<(u64, u8)>> {
    read(|d, tx| {
        d.perms
            .list(tx)?
            .into_iter()
            .map(|(id, v)| -> Result<(u64, u8)> {
                Ok((id, narrow(i64::try_from(v).unwrap_or(i64::MAX))?))
            })
            .collect()
    })
}

/// Count registered collections
pub fn count_collections() -> Result<usize> {
    read(|d, tx| d.perms.count(tx))
}
