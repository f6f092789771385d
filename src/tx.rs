//! Transaction wrapper for batched registry writes

use heed::RwTxn;
use tracing::debug;

use crate::codec::{apply_transition, narrow, set_flag};
use crate::db::{dbs, env, Dbs};
use crate::error::{err, PermissionError, Result};
use crate::flags::Flag;

/// Transaction wrapper for batched writes
pub struct Tx {
    txn: Option<RwTxn<'static>>,
    dbs: &'static Dbs,
}

impl Tx {
    #[inline]
    pub(crate) fn new() -> Result<Self> {
        Ok(Tx {
            txn: Some(env()?.write_txn().map_err(err)?),
            dbs: dbs()?,
        })
    }

    #[inline]
    pub(crate) fn tx(&mut self) -> &mut RwTxn<'static> {
        self.txn.as_mut().expect("transaction used after commit")
    }

    #[inline]
    pub(crate) fn dbs(&self) -> &'static Dbs {
        self.dbs
    }

    #[inline]
    pub(crate) fn commit(mut self) -> Result<()> {
        match self.txn.take() {
            Some(t) => t.commit().map_err(err),
            None => Ok(()),
        }
    }

    /// Stored mask for a collection, if any
    pub fn get(&mut self, id: u64) -> Result<Option<u8>> {
        match self.dbs.perms.get(self.tx(), id)? {
            Some(v) => narrow(i64::try_from(v).unwrap_or(i64::MAX)).map(Some),
            None => Ok(None),
        }
    }

    fn stored(&mut self, id: u64) -> Result<u8> {
        self.get(id)?.ok_or(PermissionError::CollectionNotFound(id))
    }

    /// Register a collection with its initial permissions
    pub fn create(&mut self, id: u64, bitmask: i64) -> Result<u8> {
        let mask = narrow(bitmask)?;
        if self.get(id)?.is_some() {
            return Err(PermissionError::CollectionExists(id));
        }
        self.dbs.perms.put(self.tx(), id, mask)?;
        debug!(id, mask, "collection created");
        Ok(mask)
    }

    /// Replace a collection's permissions, subject to the lock policy
    pub fn update(&mut self, id: u64, bitmask: i64) -> Result<u8> {
        let old = self.stored(id)?;
        let mask = apply_transition(i64::from(old), bitmask)?;
        if mask != old {
            self.dbs.perms.put(self.tx(), id, mask)?;
        }
        debug!(id, old, mask, "permissions updated");
        Ok(mask)
    }

    /// Change a single flag on a collection, subject to the lock policy
    pub fn set(&mut self, id: u64, flag: Flag, value: bool) -> Result<u8> {
        let old = self.stored(id)?;
        let proposed = set_flag(old, flag.position(), value)?;
        self.update(id, i64::from(proposed))
    }

    /// Forget a collection
    pub fn delete(&mut self, id: u64) -> Result<bool> {
        let r = self.dbs.perms.del(self.tx(), id)?;
        debug!(id, removed = r, "collection deleted");
        Ok(r)
    }
}

/// Run multiple operations in a single transaction
#[inline]
pub fn transact<T, F: FnOnce(&mut Tx) -> Result<T>>(f: F) -> Result<T> {
    let mut tx = Tx::new()?;
    let r = f(&mut tx)?;
    tx.commit()?;
    Ok(r)
}
