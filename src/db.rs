//! Database types and global state

use std::path::Path;
use std::sync::{Mutex, OnceLock};
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};
use heed::types::{Bytes, U64};

use crate::error::{err, PermissionError, Result};

// Database type alias: collection id (big-endian) -> permission mask
pub type Db = Database<Bytes, U64<byteorder::BigEndian>>;

/// Collection id as a sortable 8-byte key
#[inline]
pub fn key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

/// Permission masks keyed by collection id
pub struct PermTable {
    pub db: Db,
}

impl PermTable {
    #[inline]
    pub fn get(&self, tx: &RoTxn, id: u64) -> Result<Option<u64>> {
        self.db.get(tx, &key(id)).map_err(err)
    }

    #[inline]
    pub fn put(&self, tx: &mut RwTxn, id: u64, mask: u8) -> Result<()> {
        self.db.put(tx, &key(id), &u64::from(mask)).map_err(err)
    }

    #[inline]
    pub fn del(&self, tx: &mut RwTxn, id: u64) -> Result<bool> {
        self.db.delete(tx, &key(id)).map_err(err)
    }

    pub fn list(&self, tx: &RoTxn) -> Result<Vec<(u64, u64)>> {
        let mut r = Vec::new();
        for item in self.db.iter(tx).map_err(err)? {
            let (k, v) = item.map_err(err)?;
            if let Ok(k) = <[u8; 8]>::try_from(k) {
                r.push((u64::from_be_bytes(k), v));
            }
        }
        Ok(r)
    }

    pub fn count(&self, tx: &RoTxn) -> Result<usize> {
        Ok(self.db.len(tx).map_err(err)? as usize)
    }
}

/// All database handles
pub struct Dbs {
    pub perms: PermTable,
}

// Global state
pub static ENV: OnceLock<Env> = OnceLock::new();
pub static DBS: OnceLock<Dbs> = OnceLock::new();
pub static TEST_LOCK: Mutex<()> = Mutex::new(());
pub static INIT_PATH: OnceLock<String> = OnceLock::new();

/// Get the database handles, or error if not initialized
#[inline]
pub fn dbs() -> Result<&'static Dbs> {
    DBS.get().ok_or(PermissionError::NotInitialized)
}

/// Get the environment, or error if not initialized
#[inline]
pub fn env() -> Result<&'static Env> {
    ENV.get().ok_or(PermissionError::NotInitialized)
}

/// Execute a read-only operation
#[inline]
pub fn read<T, F: FnOnce(&Dbs, &RoTxn) -> Result<T>>(f: F) -> Result<T> {
    f(dbs()?, &env()?.read_txn().map_err(err)?)
}

/// Initialize the database
pub fn init(path: &str) -> Result<()> {
    if let Some(p) = INIT_PATH.get() {
        return if p == path {
            Ok(())
        } else {
            Err(PermissionError::AlreadyInitialized(p.clone()))
        };
    }
    std::fs::create_dir_all(path).map_err(err)?;
    // SAFETY: LMDB requires no other processes access this path concurrently during open.
    let e = unsafe {
        EnvOpenOptions::new()
            .map_size(1 << 30)
            .max_dbs(1)
            .open(Path::new(path))
            .map_err(err)?
    };
    let mut tx = e.write_txn().map_err(err)?;
    let d = Dbs {
        perms: PermTable {
            db: e.create_database(&mut tx, Some("perms")).map_err(err)?,
        },
    };
    tx.commit().map_err(err)?;
    let _ = (ENV.set(e), DBS.set(d), INIT_PATH.set(path.to_string()));
    tracing::info!(path, "permission registry opened");
    Ok(())
}

/// Clear all databases (for testing)
pub fn clear_all() -> Result<()> {
    crate::tx::transact(|tx| {
        let d = tx.dbs();
        d.perms.db.clear(tx.tx()).map_err(err)
    })
}

/// Get the test lock (for single-threaded tests)
pub fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner())
}
