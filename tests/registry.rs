//! Registry tests for permbits
//!
//! Stored permissions only change through transitions the lock policy allows.

use permbits::{
    check, clear_all, count_collections, create_collection, delete_collection, get_flags,
    get_permissions, init, list_collections, set_permission, test_lock, transact,
    update_permissions, Flag, PermissionError, ALL_FLAGS, CAN_CREATE, CAN_FREEZE, CAN_REVOKE,
    FORCEFUL_TRANSFERS, FROZEN_BY_DEFAULT,
};
use std::sync::OnceLock;
use tempfile::TempDir;

static TEST_DIR: OnceLock<TempDir> = OnceLock::new();

fn setup() -> std::sync::MutexGuard<'static, ()> {
    let lock = test_lock();
    let dir = TEST_DIR.get_or_init(|| TempDir::new().unwrap());
    init(dir.path().to_str().unwrap()).unwrap();
    clear_all().unwrap();
    lock
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn create_and_read_back() {
    let _lock = setup();

    let mask = create_collection(1, (CAN_CREATE | FORCEFUL_TRANSFERS) as i64).unwrap();
    assert_eq!(mask, CAN_CREATE | FORCEFUL_TRANSFERS);
    assert_eq!(get_permissions(1).unwrap(), Some(mask));

    let flags = get_flags(1).unwrap().unwrap();
    assert!(flags.can_create);
    assert!(flags.forceful_transfers);
    assert!(!flags.can_freeze);
}

#[test]
fn create_rejects_invalid_mask() {
    let _lock = setup();

    assert_eq!(
        create_collection(2, 256),
        Err(PermissionError::InvalidPermissions { bitmask: 256 })
    );
    assert_eq!(
        create_collection(2, -1),
        Err(PermissionError::InvalidPermissions { bitmask: -1 })
    );
    assert_eq!(get_permissions(2).unwrap(), None);
}

#[test]
fn create_twice_fails() {
    let _lock = setup();

    create_collection(3, 0).unwrap();
    assert_eq!(create_collection(3, ALL_FLAGS as i64), Err(PermissionError::CollectionExists(3)));
    assert_eq!(get_permissions(3).unwrap(), Some(0));
}

#[test]
fn delete_collection_forgets() {
    let _lock = setup();

    create_collection(4, CAN_REVOKE as i64).unwrap();
    assert!(delete_collection(4).unwrap());
    assert!(!delete_collection(4).unwrap());
    assert_eq!(get_permissions(4).unwrap(), None);
}

#[test]
fn list_and_count() {
    let _lock = setup();

    create_collection(30, CAN_FREEZE as i64).unwrap();
    create_collection(10, 0).unwrap();
    create_collection(20, ALL_FLAGS as i64).unwrap();

    assert_eq!(count_collections().unwrap(), 3);
    assert_eq!(
        list_collections().unwrap(),
        vec![(10, 0), (20, ALL_FLAGS), (30, CAN_FREEZE)]
    );
}

// ============================================================================
// Updates
// ============================================================================

#[test]
fn update_allows_disabling() {
    let _lock = setup();

    create_collection(5, (CAN_CREATE | CAN_REVOKE | FROZEN_BY_DEFAULT) as i64).unwrap();
    let mask = update_permissions(5, (CAN_REVOKE | FROZEN_BY_DEFAULT) as i64).unwrap();
    assert_eq!(mask, CAN_REVOKE | FROZEN_BY_DEFAULT);
    assert_eq!(get_permissions(5).unwrap(), Some(mask));
}

#[test]
fn update_rejects_reenable_and_keeps_old_value() {
    let _lock = setup();

    create_collection(6, 0).unwrap();
    assert_eq!(
        update_permissions(6, CAN_CREATE as i64),
        Err(PermissionError::LockedPermission { flag: Flag::CanCreate })
    );
    assert_eq!(get_permissions(6).unwrap(), Some(0));
}

#[test]
fn update_rejects_permanent_change() {
    let _lock = setup();

    create_collection(7, FORCEFUL_TRANSFERS as i64).unwrap();
    assert_eq!(
        update_permissions(7, 0),
        Err(PermissionError::PermanentlyLockedPermission { flag: Flag::ForcefulTransfers })
    );
    assert_eq!(get_permissions(7).unwrap(), Some(FORCEFUL_TRANSFERS));
}

#[test]
fn update_missing_collection() {
    let _lock = setup();

    assert_eq!(update_permissions(99, 0), Err(PermissionError::CollectionNotFound(99)));
    assert_eq!(
        set_permission(99, Flag::CanFreeze, false),
        Err(PermissionError::CollectionNotFound(99))
    );
}

#[test]
fn set_permission_one_way() {
    let _lock = setup();

    create_collection(8, (CAN_FREEZE | CAN_CREATE) as i64).unwrap();
    assert_eq!(set_permission(8, Flag::CanFreeze, false).unwrap(), CAN_CREATE);
    assert_eq!(
        set_permission(8, Flag::CanFreeze, true),
        Err(PermissionError::LockedPermission { flag: Flag::CanFreeze })
    );
    // already off: no-op succeeds
    assert_eq!(set_permission(8, Flag::CanFreeze, false).unwrap(), CAN_CREATE);
    assert_eq!(
        set_permission(8, Flag::FrozenByDefault, true),
        Err(PermissionError::PermanentlyLockedPermission { flag: Flag::FrozenByDefault })
    );
}

#[test]
fn check_required_flags() {
    let _lock = setup();

    create_collection(9, (CAN_CREATE | CAN_REVOKE) as i64).unwrap();
    assert!(check(9, CAN_CREATE).unwrap());
    assert!(check(9, CAN_CREATE | CAN_REVOKE).unwrap());
    assert!(!check(9, CAN_CREATE | CAN_FREEZE).unwrap());
    assert!(!check(404, 0).unwrap());
}

// ============================================================================
// Transactions
// ============================================================================

#[test]
fn transact_is_all_or_nothing() {
    let _lock = setup();

    create_collection(11, CAN_CREATE as i64).unwrap();
    let r = transact(|tx| {
        tx.update(11, 0)?;
        tx.create(12, CAN_REVOKE as i64)?;
        tx.update(11, CAN_CREATE as i64)
    });
    assert_eq!(r, Err(PermissionError::LockedPermission { flag: Flag::CanCreate }));
    assert_eq!(get_permissions(11).unwrap(), Some(CAN_CREATE));
    assert_eq!(get_permissions(12).unwrap(), None);
}

#[test]
fn transact_commits_batch() {
    let _lock = setup();

    transact(|tx| {
        tx.create(13, ALL_FLAGS as i64)?;
        tx.set(13, Flag::CanUpdateBytes, false)?;
        tx.set(13, Flag::CanManagerTransfer, false)
    })
    .unwrap();
    assert_eq!(get_permissions(13).unwrap(), Some(0x3F));
}

#[test]
fn init_other_path_fails() {
    let _lock = setup();

    assert!(matches!(
        init("/tmp/permbits-some-other-path"),
        Err(PermissionError::AlreadyInitialized(_))
    ));
}
