//! Permission bit constants

// Flag bits, position 1 is the least significant bit
pub const FROZEN_BY_DEFAULT: u8 = 1;
pub const CAN_FREEZE: u8 = 1 << 1;
pub const CAN_REVOKE: u8 = 1 << 2;
pub const CAN_CREATE: u8 = 1 << 3;
pub const FORCEFUL_TRANSFERS: u8 = 1 << 4;
pub const CAN_UPDATE_URIS: u8 = 1 << 5;
pub const CAN_MANAGER_TRANSFER: u8 = 1 << 6;
pub const CAN_UPDATE_BYTES: u8 = 1 << 7;

pub const NO_FLAGS: u8 = 0;
pub const ALL_FLAGS: u8 = 0xFF;

/// Number of defined bit positions
pub const FLAG_BITS: u32 = 8;

// Flag name mappings, bit order
const FLAGS: &[(&str, u8)] = &[
    ("FrozenByDefault", FROZEN_BY_DEFAULT),
    ("CanFreeze", CAN_FREEZE),
    ("CanRevoke", CAN_REVOKE),
    ("CanCreate", CAN_CREATE),
    ("ForcefulTransfers", FORCEFUL_TRANSFERS),
    ("CanUpdateUris", CAN_UPDATE_URIS),
    ("CanManagerTransfer", CAN_MANAGER_TRANSFER),
    ("CanUpdateBytes", CAN_UPDATE_BYTES),
];

/// Convert a permission mask to a list of flag names
pub fn flags_to_names(mask: u8) -> Vec<&'static str> {
    FLAGS.iter()
        .filter(|(_, b)| mask & b == *b)
        .map(|(n, _)| *n)
        .collect()
}

/// Convert a list of flag names to a mask
pub fn names_to_flags(names: &[&str]) -> u8 {
    names
        .iter()
        .filter_map(|n| FLAGS.iter().find(|(k, _)| k == n).map(|(_, v)| v))
        .fold(0, |a, b| a | b)
}
