//! Bitmask validation, decoding and the one-way lock policy
//!
//! Masks arrive from callers as signed integers (`i64`) and are narrowed to
//! `u8` once validated. Everything here is pure.

use tracing::warn;

use crate::constants::FLAG_BITS;
use crate::error::{PermissionError, Result};
use crate::flags::{Flag, PermissionSet};

/// Check that a raw mask has no bits above position 8 and is not negative
#[inline]
pub fn validate(bitmask: i64) -> Result<()> {
    narrow(bitmask).map(|_| ())
}

/// Validate and return the mask as a byte
#[inline]
pub fn narrow(bitmask: i64) -> Result<u8> {
    u8::try_from(bitmask).map_err(|_| PermissionError::InvalidPermissions { bitmask })
}

/// Decode a mask into named flags
#[inline]
pub fn decode(bitmask: u8) -> PermissionSet {
    PermissionSet::from_bits(bitmask)
}

/// Encode named flags into a mask
#[inline]
pub fn encode(set: &PermissionSet) -> u8 {
    set.bits()
}

/// Set or clear the flag at a 1-indexed position, leaving every other bit alone
pub fn set_flag(bitmask: u8, position: u32, value: bool) -> Result<u8> {
    if !(1..=FLAG_BITS).contains(&position) {
        return Err(PermissionError::InvalidPermissionDigit { position });
    }
    let bit = 1u8 << (position - 1);
    Ok(if value { bitmask | bit } else { bitmask & !bit })
}

/// Check that moving from `old` to `new` respects the lock policy.
///
/// Lockable flags may go from on to off only. Permanent flags may not change.
/// The first violation in check order is returned.
pub fn validate_transition(old: i64, new: i64) -> Result<()> {
    let old = decode(narrow(old)?);
    let new = decode(narrow(new)?);

    for flag in Flag::LOCKABLE {
        if !old.get(flag) && new.get(flag) {
            warn!(%flag, "rejected re-enabling locked permission");
            return Err(PermissionError::LockedPermission { flag });
        }
    }
    for flag in Flag::PERMANENT {
        if old.get(flag) != new.get(flag) {
            warn!(%flag, "rejected change to permanent permission");
            return Err(PermissionError::PermanentlyLockedPermission { flag });
        }
    }
    Ok(())
}

/// Validate a transition and return the new mask narrowed to a byte
pub fn apply_transition(old: i64, new: i64) -> Result<u8> {
    validate_transition(old, new)?;
    narrow(new)
}
