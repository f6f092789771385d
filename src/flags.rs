//! Named permission flags and the decoded permission record

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{PermissionError, Result};

/// One of the eight collection permissions, in bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    FrozenByDefault,
    CanFreeze,
    CanRevoke,
    CanCreate,
    ForcefulTransfers,
    CanUpdateUris,
    CanManagerTransfer,
    CanUpdateBytes,
}

impl Flag {
    /// All flags by bit position
    pub const ALL: [Flag; 8] = [
        Flag::FrozenByDefault,
        Flag::CanFreeze,
        Flag::CanRevoke,
        Flag::CanCreate,
        Flag::ForcefulTransfers,
        Flag::CanUpdateUris,
        Flag::CanManagerTransfer,
        Flag::CanUpdateBytes,
    ];

    /// Flags that may be switched off but never back on, in check order
    pub const LOCKABLE: [Flag; 6] = [
        Flag::CanUpdateBytes,
        Flag::CanUpdateUris,
        Flag::CanCreate,
        Flag::CanRevoke,
        Flag::CanFreeze,
        Flag::CanManagerTransfer,
    ];

    /// Flags fixed at creation, in check order
    pub const PERMANENT: [Flag; 2] = [Flag::ForcefulTransfers, Flag::FrozenByDefault];

    /// 1-indexed bit position
    pub fn position(self) -> u32 {
        match self {
            Flag::FrozenByDefault => 1,
            Flag::CanFreeze => 2,
            Flag::CanRevoke => 3,
            Flag::CanCreate => 4,
            Flag::ForcefulTransfers => 5,
            Flag::CanUpdateUris => 6,
            Flag::CanManagerTransfer => 7,
            Flag::CanUpdateBytes => 8,
        }
    }

    pub fn mask(self) -> u8 {
        match self {
            Flag::FrozenByDefault => FROZEN_BY_DEFAULT,
            Flag::CanFreeze => CAN_FREEZE,
            Flag::CanRevoke => CAN_REVOKE,
            Flag::CanCreate => CAN_CREATE,
            Flag::ForcefulTransfers => FORCEFUL_TRANSFERS,
            Flag::CanUpdateUris => CAN_UPDATE_URIS,
            Flag::CanManagerTransfer => CAN_MANAGER_TRANSFER,
            Flag::CanUpdateBytes => CAN_UPDATE_BYTES,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Flag::FrozenByDefault => "FrozenByDefault",
            Flag::CanFreeze => "CanFreeze",
            Flag::CanRevoke => "CanRevoke",
            Flag::CanCreate => "CanCreate",
            Flag::ForcefulTransfers => "ForcefulTransfers",
            Flag::CanUpdateUris => "CanUpdateUris",
            Flag::CanManagerTransfer => "CanManagerTransfer",
            Flag::CanUpdateBytes => "CanUpdateBytes",
        }
    }

    /// Look up a flag by its 1-indexed bit position
    pub fn from_position(position: u32) -> Result<Flag> {
        match position {
            1 => Ok(Flag::FrozenByDefault),
            2 => Ok(Flag::CanFreeze),
            3 => Ok(Flag::CanRevoke),
            4 => Ok(Flag::CanCreate),
            5 => Ok(Flag::ForcefulTransfers),
            6 => Ok(Flag::CanUpdateUris),
            7 => Ok(Flag::CanManagerTransfer),
            8 => Ok(Flag::CanUpdateBytes),
            _ => Err(PermissionError::InvalidPermissionDigit { position }),
        }
    }

    pub fn is_lockable(self) -> bool {
        Flag::LOCKABLE.contains(&self)
    }

    pub fn is_permanent(self) -> bool {
        Flag::PERMANENT.contains(&self)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Flag {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Flag> {
        Flag::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| PermissionError::UnknownFlag(s.to_string()))
    }
}

/// Decoded permissions, one field per flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    pub frozen_by_default: bool,
    pub can_freeze: bool,
    pub can_revoke: bool,
    pub can_create: bool,
    pub forceful_transfers: bool,
    pub can_update_uris: bool,
    pub can_manager_transfer: bool,
    pub can_update_bytes: bool,
}

impl PermissionSet {
    /// Decode a mask into named flags. Every `u8` is a valid mask.
    pub fn from_bits(bits: u8) -> Self {
        let mut set = PermissionSet::default();
        for i in 0..FLAG_BITS {
            let on = (bits >> i) & 1 == 1;
            match i + 1 {
                1 => set.frozen_by_default = on,
                2 => set.can_freeze = on,
                3 => set.can_revoke = on,
                4 => set.can_create = on,
                5 => set.forceful_transfers = on,
                6 => set.can_update_uris = on,
                7 => set.can_manager_transfer = on,
                8 => set.can_update_bytes = on,
                _ => unreachable!("FLAG_BITS is 8"),
            }
        }
        set
    }

    /// Re-encode into a mask
    pub fn bits(&self) -> u8 {
        Flag::ALL
            .iter()
            .filter(|f| self.get(**f))
            .fold(0, |a, f| a | f.mask())
    }

    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::FrozenByDefault => self.frozen_by_default,
            Flag::CanFreeze => self.can_freeze,
            Flag::CanRevoke => self.can_revoke,
            Flag::CanCreate => self.can_create,
            Flag::ForcefulTransfers => self.forceful_transfers,
            Flag::CanUpdateUris => self.can_update_uris,
            Flag::CanManagerTransfer => self.can_manager_transfer,
            Flag::CanUpdateBytes => self.can_update_bytes,
        }
    }

    /// Copy with one flag changed
    pub fn with(mut self, flag: Flag, value: bool) -> Self {
        let field = match flag {
            Flag::FrozenByDefault => &mut self.frozen_by_default,
            Flag::CanFreeze => &mut self.can_freeze,
            Flag::CanRevoke => &mut self.can_revoke,
            Flag::CanCreate => &mut self.can_create,
            Flag::ForcefulTransfers => &mut self.forceful_transfers,
            Flag::CanUpdateUris => &mut self.can_update_uris,
            Flag::CanManagerTransfer => &mut self.can_manager_transfer,
            Flag::CanUpdateBytes => &mut self.can_update_bytes,
        };
        *field = value;
        self
    }

    /// Enabled flags in bit order
    pub fn enabled(&self) -> Vec<Flag> {
        Flag::ALL.iter().copied().filter(|f| self.get(*f)).collect()
    }
}

impl From<u8> for PermissionSet {
    fn from(bits: u8) -> Self {
        PermissionSet::from_bits(bits)
    }
}

impl From<PermissionSet> for u8 {
    fn from(set: PermissionSet) -> Self {
        set.bits()
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = flags_to_names(self.bits());
        if names.is_empty() {
            f.write_str("NONE")
        } else {
            f.write_str(&names.join("+"))
        }
    }
}
