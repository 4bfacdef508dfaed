//! Missile flag bitfield
//!
//! Packed into one metadata word per slot; exposed as a typed bitfield with
//! named predicates instead of inline masking scattered through the passes.

use bitflags::bitflags;

bitflags! {
    /// Per-missile state bits stored in the metadata flag word
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MissileFlags: i32 {
        /// Slot is in use; inactive slots are skipped by every pass
        const ACTIVE = 1 << 0;
        /// Homing guidance steers this missile toward the nearest alien
        const HOMING = 1 << 1;
        /// A bomb has been released and its detonation timer is running
        const BOMB_DEPLOYED = 1 << 2;
        /// The bomb detonated; set by the worker as it clears ACTIVE
        const EXPLODED = 1 << 3;
    }
}

impl MissileFlags {
    /// Slot is in use
    pub fn is_active(self) -> bool {
        self.contains(Self::ACTIVE)
    }

    /// Homing guidance enabled
    pub fn is_homing(self) -> bool {
        self.contains(Self::HOMING)
    }

    /// Bomb timer is running
    pub fn is_bomb_deployed(self) -> bool {
        self.contains(Self::BOMB_DEPLOYED)
    }

    /// Bomb already detonated
    pub fn has_exploded(self) -> bool {
        self.contains(Self::EXPLODED)
    }
}
