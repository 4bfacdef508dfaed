//! Owned missile buffer and typed attribute views
//!
//! [`MissileBuffer`] owns the contiguous storage described by a
//! [`BufferLayout`]. Storage is a boxed `u32` slice so that reinterpreting
//! subranges as `f32`/`i32` arrays is always alignment-safe. Ownership of
//! the whole buffer moves between host and worker; [`MissileViews`] borrows
//! the attribute arrays for the duration of one pass.

use crate::buffer::flags::MissileFlags;
use crate::buffer::layout::{
    BufferLayout, COLOR_COMPONENTS, METADATA_COMPONENTS, META_EXTERNAL_ID, META_FLAGS, META_KIND,
    META_WEAPON, POSITION_COMPONENTS, PROPERTY_COMPONENTS, PROP_BOMB_TIMER, PROP_DAMAGE,
    PROP_RESERVED, PROP_SIZE, VELOCITY_COMPONENTS,
};
use crate::entities::{MissileKind, MissileRecord, WeaponKind};
use crate::foundation::math::Vec3;

/// Contiguous missile storage, created once and moved between threads
#[derive(Debug)]
pub struct MissileBuffer {
    layout: BufferLayout,
    words: Box<[u32]>,
}

impl MissileBuffer {
    /// Allocate a zeroed buffer for the given layout
    pub fn new(layout: BufferLayout) -> Self {
        Self {
            layout,
            words: vec![0_u32; layout.total_words()].into_boxed_slice(),
        }
    }

    /// The layout this buffer was allocated with
    pub fn layout(&self) -> BufferLayout {
        self.layout
    }

    /// Slot capacity
    pub fn capacity(&self) -> usize {
        self.layout.max_slots
    }

    /// The raw bytes, for identity checks and serialization
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// Borrow every attribute array at once
    pub fn views(&mut self) -> MissileViews<'_> {
        let max_slots = self.layout.max_slots;
        let (positions, rest) = self.words.split_at_mut(max_slots * POSITION_COMPONENTS);
        let (velocities, rest) = rest.split_at_mut(max_slots * VELOCITY_COMPONENTS);
        let (properties, rest) = rest.split_at_mut(max_slots * PROPERTY_COMPONENTS);
        let (colors, metadata) = rest.split_at_mut(max_slots * COLOR_COMPONENTS);

        MissileViews {
            max_slots,
            positions: bytemuck::cast_slice_mut(positions),
            velocities: bytemuck::cast_slice_mut(velocities),
            properties: bytemuck::cast_slice_mut(properties),
            colors: bytemuck::cast_slice_mut(colors),
            metadata: bytemuck::cast_slice_mut(metadata),
        }
    }

    /// Overwrite every attribute of a slot and set its active bit
    ///
    /// Slots are reused without clearing stale bytes first; activation
    /// rewrites all fields, so whatever the previous occupant left behind is
    /// unobservable. A fired bomb counts as deployed: its detonation timer
    /// starts at zero.
    pub fn write_slot(&mut self, slot: usize, record: &MissileRecord) {
        let mut views = self.views();
        views.set_position(slot, record.position);
        views.set_velocity(slot, record.velocity);
        views.set_property(slot, PROP_SIZE, record.size);
        views.set_property(slot, PROP_DAMAGE, record.damage);
        views.set_property(slot, PROP_BOMB_TIMER, 0.0);
        views.set_property(slot, PROP_RESERVED, 0.0);
        views.set_color(slot, record.color);

        let mut flags = MissileFlags::ACTIVE;
        if record.homing {
            flags |= MissileFlags::HOMING;
        }
        if record.weapon == WeaponKind::Bomb {
            flags |= MissileFlags::BOMB_DEPLOYED;
        }

        let base = slot * METADATA_COMPONENTS;
        views.metadata[base + META_EXTERNAL_ID] = record.external_id;
        views.metadata[base + META_WEAPON] = record.weapon as i32;
        views.metadata[base + META_KIND] = record.kind as i32;
        views.metadata[base + META_FLAGS] = flags.bits();
    }
}

/// Mutable typed views over every attribute array of a [`MissileBuffer`]
pub struct MissileViews<'a> {
    /// Slot capacity backing these views
    pub max_slots: usize,
    /// Positions, `f32 x3` per slot
    pub positions: &'a mut [f32],
    /// Velocities, `f32 x3` per slot
    pub velocities: &'a mut [f32],
    /// Scalar properties, `f32 x4` per slot
    pub properties: &'a mut [f32],
    /// Colors, `f32 x3` per slot
    pub colors: &'a mut [f32],
    /// Integer metadata, `i32 x4` per slot
    pub metadata: &'a mut [i32],
}

impl MissileViews<'_> {
    /// Position of a slot
    pub fn position(&self, slot: usize) -> Vec3 {
        let base = slot * POSITION_COMPONENTS;
        Vec3::new(
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        )
    }

    /// Overwrite the position of a slot
    pub fn set_position(&mut self, slot: usize, position: Vec3) {
        let base = slot * POSITION_COMPONENTS;
        self.positions[base] = position.x;
        self.positions[base + 1] = position.y;
        self.positions[base + 2] = position.z;
    }

    /// Velocity of a slot
    pub fn velocity(&self, slot: usize) -> Vec3 {
        let base = slot * VELOCITY_COMPONENTS;
        Vec3::new(
            self.velocities[base],
            self.velocities[base + 1],
            self.velocities[base + 2],
        )
    }

    /// Overwrite the velocity of a slot
    pub fn set_velocity(&mut self, slot: usize, velocity: Vec3) {
        let base = slot * VELOCITY_COMPONENTS;
        self.velocities[base] = velocity.x;
        self.velocities[base + 1] = velocity.y;
        self.velocities[base + 2] = velocity.z;
    }

    /// Scalar property of a slot (see the `PROP_*` indices)
    pub fn property(&self, slot: usize, index: usize) -> f32 {
        self.properties[slot * PROPERTY_COMPONENTS + index]
    }

    /// Overwrite a scalar property of a slot
    pub fn set_property(&mut self, slot: usize, index: usize, value: f32) {
        self.properties[slot * PROPERTY_COMPONENTS + index] = value;
    }

    /// Overwrite the color of a slot
    pub fn set_color(&mut self, slot: usize, color: [f32; 3]) {
        let base = slot * COLOR_COMPONENTS;
        self.colors[base] = color[0];
        self.colors[base + 1] = color[1];
        self.colors[base + 2] = color[2];
    }

    /// Compact external id of a slot
    pub fn external_id(&self, slot: usize) -> i32 {
        self.metadata[slot * METADATA_COMPONENTS + META_EXTERNAL_ID]
    }

    /// Weapon kind of a slot
    pub fn weapon(&self, slot: usize) -> WeaponKind {
        WeaponKind::from_i32(self.metadata[slot * METADATA_COMPONENTS + META_WEAPON])
    }

    /// Missile kind of a slot
    pub fn kind(&self, slot: usize) -> MissileKind {
        MissileKind::from_i32(self.metadata[slot * METADATA_COMPONENTS + META_KIND])
    }

    /// Flag bitfield of a slot; unknown bits from reused slots are dropped
    pub fn flags(&self, slot: usize) -> MissileFlags {
        MissileFlags::from_bits_truncate(self.metadata[slot * METADATA_COMPONENTS + META_FLAGS])
    }

    /// Overwrite the flag bitfield of a slot
    pub fn set_flags(&mut self, slot: usize, flags: MissileFlags) {
        self.metadata[slot * METADATA_COMPONENTS + META_FLAGS] = flags.bits();
    }

    /// Whether a slot currently holds a live missile
    pub fn is_active(&self, slot: usize) -> bool {
        self.flags(slot).is_active()
    }

    /// Count active slots in `0..slot_count`
    pub fn count_active(&self, slot_count: usize) -> usize {
        (0..slot_count.min(self.max_slots))
            .filter(|&slot| self.is_active(slot))
            .count()
    }
}
