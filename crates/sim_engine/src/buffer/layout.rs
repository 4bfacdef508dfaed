//! Buffer layout descriptor
//!
//! Deterministic byte offsets for each attribute array given a maximum slot
//! count, so host and worker construct identical typed views over the same
//! underlying storage. Pure arithmetic over a compile-time-known schema;
//! there are no error paths here.

/// f32 components per position entry
pub const POSITION_COMPONENTS: usize = 3;

/// f32 components per velocity entry
pub const VELOCITY_COMPONENTS: usize = 3;

/// f32 components per scalar-property entry
pub const PROPERTY_COMPONENTS: usize = 4;

/// f32 components per color entry
pub const COLOR_COMPONENTS: usize = 3;

/// i32 components per metadata entry
pub const METADATA_COMPONENTS: usize = 4;

/// Property slot: collision radius
pub const PROP_SIZE: usize = 0;

/// Property slot: damage applied on hit
pub const PROP_DAMAGE: usize = 1;

/// Property slot: seconds since bomb deployment (worker-accumulated)
pub const PROP_BOMB_TIMER: usize = 2;

/// Property slot: reserved for future per-missile scalars
pub const PROP_RESERVED: usize = 3;

/// Metadata slot: compact external id
pub const META_EXTERNAL_ID: usize = 0;

/// Metadata slot: weapon kind discriminant
pub const META_WEAPON: usize = 1;

/// Metadata slot: missile kind discriminant
pub const META_KIND: usize = 2;

/// Metadata slot: flag bitfield
pub const META_FLAGS: usize = 3;

const WORD_BYTES: usize = 4;

/// Byte offsets of every attribute array within the transfer buffer
///
/// All arrays are contiguous and word-aligned; each is indexed by
/// `slot * components_per_entry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLayout {
    /// Slot capacity the buffer was sized for
    pub max_slots: usize,

    /// Byte offset of the position array (f32 x3 per slot)
    pub position_offset: usize,

    /// Byte offset of the velocity array (f32 x3 per slot)
    pub velocity_offset: usize,

    /// Byte offset of the properties array (f32 x4 per slot)
    pub properties_offset: usize,

    /// Byte offset of the color array (f32 x3 per slot)
    pub color_offset: usize,

    /// Byte offset of the metadata array (i32 x4 per slot)
    pub metadata_offset: usize,

    /// Total buffer size in bytes
    pub total_bytes: usize,
}

impl BufferLayout {
    /// Compute the layout for a given slot capacity
    pub fn new(max_slots: usize) -> Self {
        let position_offset = 0;
        let velocity_offset = position_offset + max_slots * POSITION_COMPONENTS * WORD_BYTES;
        let properties_offset = velocity_offset + max_slots * VELOCITY_COMPONENTS * WORD_BYTES;
        let color_offset = properties_offset + max_slots * PROPERTY_COMPONENTS * WORD_BYTES;
        let metadata_offset = color_offset + max_slots * COLOR_COMPONENTS * WORD_BYTES;
        let total_bytes = metadata_offset + max_slots * METADATA_COMPONENTS * WORD_BYTES;

        Self {
            max_slots,
            position_offset,
            velocity_offset,
            properties_offset,
            color_offset,
            metadata_offset,
            total_bytes,
        }
    }

    /// Total buffer size in 4-byte words
    pub fn total_words(&self) -> usize {
        self.total_bytes / WORD_BYTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrays_are_contiguous() {
        let layout = BufferLayout::new(100);
        assert_eq!(layout.position_offset, 0);
        assert_eq!(layout.velocity_offset, 100 * 3 * 4);
        assert_eq!(layout.properties_offset, layout.velocity_offset + 100 * 3 * 4);
        assert_eq!(layout.color_offset, layout.properties_offset + 100 * 4 * 4);
        assert_eq!(layout.metadata_offset, layout.color_offset + 100 * 3 * 4);
        assert_eq!(layout.total_bytes, layout.metadata_offset + 100 * 4 * 4);
    }

    #[test]
    fn test_layout_is_deterministic() {
        assert_eq!(BufferLayout::new(256), BufferLayout::new(256));
    }

    #[test]
    fn test_offsets_are_word_aligned() {
        let layout = BufferLayout::new(33);
        for offset in [
            layout.position_offset,
            layout.velocity_offset,
            layout.properties_offset,
            layout.color_offset,
            layout.metadata_offset,
            layout.total_bytes,
        ] {
            assert_eq!(offset % 4, 0);
        }
    }
}
