//! Structure-of-arrays missile transfer buffer
//!
//! One contiguous, word-aligned allocation holds every missile attribute
//! array back to back: positions, velocities, scalar properties, colors,
//! and integer metadata. The buffer is created once at startup, sized for
//! peak capacity, and moved (never copied) between the host and the
//! simulation worker.

pub mod flags;
pub mod layout;
pub mod views;

pub use flags::MissileFlags;
pub use layout::{
    BufferLayout, COLOR_COMPONENTS, METADATA_COMPONENTS, META_EXTERNAL_ID, META_FLAGS, META_KIND,
    META_WEAPON, POSITION_COMPONENTS, PROPERTY_COMPONENTS, PROP_BOMB_TIMER, PROP_DAMAGE,
    PROP_RESERVED, PROP_SIZE, VELOCITY_COMPONENTS,
};
pub use views::{MissileBuffer, MissileViews};
