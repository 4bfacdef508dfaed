//! # Sim Engine
//!
//! Off-thread missile simulation and collision detection for a real-time
//! game loop. The render thread stays free: missile state crosses to a
//! dedicated worker thread inside one contiguous structure-of-arrays buffer
//! whose ownership is *moved*, never copied, in each direction.
//!
//! ## Architecture
//!
//! - **Buffer**: a fixed-capacity SOA layout (positions, velocities,
//!   per-missile properties, colors, integer metadata) over word-aligned
//!   storage, viewed through typed slices.
//! - **Host**: single writer of the buffer between frames; transfers it to
//!   the worker together with read-only entity snapshots.
//! - **Worker**: integrates physics, steers homing missiles, culls
//!   out-of-play slots, rebuilds a uniform spatial hash over aliens and
//!   asteroids, and reports broad-phase collision hits back with the buffer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sim_engine::prelude::*;
//!
//! fn main() -> Result<(), SimError> {
//!     let config = SimConfig::default();
//!     let mut host = SimHost::spawn(config)?;
//!
//!     let slot = host.fire(&MissileRecord::player_shot(
//!         Vec3::new(0.0, 0.0, 48.0),
//!         Vec3::new(0.0, 0.0, -1.0),
//!         WeaponKind::Default,
//!     ))?;
//!     let _ = slot;
//!
//!     host.begin_frame(FrameInput::campaign(0.016, 1.0))?;
//!     while host.in_flight() {
//!         if let Some(results) = host.poll()? {
//!             log::info!("{} missiles active", results.active_count);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod foundation;

pub mod buffer;
pub mod entities;
pub mod host;
pub mod protocol;
pub mod sim;
pub mod spatial;

pub use host::SimHost;
pub use protocol::{FrameInput, FrameResults, SimError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        buffer::{BufferLayout, MissileBuffer, MissileFlags},
        core::config::SimConfig,
        entities::{
            AlienSnapshot, AsteroidSnapshot, GameMode, HitComponent, MissileKind, MissileRecord,
            PlayerSnapshot, WeaponKind,
        },
        foundation::math::Vec3,
        host::SimHost,
        protocol::{FrameInput, FrameResults, FrameStats, SimError},
    };
}
