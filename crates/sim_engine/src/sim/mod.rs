//! Simulation worker core
//!
//! One frame of simulation is a fixed pipeline over the transfer buffer:
//! physics integration with homing and culling, then spatial grid rebuild
//! and broad-phase collision detection. All per-worker state lives in an
//! explicit [`SimState`] constructed at worker start; there are no hidden
//! module-level globals.

pub mod collision;
pub mod hit_resolver;
pub mod physics;
pub mod worker;

use crate::buffer::MissileBuffer;
use crate::core::config::SimConfig;
use crate::foundation::time::Stopwatch;
use crate::protocol::{FrameRequest, FrameResults};
use crate::spatial::SpatialHashGrid;

/// Per-worker simulation state, replaced only at worker start
pub struct SimState {
    config: SimConfig,
    grid: SpatialHashGrid,
}

impl SimState {
    /// Build worker state from a configuration
    pub fn new(config: SimConfig) -> Self {
        let grid = SpatialHashGrid::new(config.cell_size);
        Self { config, grid }
    }

    /// The configuration this worker runs with
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run one simulation step over an owned buffer
    ///
    /// Every active slot in the prefix is visited exactly once; no slot is
    /// integrated after being culled in the same pass.
    pub fn process_frame(
        &mut self,
        buffer: &mut MissileBuffer,
        request: &FrameRequest,
    ) -> FrameResults {
        let slot_count = request.slot_count.min(buffer.capacity());
        let mut results = FrameResults::default();
        let mut views = buffer.views();

        let watch = Stopwatch::start_new();
        physics::run(&mut views, slot_count, request, &self.config, &mut results);
        results.stats.physics_micros = watch.elapsed_micros();

        let watch = Stopwatch::start_new();
        collision::run(
            &mut self.grid,
            &views,
            slot_count,
            request,
            &self.config,
            &mut results,
        );
        results.stats.collision_micros = watch.elapsed_micros();

        results.active_count = views.count_active(slot_count);
        results
    }
}

/// Resolve a compact external id through the host-provided side table
///
/// Falls back to the compact value itself for ids the table does not cover,
/// so a stale table degrades to traceable output instead of a panic.
pub(crate) fn resolve_missile_id(id_table: &[u64], external_id: i32) -> u64 {
    usize::try_from(external_id)
        .ok()
        .and_then(|index| id_table.get(index).copied())
        .unwrap_or(external_id.max(0) as u64)
}
