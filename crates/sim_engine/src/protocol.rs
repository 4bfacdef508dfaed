//! Host/worker message protocol
//!
//! The envelope and state machine governing which side currently owns the
//! transfer buffer. Messages are a closed, tagged set checked exhaustively
//! at compile time; buffer ownership transfers by moving the
//! [`MissileBuffer`] value into the message, after which the sender has
//! nothing left to dereference.
//!
//! Protocol per frame, from the host's point of view:
//! `Initialize -> Initialized` once at startup, then
//! `UpdateBuffer -> ProcessFrame -> FrameResults` per simulated frame.
//! Any worker failure surfaces as an explicit [`WorkerMessage::Error`],
//! never a silent drop.

use crate::buffer::MissileBuffer;
use crate::entities::{
    AlienSnapshot, AsteroidSnapshot, GameMode, HitComponent, PlayerSnapshot,
};
use crate::foundation::math::Vec3;

/// Unrecoverable (for this frame) simulation failures
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A frame was requested before the Initialize handshake completed
    #[error("simulation worker has not been initialized")]
    NotInitialized,

    /// The side at `stage` needed the buffer but does not currently own it
    #[error("transfer buffer not owned at stage `{stage}`")]
    BufferNotOwned {
        /// Pipeline stage that required ownership
        stage: &'static str,
    },

    /// Buffer byte size disagrees with the layout descriptor
    #[error("buffer layout mismatch: expected {expected} bytes, got {actual}")]
    LayoutMismatch {
        /// Bytes the layout calls for
        expected: usize,
        /// Bytes actually received
        actual: usize,
    },

    /// Host wrote past the fixed slot capacity
    #[error("slot {slot} out of range (capacity {capacity})")]
    SlotOutOfRange {
        /// Offending slot index
        slot: usize,
        /// Fixed buffer capacity
        capacity: usize,
    },

    /// No free slot for a new missile; the engine never grows mid-flight
    #[error("no free missile slot (capacity {capacity})")]
    CapacityExhausted {
        /// Fixed buffer capacity
        capacity: usize,
    },

    /// The worker thread is gone; the host must respawn and reinitialize
    #[error("simulation worker disconnected")]
    WorkerDisconnected,

    /// Configuration failed validation at host spawn
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Per-frame simulation inputs supplied by the host
#[derive(Debug, Clone)]
pub struct FrameInput {
    /// Live aliens, refreshed every frame
    pub aliens: Vec<AlienSnapshot>,
    /// Asteroids, refreshed every frame
    pub asteroids: Vec<AsteroidSnapshot>,
    /// Player state
    pub player: PlayerSnapshot,
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// Global time scale (slow-time effects); 1.0 is real time
    pub time_multiplier: f32,
    /// Active game mode, selecting the culling policy
    pub mode: GameMode,
}

impl FrameInput {
    /// Campaign-mode frame with no entities (snapshots added by the caller)
    pub fn campaign(delta_time: f32, time_multiplier: f32) -> Self {
        Self {
            aliens: Vec::new(),
            asteroids: Vec::new(),
            player: PlayerSnapshot::default(),
            delta_time,
            time_multiplier,
            mode: GameMode::Campaign,
        }
    }

    /// Free-flight frame with no entities
    pub fn free_flight(delta_time: f32, time_multiplier: f32) -> Self {
        Self {
            mode: GameMode::FreeFlight,
            ..Self::campaign(delta_time, time_multiplier)
        }
    }
}

impl Default for FrameInput {
    fn default() -> Self {
        Self::campaign(0.0, 1.0)
    }
}

/// One frame's worth of work, as sent across the channel
#[derive(Debug)]
pub struct FrameRequest {
    /// Highest slot the host has ever written, plus one; the worker only
    /// visits this prefix
    pub slot_count: usize,
    /// Compact external id -> caller entity id, rebuilt by the host whenever
    /// missile identities change
    pub id_table: Vec<u64>,
    /// Snapshots and timing for this frame
    pub input: FrameInput,
}

/// A player-side missile struck an alien
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlienHit {
    /// Buffer slot of the missile, for host-side retirement
    pub slot: usize,
    /// Caller id of the missile (resolved through the id table)
    pub missile_id: u64,
    /// Struck alien
    pub alien_id: u32,
    /// Contact distance at detection time
    pub distance: f32,
    /// Which sub-part absorbed the hit
    pub component: HitComponent,
    /// Damage carried by the missile
    pub damage: f32,
}

/// A player-side missile struck an asteroid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidHit {
    /// Buffer slot of the missile, for host-side retirement
    pub slot: usize,
    /// Caller id of the missile
    pub missile_id: u64,
    /// Struck asteroid
    pub asteroid_id: u32,
    /// Contact distance at detection time
    pub distance: f32,
    /// Damage carried by the missile
    pub damage: f32,
}

/// An alien missile struck the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerHit {
    /// Buffer slot of the missile, for host-side retirement
    pub slot: usize,
    /// Caller id of the missile
    pub missile_id: u64,
    /// Contact distance at detection time
    pub distance: f32,
    /// Which part of the player's ship absorbed the hit
    pub component: HitComponent,
    /// Damage carried by the missile
    pub damage: f32,
}

/// A deployed bomb whose detonation timer elapsed this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BombExplosion {
    /// Buffer slot of the bomb
    pub slot: usize,
    /// Caller id of the bomb missile
    pub missile_id: u64,
    /// Detonation position
    pub position: Vec3,
}

/// Counters and timings for one simulated frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Slots whose position was integrated
    pub integrated: u32,
    /// Slots deactivated by boundary culling
    pub culled: u32,
    /// Homing guidance updates applied
    pub homing_updates: u32,
    /// Snapshot entries skipped for non-finite data
    pub skipped_snapshots: u32,
    /// Occupied spatial hash cells after the rebuild
    pub grid_cells: u32,
    /// Candidate contact tests performed by the broad phase
    pub candidates_tested: u32,
    /// Physics + homing pass duration
    pub physics_micros: u64,
    /// Grid build + broad phase duration
    pub collision_micros: u64,
}

/// Everything the worker learned in one frame, returned with the buffer
#[derive(Debug, Clone, Default)]
pub struct FrameResults {
    /// Live missiles remaining after culling
    pub active_count: usize,
    /// Slots deactivated by boundary culling this frame (detonated bombs
    /// are also deactivated, but appear in `explosions` instead)
    pub culled_slots: Vec<u32>,
    /// Missile-vs-alien contacts, at most one (the closest) per missile
    pub alien_hits: Vec<AlienHit>,
    /// Missile-vs-asteroid contacts, at most one per missile
    pub asteroid_hits: Vec<AsteroidHit>,
    /// Alien-missile-vs-player contacts
    pub player_hits: Vec<PlayerHit>,
    /// Bombs that should detonate now
    pub explosions: Vec<BombExplosion>,
    /// Frame statistics
    pub stats: FrameStats,
}

/// Messages the host sends to the worker
#[derive(Debug)]
pub enum HostMessage {
    /// First-time setup; the worker validates the buffer against its layout
    Initialize {
        /// Buffer ownership moves to the worker
        buffer: MissileBuffer,
    },
    /// Re-arm the worker with a freshly written buffer for this frame
    UpdateBuffer {
        /// Buffer ownership moves to the worker
        buffer: MissileBuffer,
    },
    /// Run one simulation step over the currently owned buffer
    ProcessFrame {
        /// Snapshots, timing, and the id side table
        request: FrameRequest,
    },
    /// Stop the worker thread
    Shutdown,
}

/// Messages the worker sends back to the host
#[derive(Debug)]
pub enum WorkerMessage {
    /// Handshake complete; buffer ownership returns to the host
    Initialized {
        /// Buffer ownership moves back to the host
        buffer: MissileBuffer,
    },
    /// One step complete; buffer ownership returns to the host
    FrameResults {
        /// Buffer ownership moves back to the host
        buffer: MissileBuffer,
        /// Collision lists and statistics
        results: Box<FrameResults>,
    },
    /// Unrecoverable condition for this frame
    Error {
        /// What failed, with enough context to diagnose without re-running
        error: SimError,
        /// The buffer rides back if the worker still held it; otherwise the
        /// host must reinitialize with a fresh buffer
        buffer: Option<MissileBuffer>,
    },
}
