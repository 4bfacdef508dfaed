//! Host-side engine facade
//!
//! [`SimHost`] is the single entry point for the game loop: it owns the
//! worker thread, tracks which side currently holds the transfer buffer, and
//! exposes slot writes only while the buffer is on the host side. At most one
//! frame is in flight at a time; a `begin_frame` that arrives while the
//! worker is still busy is dropped, not queued, so a slow simulation frame
//! never builds a backlog.

use std::thread;

use crossbeam::channel::{Receiver, Sender, TryRecvError};

use crate::buffer::{BufferLayout, MissileBuffer, MissileFlags};
use crate::core::config::SimConfig;
use crate::entities::MissileRecord;
use crate::protocol::{FrameInput, FrameRequest, FrameResults, HostMessage, SimError, WorkerMessage};
use crate::sim::worker;

/// Handle to the simulation worker, owned by the game loop thread
#[derive(Debug)]
pub struct SimHost {
    config: SimConfig,
    layout: BufferLayout,
    /// `Some` while the host owns the transfer buffer
    buffer: Option<MissileBuffer>,
    /// Compact external id -> caller entity id
    id_table: Vec<u64>,
    /// Highest slot ever written, plus one; the worker only visits this prefix
    high_water: usize,
    in_flight: bool,
    to_worker: Sender<HostMessage>,
    from_worker: Receiver<WorkerMessage>,
    worker: Option<thread::JoinHandle<()>>,
}

impl SimHost {
    /// Validate the configuration, spawn the worker, and run the
    /// `Initialize` handshake
    pub fn spawn(config: SimConfig) -> Result<Self, SimError> {
        config
            .validate()
            .map_err(|e| SimError::InvalidConfig(e.to_string()))?;

        let layout = BufferLayout::new(config.max_missiles);
        let (to_worker, from_worker, handle) = worker::spawn(config.clone());

        let mut host = Self {
            config,
            layout,
            buffer: None,
            id_table: Vec::new(),
            high_water: 0,
            in_flight: false,
            to_worker,
            from_worker,
            worker: Some(handle),
        };
        host.handshake(MissileBuffer::new(layout))?;
        Ok(host)
    }

    /// The configuration this engine runs with
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Fixed missile slot capacity
    pub fn capacity(&self) -> usize {
        self.layout.max_slots
    }

    /// Whether a frame is currently being simulated
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether the host currently owns the transfer buffer
    pub fn owns_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    /// Replace the external id side table
    ///
    /// Index is the compact id written into buffer metadata; the value is
    /// the caller's own entity id reported back in hit lists.
    pub fn set_id_table(&mut self, table: Vec<u64>) {
        self.id_table = table;
    }

    /// Overwrite one slot with a new missile
    pub fn write_slot(&mut self, slot: usize, record: &MissileRecord) -> Result<(), SimError> {
        if slot >= self.layout.max_slots {
            return Err(SimError::SlotOutOfRange {
                slot,
                capacity: self.layout.max_slots,
            });
        }
        let buffer = self.buffer.as_mut().ok_or(SimError::BufferNotOwned {
            stage: "write_slot",
        })?;
        buffer.write_slot(slot, record);
        self.high_water = self.high_water.max(slot + 1);
        Ok(())
    }

    /// Clear a slot's active bit so the slot can be reused
    ///
    /// The host-side half of the slot lifecycle: called after consuming a
    /// hit entry from the previous frame's results, once the surrounding
    /// game state has applied the damage.
    pub fn retire_slot(&mut self, slot: usize) -> Result<(), SimError> {
        if slot >= self.layout.max_slots {
            return Err(SimError::SlotOutOfRange {
                slot,
                capacity: self.layout.max_slots,
            });
        }
        let buffer = self.buffer.as_mut().ok_or(SimError::BufferNotOwned {
            stage: "retire_slot",
        })?;
        let mut views = buffer.views();
        let flags = views.flags(slot) & !MissileFlags::ACTIVE;
        views.set_flags(slot, flags);
        Ok(())
    }

    /// Write a missile into the first free slot and return it
    pub fn fire(&mut self, record: &MissileRecord) -> Result<usize, SimError> {
        let capacity = self.layout.max_slots;
        let slot = {
            let buffer = self.buffer.as_mut().ok_or(SimError::BufferNotOwned {
                stage: "fire",
            })?;
            let views = buffer.views();
            (0..capacity)
                .find(|&slot| !views.is_active(slot))
                .ok_or(SimError::CapacityExhausted { capacity })?
        };
        self.write_slot(slot, record)?;
        Ok(slot)
    }

    /// Hand the buffer to the worker and request one simulation step
    ///
    /// Returns `Ok(false)` without sending anything when the previous frame
    /// has not come back yet.
    pub fn begin_frame(&mut self, input: FrameInput) -> Result<bool, SimError> {
        if self.in_flight {
            log::debug!("frame dropped: previous frame still in flight");
            return Ok(false);
        }
        let buffer = self.buffer.take().ok_or(SimError::BufferNotOwned {
            stage: "begin_frame",
        })?;

        let request = FrameRequest {
            slot_count: self.high_water,
            id_table: self.id_table.clone(),
            input,
        };
        self.send(HostMessage::UpdateBuffer { buffer })?;
        self.send(HostMessage::ProcessFrame { request })?;
        self.in_flight = true;
        Ok(true)
    }

    /// Non-blocking check for the in-flight frame's results
    pub fn poll(&mut self) -> Result<Option<Box<FrameResults>>, SimError> {
        match self.from_worker.try_recv() {
            Ok(message) => self.accept(message).map(Some),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SimError::WorkerDisconnected),
        }
    }

    /// Block until the in-flight frame's results arrive
    pub fn wait(&mut self) -> Result<Box<FrameResults>, SimError> {
        if !self.in_flight {
            return Err(SimError::BufferNotOwned { stage: "wait" });
        }
        let message = self
            .from_worker
            .recv()
            .map_err(|_| SimError::WorkerDisconnected)?;
        self.accept(message)
    }

    /// Discard all missiles and redo the `Initialize` handshake
    ///
    /// The recovery path after a [`SimError`] left the worker without a
    /// usable buffer.
    pub fn reinitialize(&mut self) -> Result<(), SimError> {
        self.buffer = None;
        self.in_flight = false;
        self.high_water = 0;
        self.handshake(MissileBuffer::new(self.layout))
    }

    fn handshake(&mut self, buffer: MissileBuffer) -> Result<(), SimError> {
        self.send(HostMessage::Initialize { buffer })?;
        match self
            .from_worker
            .recv()
            .map_err(|_| SimError::WorkerDisconnected)?
        {
            WorkerMessage::Initialized { buffer } => {
                self.buffer = Some(buffer);
                Ok(())
            }
            WorkerMessage::Error { error, buffer } => {
                self.buffer = buffer;
                Err(error)
            }
            WorkerMessage::FrameResults { .. } => {
                // No frame can be outstanding during a handshake
                Err(SimError::WorkerDisconnected)
            }
        }
    }

    fn accept(&mut self, message: WorkerMessage) -> Result<Box<FrameResults>, SimError> {
        match message {
            WorkerMessage::FrameResults { buffer, results } => {
                self.buffer = Some(buffer);
                self.in_flight = false;
                Ok(results)
            }
            WorkerMessage::Error { error, buffer } => {
                self.buffer = buffer;
                self.in_flight = false;
                Err(error)
            }
            WorkerMessage::Initialized { buffer } => {
                // A stale handshake reply; keep the buffer, report no frame
                self.buffer = Some(buffer);
                self.in_flight = false;
                Err(SimError::BufferNotOwned { stage: "poll" })
            }
        }
    }

    fn send(&self, message: HostMessage) -> Result<(), SimError> {
        self.to_worker
            .send(message)
            .map_err(|_| SimError::WorkerDisconnected)
    }
}

impl Drop for SimHost {
    fn drop(&mut self) {
        let _ = self.to_worker.send(HostMessage::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}
