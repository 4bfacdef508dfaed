//! Simulation worker thread
//!
//! Owns a [`SimState`] and, between `UpdateBuffer` and the end of each
//! frame, the transfer buffer. The loop is a plain blocking receive over the
//! host channel; every failure path sends an explicit [`WorkerMessage::Error`]
//! carrying the buffer back when the worker still holds it, so the host can
//! recover without reallocating.

use std::thread;

use crossbeam::channel::{unbounded, Receiver, Sender};

use crate::buffer::{BufferLayout, MissileBuffer};
use crate::core::config::SimConfig;
use crate::protocol::{HostMessage, SimError, WorkerMessage};
use crate::sim::SimState;

/// Spawn the worker on its own thread and return its channel endpoints
pub fn spawn(
    config: SimConfig,
) -> (
    Sender<HostMessage>,
    Receiver<WorkerMessage>,
    thread::JoinHandle<()>,
) {
    let (host_tx, host_rx) = unbounded();
    let (worker_tx, worker_rx) = unbounded();
    let handle = thread::spawn(move || run(&host_rx, &worker_tx, config));
    (host_tx, worker_rx, handle)
}

/// Worker message loop; returns when the host shuts down or disconnects
pub fn run(requests: &Receiver<HostMessage>, responses: &Sender<WorkerMessage>, config: SimConfig) {
    let mut state = SimState::new(config);
    let expected_bytes = BufferLayout::new(state.config().max_missiles).total_bytes;
    let mut buffer: Option<MissileBuffer> = None;
    let mut initialized = false;

    while let Ok(message) = requests.recv() {
        let reply = match message {
            HostMessage::Initialize { buffer: incoming } => {
                let actual = incoming.as_bytes().len();
                if actual == expected_bytes {
                    log::info!(
                        "sim worker initialized: {} slots, {} bytes",
                        state.config().max_missiles,
                        actual
                    );
                    initialized = true;
                    WorkerMessage::Initialized { buffer: incoming }
                } else {
                    WorkerMessage::Error {
                        error: SimError::LayoutMismatch {
                            expected: expected_bytes,
                            actual,
                        },
                        buffer: Some(incoming),
                    }
                }
            }

            HostMessage::UpdateBuffer { buffer: incoming } => {
                if initialized {
                    buffer = Some(incoming);
                    continue;
                }
                WorkerMessage::Error {
                    error: SimError::NotInitialized,
                    buffer: Some(incoming),
                }
            }

            HostMessage::ProcessFrame { request } => {
                if !initialized {
                    WorkerMessage::Error {
                        error: SimError::NotInitialized,
                        buffer: buffer.take(),
                    }
                } else if let Some(mut owned) = buffer.take() {
                    let results = state.process_frame(&mut owned, &request);
                    WorkerMessage::FrameResults {
                        buffer: owned,
                        results: Box::new(results),
                    }
                } else {
                    WorkerMessage::Error {
                        error: SimError::BufferNotOwned {
                            stage: "process_frame",
                        },
                        buffer: None,
                    }
                }
            }

            HostMessage::Shutdown => break,
        };

        if responses.send(reply).is_err() {
            // Host side dropped its receiver; nothing left to serve
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{FrameInput, FrameRequest};

    fn frame_request() -> FrameRequest {
        FrameRequest {
            slot_count: 0,
            id_table: Vec::new(),
            input: FrameInput::campaign(0.016, 1.0),
        }
    }

    #[test]
    fn test_process_frame_before_initialize_errors() {
        let (tx, rx, handle) = spawn(SimConfig::default().with_capacity(8));
        tx.send(HostMessage::ProcessFrame {
            request: frame_request(),
        })
        .unwrap();

        match rx.recv().unwrap() {
            WorkerMessage::Error { error, buffer } => {
                assert_eq!(error, SimError::NotInitialized);
                assert!(buffer.is_none());
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        tx.send(HostMessage::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_process_frame_without_buffer_errors() {
        let config = SimConfig::default().with_capacity(8);
        let (tx, rx, handle) = spawn(config.clone());

        let buffer = MissileBuffer::new(BufferLayout::new(config.max_missiles));
        tx.send(HostMessage::Initialize { buffer }).unwrap();
        let buffer = match rx.recv().unwrap() {
            WorkerMessage::Initialized { buffer } => buffer,
            other => panic!("unexpected reply: {other:?}"),
        };

        // Skip UpdateBuffer: the worker no longer owns the transfer buffer
        tx.send(HostMessage::ProcessFrame {
            request: frame_request(),
        })
        .unwrap();
        match rx.recv().unwrap() {
            WorkerMessage::Error { error, .. } => {
                assert_eq!(
                    error,
                    SimError::BufferNotOwned {
                        stage: "process_frame"
                    }
                );
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        drop(buffer);
        tx.send(HostMessage::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_initialize_rejects_wrong_layout() {
        let (tx, rx, handle) = spawn(SimConfig::default().with_capacity(8));

        // Sized for half the configured capacity
        let buffer = MissileBuffer::new(BufferLayout::new(4));
        tx.send(HostMessage::Initialize { buffer }).unwrap();
        match rx.recv().unwrap() {
            WorkerMessage::Error { error, buffer } => {
                assert!(matches!(error, SimError::LayoutMismatch { .. }));
                // The undersized buffer rides back to the host
                assert!(buffer.is_some());
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        tx.send(HostMessage::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_update_before_initialize_errors() {
        let (tx, rx, handle) = spawn(SimConfig::default().with_capacity(8));
        let buffer = MissileBuffer::new(BufferLayout::new(8));
        tx.send(HostMessage::UpdateBuffer { buffer }).unwrap();
        match rx.recv().unwrap() {
            WorkerMessage::Error { error, buffer } => {
                assert_eq!(error, SimError::NotInitialized);
                assert!(buffer.is_some());
            }
            other => panic!("unexpected reply: {other:?}"),
        }
        tx.send(HostMessage::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
