//! The persistence slot holding the serialized roadmap.
//!
//! One slot, whole-value reads and writes. [`AppDbState`](crate::local_db_state::AppDbState)
//! backs it with LMDB; [`MemoryStore`] keeps it in process.

use crate::app_response::AppResponse;

pub trait SnapshotStore {
    /// Reads the slot. `Ok(None)` means nothing was ever written.
    fn read(&self) -> Result<Option<String>, AppResponse>;

    /// Replaces the slot contents with `payload`.
    fn write(&mut self, payload: &str) -> Result<(), AppResponse>;

    /// Empties the slot. Clearing an empty slot is not an error.
    fn clear(&mut self) -> Result<(), AppResponse>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn read(&self) -> Result<Option<String>, AppResponse> {
        (**self).read()
    }

    fn write(&mut self, payload: &str) -> Result<(), AppResponse> {
        (**self).write(payload)
    }

    fn clear(&mut self) -> Result<(), AppResponse> {
        (**self).clear()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    slot: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `payload`, as if written by an earlier run.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Some(payload.into()),
            writes: 0,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    /// Number of successful writes since construction.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, AppResponse> {
        Ok(self.slot.clone())
    }

    fn write(&mut self, payload: &str) -> Result<(), AppResponse> {
        self.slot = Some(payload.to_string());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), AppResponse> {
        self.slot = None;
        Ok(())
    }
}
