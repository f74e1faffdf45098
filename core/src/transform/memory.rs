//! Device-visible matrix memory
//!
//! The coprocessor reads matrices from memory the CPU only ever writes to.
//! Host code gets an opaque [`MatrixSlot`] back from [`DeviceMemory::alloc`]
//! and can overwrite it, but there is no host API to read a slot back. Only
//! the coprocessor resolves slots, when it consumes a push.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use super::{FixedMat4, Srt};

/// Handle to one fixed-point matrix in device memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatrixSlot(u32);

impl MatrixSlot {
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Write-only storage for fixed-point matrices.
///
/// Every slot is written at allocation time, so a push can never observe
/// uninitialised contents.
#[derive(Debug, Default)]
pub struct DeviceMemory {
    slots: Vec<FixedMat4>,
}

impl DeviceMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a slot holding `matrix` converted to fixed point
    pub fn alloc(&mut self, matrix: &Mat4) -> MatrixSlot {
        let slot = MatrixSlot(self.slots.len() as u32);
        self.slots.push(FixedMat4::from_mat4(matrix));
        slot
    }

    /// Allocate a slot holding the matrix built from `srt`
    pub fn alloc_srt(&mut self, srt: &Srt) -> MatrixSlot {
        self.alloc(&srt.to_mat4())
    }

    /// Overwrite a slot, converting to fixed point on the way in
    pub fn write(&mut self, slot: MatrixSlot, matrix: &Mat4) {
        match self.slots.get_mut(slot.0 as usize) {
            Some(dst) => *dst = FixedMat4::from_mat4(matrix),
            None => tracing::error!("write to unallocated matrix slot {}", slot.0),
        }
    }

    /// Rebuild a slot from scale/rotation/translation
    pub fn write_srt(&mut self, slot: MatrixSlot, srt: &Srt) {
        self.write(slot, &srt.to_mat4());
    }

    /// Number of allocated slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Device-side read of a slot
    pub(crate) fn resolve(&self, slot: MatrixSlot) -> Option<&FixedMat4> {
        self.slots.get(slot.0 as usize)
    }
}
