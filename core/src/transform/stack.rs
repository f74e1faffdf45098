//! Matrix stack consumed by the coprocessor

use smallvec::SmallVec;

use super::FixedMat4;

/// Stack of composed fixed-point transforms with identity at the base.
///
/// A push multiplies the new matrix into the current transform. `pop(n)`
/// restores the transform that was active `n` pushes ago.
#[derive(Debug, Clone)]
pub struct TransformStack {
    entries: SmallVec<[FixedMat4; 8]>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        let mut entries = SmallVec::new();
        entries.push(FixedMat4::IDENTITY);
        Self { entries }
    }

    /// Compose `matrix` onto the current transform
    pub fn push(&mut self, matrix: &FixedMat4) {
        let composed = self.current().multiply(matrix);
        self.entries.push(composed);
    }

    /// Drop the last `n` pushes.
    ///
    /// Popping past the base is logged and clamps at identity.
    pub fn pop(&mut self, n: usize) {
        let depth = self.depth();
        if n > depth {
            tracing::error!("transform stack underflow: pop({n}) at depth {depth}");
        }
        self.entries.truncate(1 + depth.saturating_sub(n));
    }

    /// Transform applied to draws issued now
    #[inline]
    pub fn current(&self) -> &FixedMat4 {
        // The base entry is never removed
        &self.entries[self.entries.len() - 1]
    }

    /// Number of pushes not yet popped
    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len() - 1
    }

    /// Back to identity, called at frame start
    pub fn reset(&mut self) {
        self.entries.truncate(1);
    }
}
