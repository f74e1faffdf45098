//! Deferred post-effects
//!
//! A [`DeferredTask`] is a barrier node in the command queue. The coprocessor
//! runs it once every earlier command has been rasterized and before the
//! frame is presented, handing it read access to the depth buffer. Nothing
//! from the following frame can be visible to it.

use std::fmt;

use crate::console::DepthSampler;

type DeferredFn = Box<dyn FnOnce(&dyn DepthSampler)>;

/// Callback scheduled behind the rest of the frame
pub struct DeferredTask {
    kind: &'static str,
    run: DeferredFn,
}

impl DeferredTask {
    /// Tasks sharing a `kind` are deduplicated per frame
    pub fn new(kind: &'static str, run: impl FnOnce(&dyn DepthSampler) + 'static) -> Self {
        Self {
            kind,
            run: Box::new(run),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Consume the task
    pub fn run(self, depth: &dyn DepthSampler) {
        tracing::trace!("running deferred task '{}'", self.kind);
        (self.run)(depth);
    }
}

impl fmt::Debug for DeferredTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredTask").field("kind", &self.kind).finish_non_exhaustive()
    }
}
