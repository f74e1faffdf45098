//! Command consumer
//!
//! The coprocessor executes a frame's command stream against a
//! [`Rasterizer`]. It owns the transform stack: pushes resolve matrix slots
//! from device memory and draws are issued with whatever transform is current.
//! Deferred tasks run at their position in the stream, so they see every
//! earlier draw and nothing that follows.

use crate::command::{Command, CommandQueue, QueueEntry};
use crate::console::Rasterizer;
use crate::error::DeviceError;
use crate::transform::{DeviceMemory, FixedMat4, TransformStack};

/// Counters for the command stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoprocessorStats {
    /// Commands executed, including those replayed from blocks
    pub commands: u64,
    pub block_replays: u64,
    pub deferred_run: u64,
    /// Frames presented with pushes left on the stack
    pub unbalanced_frames: u64,
}

#[derive(Debug, Default)]
pub struct Coprocessor {
    stack: TransformStack,
    stats: CoprocessorStats,
}

impl Coprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stack(&self) -> &TransformStack {
        &self.stack
    }

    pub fn stats(&self) -> CoprocessorStats {
        self.stats
    }

    /// Reset the transform stack and start the device frame
    pub fn frame_start<R: Rasterizer + ?Sized>(&mut self, rasterizer: &mut R) {
        self.stack.reset();
        rasterizer.frame_start();
    }

    /// Execute the queued stream in issue order, then present
    pub fn present<R: Rasterizer + ?Sized>(
        &mut self,
        queue: &mut CommandQueue,
        memory: &DeviceMemory,
        rasterizer: &mut R,
    ) -> Result<(), DeviceError> {
        self.flush(queue, memory, rasterizer)?;

        if self.stack.depth() != 0 {
            self.stats.unbalanced_frames += 1;
            tracing::error!(
                "frame presented with {} unpopped matrix push(es)",
                self.stack.depth()
            );
        }

        rasterizer.present()
    }

    /// Execute every queued entry without presenting
    pub fn flush<R: Rasterizer + ?Sized>(
        &mut self,
        queue: &mut CommandQueue,
        memory: &DeviceMemory,
        rasterizer: &mut R,
    ) -> Result<(), DeviceError> {
        for entry in queue.take() {
            match entry {
                QueueEntry::Command(command) => self.execute(&command, memory, rasterizer)?,
                QueueEntry::RunBlock(block) => {
                    self.stats.block_replays += 1;
                    for command in block.commands() {
                        self.execute(command, memory, rasterizer)?;
                    }
                }
                QueueEntry::Deferred(task) => {
                    self.stats.deferred_run += 1;
                    task.run(rasterizer.depth());
                }
            }
        }
        Ok(())
    }

    fn execute<R: Rasterizer + ?Sized>(
        &mut self,
        command: &Command,
        memory: &DeviceMemory,
        rasterizer: &mut R,
    ) -> Result<(), DeviceError> {
        self.stats.commands += 1;
        match command {
            Command::SetMode(change) => rasterizer.set_mode(change),
            Command::PushMatrix(slot) => match memory.resolve(*slot) {
                Some(matrix) => self.stack.push(matrix),
                None => {
                    // Keep the stack balanced for the matching pop
                    tracing::error!("push of unallocated matrix slot {}", slot.index());
                    self.stack.push(&FixedMat4::IDENTITY);
                }
            },
            Command::PopMatrix(n) => self.stack.pop(*n as usize),
            Command::DrawModel(model) => rasterizer.draw_model(*model, self.stack.current())?,
            Command::DrawQuad(quad) => rasterizer.draw_quad(quad),
            Command::ClearDepth => rasterizer.clear_depth(),
        }
        Ok(())
    }
}
