//! Static geometry cache
//!
//! Terrain and the city model never move, so their draw sequence is recorded
//! into a [`CommandBlock`] the first time it is needed and replayed every
//! frame after that.

use std::cell::{Cell, OnceCell};
use std::sync::Arc;

use crate::command::{BlockRecorder, CommandBlock, CommandQueue, CommandSink, ModeChange, ModelHandle};
use crate::error::CoreError;
use crate::transform::MatrixSlot;

/// Largest block the coprocessor accepts
pub const MAX_BLOCK_COMMANDS: usize = 256;

/// Lazily recorded draw sequence for static models.
///
/// The block does not set combiner, blend or antialias modes: whatever is in
/// effect when it is replayed applies to it.
#[derive(Debug)]
pub struct StaticGeometry {
    terrain: ModelHandle,
    model: ModelHandle,
    transform: MatrixSlot,
    block: OnceCell<Arc<CommandBlock>>,
    builds: Cell<u32>,
}

impl StaticGeometry {
    pub fn new(terrain: ModelHandle, model: ModelHandle, transform: MatrixSlot) -> Self {
        Self {
            terrain,
            model,
            transform,
            block: OnceCell::new(),
            builds: Cell::new(0),
        }
    }

    /// The recorded block, recording it on first use
    pub fn build(&self) -> Result<Arc<CommandBlock>, CoreError> {
        if let Some(block) = self.block.get() {
            return Ok(block.clone());
        }
        let block = Arc::new(self.record()?);
        Ok(self.block.get_or_init(|| block).clone())
    }

    /// Enqueue a replay of the block
    pub fn run(&self, queue: &mut CommandQueue) -> Result<(), CoreError> {
        queue.run_block(self.build()?);
        Ok(())
    }

    /// Number of times the block was recorded (0 or 1)
    pub fn build_count(&self) -> u32 {
        self.builds.get()
    }

    fn record(&self) -> Result<CommandBlock, CoreError> {
        let mut recorder = BlockRecorder::new();
        recorder.push_matrix(self.transform);
        recorder.draw_model(self.terrain);
        recorder.set_mode(ModeChange::Depth {
            compare: true,
            update: true,
        });
        recorder.draw_model(self.model);
        recorder.pop_matrix(1);

        if recorder.len() > MAX_BLOCK_COMMANDS {
            return Err(CoreError::BlockOverflow {
                len: recorder.len(),
                limit: MAX_BLOCK_COMMANDS,
            });
        }

        self.builds.set(self.builds.get() + 1);
        let block = recorder.finish();
        tracing::debug!("recorded static geometry block ({} commands)", block.len());
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, QueueEntry};
    use crate::transform::DeviceMemory;
    use glam::Mat4;

    fn geometry() -> StaticGeometry {
        let mut memory = DeviceMemory::new();
        let slot = memory.alloc(&Mat4::IDENTITY);
        StaticGeometry::new(ModelHandle(1), ModelHandle(2), slot)
    }

    #[test]
    fn test_block_shape() {
        let geometry = geometry();
        let block = geometry.build().unwrap();
        let commands = block.commands();
        assert_eq!(commands.len(), 5);
        assert!(matches!(commands[0], Command::PushMatrix(_)));
        assert_eq!(commands[1], Command::DrawModel(ModelHandle(1)));
        assert_eq!(
            commands[2],
            Command::SetMode(ModeChange::Depth {
                compare: true,
                update: true
            })
        );
        assert_eq!(commands[3], Command::DrawModel(ModelHandle(2)));
        assert_eq!(commands[4], Command::PopMatrix(1));
    }

    #[test]
    fn test_build_twice_records_once() {
        let geometry = geometry();
        let first = geometry.build().unwrap();
        let second = geometry.build().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(geometry.build_count(), 1);
    }

    #[test]
    fn test_run_replays_the_same_block() {
        let geometry = geometry();
        let mut queue = CommandQueue::new();
        for _ in 0..3 {
            geometry.run(&mut queue).unwrap();
        }
        assert_eq!(geometry.build_count(), 1);

        let draws: usize = queue
            .entries()
            .iter()
            .map(|entry| match entry {
                QueueEntry::RunBlock(block) => block
                    .commands()
                    .iter()
                    .filter(|c| matches!(c, Command::DrawModel(_)))
                    .count(),
                _ => 0,
            })
            .sum();
        assert_eq!(draws, 6);
    }
}
