//! Command stream
//!
//! Everything the coprocessor executes is issued as a [`Command`] into the
//! per-frame [`CommandQueue`], or recorded once into an immutable
//! [`CommandBlock`] and replayed from the queue. Commands are plain data so a
//! frame's stream can be inspected and serialized.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use skyfly_shared::Rgba8;
use smallvec::SmallVec;

use crate::deferred::DeferredTask;
use crate::transform::MatrixSlot;

/// Loaded model, as returned by an [`AssetLoader`](crate::AssetLoader)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelHandle(pub u32);

/// Colour combiner configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combiner {
    /// Vertex shade only
    #[default]
    Shade,
    /// Texture modulated by vertex shade
    TexShade,
    /// `lerp(env, prim, shade.a)` colour, opaque
    Gradient,
    /// Prim colour with alpha from the scrolled cloud texture, coverage set by `env.a`
    Clouds,
    /// `lerp(prim, env, env.a)` colour, `prim.a * tex` alpha
    Flare,
}

/// Framebuffer blend configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Blender {
    #[default]
    Opaque,
    /// Source weighted by its alpha over memory: `src·a + dst·(1 − a)`
    Multiply,
    /// `src·a + dst`, saturating
    Additive,
}

/// Edge antialiasing mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Antialias {
    #[default]
    Off,
    Standard,
    Reduced,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    #[default]
    Point,
    Bilinear,
}

/// One render mode change.
///
/// Modes are sticky: a change stays in effect until overwritten or until
/// [`ModeChange::Standard`] resets every mode to its default. Colour
/// registers and tile offsets are not modes and survive the reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModeChange {
    Standard,
    Combiner(Combiner),
    Depth { compare: bool, update: bool },
    Antialias(Antialias),
    Filter(Filter),
    EnvColor(Rgba8),
    PrimColor(Rgba8),
    Blender(Blender),
    /// Scroll offset of a texture tile, in texture repeats
    TexOffset { tile: u8, offset: [f32; 2] },
}

/// Axis-aligned screen-space quad in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenQuad {
    pub min: [f32; 2],
    pub max: [f32; 2],
    /// Primitive colour for this quad
    pub color: Rgba8,
    /// Quad depth (0 = near, 1 = far), compared only when depth compare is on
    pub depth: f32,
}

/// A single coprocessor command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SetMode(ModeChange),
    /// Compose the matrix stored in a device memory slot onto the stack
    PushMatrix(MatrixSlot),
    /// Drop the last `n` pushes
    PopMatrix(u16),
    DrawModel(ModelHandle),
    DrawQuad(ScreenQuad),
    ClearDepth,
}

/// Anything commands can be issued into.
///
/// Implemented by the live [`CommandQueue`] and by [`BlockRecorder`], so the
/// same drawing code can either submit or record.
pub trait CommandSink {
    fn push_command(&mut self, command: Command);

    fn set_mode(&mut self, change: ModeChange) {
        self.push_command(Command::SetMode(change));
    }

    fn push_matrix(&mut self, slot: MatrixSlot) {
        self.push_command(Command::PushMatrix(slot));
    }

    fn pop_matrix(&mut self, n: u16) {
        self.push_command(Command::PopMatrix(n));
    }

    fn draw_model(&mut self, model: ModelHandle) {
        self.push_command(Command::DrawModel(model));
    }

    fn draw_quad(&mut self, quad: ScreenQuad) {
        self.push_command(Command::DrawQuad(quad));
    }

    fn clear_depth(&mut self) {
        self.push_command(Command::ClearDepth);
    }
}

/// Immutable recorded command sequence.
///
/// Shared behind an `Arc` and replayed from the queue without copying.
/// Blocks never contain deferred tasks.
#[derive(Debug, PartialEq)]
pub struct CommandBlock {
    commands: Box<[Command]>,
}

impl CommandBlock {
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Records commands into a [`CommandBlock`]
#[derive(Debug, Default)]
pub struct BlockRecorder {
    commands: Vec<Command>,
}

impl BlockRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn finish(self) -> CommandBlock {
        CommandBlock {
            commands: self.commands.into_boxed_slice(),
        }
    }
}

impl CommandSink for BlockRecorder {
    fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }
}

/// One node of the frame's command stream
#[derive(Debug)]
pub enum QueueEntry {
    Command(Command),
    /// Replay of a recorded block
    RunBlock(Arc<CommandBlock>),
    /// Ordering barrier: runs after every earlier entry, before present
    Deferred(DeferredTask),
}

/// Ordered per-frame command stream.
///
/// Issuing never blocks. The coprocessor drains the queue in issue order when
/// the frame is presented.
#[derive(Debug, Default)]
pub struct CommandQueue {
    entries: Vec<QueueEntry>,
    deferred_kinds: SmallVec<[&'static str; 4]>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a replay of `block`
    pub fn run_block(&mut self, block: Arc<CommandBlock>) {
        self.entries.push(QueueEntry::RunBlock(block));
    }

    /// Schedule `task` behind everything issued so far.
    ///
    /// Only one task of each kind is accepted per frame. A duplicate is
    /// dropped and `false` returned.
    pub fn call_deferred(&mut self, task: DeferredTask) -> bool {
        let kind = task.kind();
        if self.deferred_kinds.contains(&kind) {
            tracing::warn!("deferred task '{kind}' already scheduled this frame, dropping duplicate");
            return false;
        }
        self.deferred_kinds.push(kind);
        self.entries.push(QueueEntry::Deferred(task));
        true
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take every entry in issue order, starting a new frame
    pub fn take(&mut self) -> Vec<QueueEntry> {
        self.deferred_kinds.clear();
        std::mem::take(&mut self.entries)
    }
}

impl CommandSink for CommandQueue {
    fn push_command(&mut self, command: Command) {
        self.entries.push(QueueEntry::Command(command));
    }
}
