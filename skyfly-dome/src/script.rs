//! Scripted controller input
//!
//! Replays a TOML input script one frame per poll:
//!
//! ```toml
//! [[step]]
//! frames = 60
//! held = ["d_up"]
//!
//! [[step]]
//! frames = 30
//! stick_x = 40
//! ```
//!
//! Once the script runs out every poll returns an idle frame.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use skyfly_core::{Buttons, InputFrame, InputSource};

/// Errors from loading an input script
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read input script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse input script: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown button '{name}' in step {step}")]
    UnknownButton { step: usize, name: String },
}

#[derive(Debug, Deserialize)]
struct ScriptFile {
    #[serde(default)]
    step: Vec<StepEntry>,
}

#[derive(Debug, Deserialize)]
struct StepEntry {
    #[serde(default = "default_frames")]
    frames: u32,
    #[serde(default)]
    stick_x: i8,
    #[serde(default)]
    stick_y: i8,
    #[serde(default)]
    held: Vec<String>,
}

fn default_frames() -> u32 {
    1
}

/// Input held for a number of frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    pub frames: u32,
    pub input: InputFrame,
}

/// [`InputSource`] replaying a fixed list of steps
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: Vec<ScriptStep>,
    cursor: usize,
    consumed: u32,
    played: u64,
    polls: u64,
}

impl ScriptedInput {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps,
            ..Default::default()
        }
    }

    /// Read and parse a script file
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let script: ScriptedInput = content.parse()?;
        tracing::debug!(
            "Loaded input script {} ({} frames)",
            path.display(),
            script.total_frames()
        );
        Ok(script)
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Frames covered by the script
    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|step| step.frames as u64).sum()
    }

    /// Times `poll` was called
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Whether every scripted frame has been played
    pub fn is_finished(&self) -> bool {
        self.played >= self.total_frames()
    }
}

impl FromStr for ScriptedInput {
    type Err = ScriptError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let file: ScriptFile = toml::from_str(source)?;
        let steps = file
            .step
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let mut held = Buttons::empty();
                for name in &entry.held {
                    held |= Buttons::from_script_name(name).ok_or_else(|| ScriptError::UnknownButton {
                        step: index,
                        name: name.clone(),
                    })?;
                }
                Ok(ScriptStep {
                    frames: entry.frames,
                    input: InputFrame {
                        stick_x: entry.stick_x,
                        stick_y: entry.stick_y,
                        held,
                    },
                })
            })
            .collect::<Result<Vec<_>, ScriptError>>()?;
        Ok(Self::new(steps))
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        self.polls += 1;
        while let Some(step) = self.steps.get(self.cursor) {
            if self.consumed < step.frames {
                self.consumed += 1;
                self.played += 1;
                return step.input;
            }
            self.cursor += 1;
            self.consumed = 0;
        }
        InputFrame::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCRIPT: &str = r#"
        [[step]]
        frames = 2
        held = ["d_up", "l"]

        [[step]]
        frames = 0
        held = ["z"]

        [[step]]
        stick_x = -40
        stick_y = 12
    "#;

    #[test]
    fn test_steps_replay_in_order_then_idle() {
        let mut input: ScriptedInput = SCRIPT.parse().unwrap();
        assert_eq!(input.total_frames(), 3);

        let forward = InputFrame::holding(Buttons::D_UP | Buttons::L);
        assert_eq!(input.poll(), forward);
        assert_eq!(input.poll(), forward);
        assert!(!input.is_finished());

        let turn = input.poll();
        assert_eq!((turn.stick_x, turn.stick_y), (-40, 12));
        assert!(turn.held.is_empty());
        assert!(input.is_finished());

        assert_eq!(input.poll(), InputFrame::default());
        assert_eq!(input.polls(), 4);
    }

    #[test]
    fn test_unknown_button_names_step() {
        let err = r#"
            [[step]]
            held = ["d_up"]

            [[step]]
            held = ["select"]
        "#
        .parse::<ScriptedInput>()
        .unwrap_err();
        assert!(matches!(err, ScriptError::UnknownButton { step: 1, ref name } if name == "select"));
    }

    #[test]
    fn test_stick_out_of_range_is_parse_error() {
        let err = "[[step]]\nstick_x = 200\n".parse::<ScriptedInput>().unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }

    #[test]
    fn test_empty_script_is_idle() {
        let mut input: ScriptedInput = "".parse().unwrap();
        assert!(input.is_finished());
        assert_eq!(input.poll(), InputFrame::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fly.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{SCRIPT}").unwrap();

        let input = ScriptedInput::load(&path).unwrap();
        assert_eq!(input.steps().len(), 3);

        let err = ScriptedInput::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ScriptError::Read { .. }));
    }
}
