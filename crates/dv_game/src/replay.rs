//! Input scripts: recorded or hand-written control sequences replayed one
//! entry per update.
//!
//! A frame can set the actuator directly, tap attack / jump, or carry raw
//! touches. Touches are in game-window pixels unless the script names the
//! `device` it was recorded on, in which case they are scaled like real
//! device touches.

use std::fs;
use std::path::{Path, PathBuf};

use dv_core::{ButtonId, InputState, TouchEvent};
use glam::DVec2;
use serde::Deserialize;
use thiserror::Error;

use crate::display::GameDisplay;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read input script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse input script JSON {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("input script validation failed: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct DeviceSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputScript {
    #[serde(default)]
    pub device: Option<DeviceSize>,
    pub frames: Vec<ScriptFrame>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TouchKind {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScriptTouch {
    pub kind: TouchKind,
    #[serde(default)]
    pub pointer: u32,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl ScriptTouch {
    fn to_event(self) -> TouchEvent {
        let Self { pointer, x, y, .. } = self;
        match self.kind {
            TouchKind::Down => TouchEvent::Down { pointer, x, y },
            TouchKind::Move => TouchEvent::Move { pointer, x, y },
            TouchKind::Up => TouchEvent::Up { pointer },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptFrame {
    #[serde(default)]
    pub actuator_x: Option<f64>,
    #[serde(default)]
    pub actuator_y: Option<f64>,
    #[serde(default)]
    pub attack: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    #[serde(default)]
    pub touches: Vec<ScriptTouch>,
}

/// Input for a single update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedInput {
    /// `None` leaves the joystick as it is.
    pub actuator: Option<DVec2>,
    pub attack: bool,
    pub jump: bool,
    pub touches: Vec<TouchEvent>,
}

impl ScriptedInput {
    /// Feed this entry into `input`, scaling touches through `display` when
    /// they were recorded in device pixels.
    pub fn apply(&self, input: &mut InputState, display: Option<&GameDisplay>) {
        for &touch in &self.touches {
            let event = display.map_or(touch, |display| display.translate(touch));
            input.handle_touch(event);
        }
        if let Some(actuator) = self.actuator {
            input.set_actuator_direct(actuator);
        }
        if self.attack {
            input.press(ButtonId::Attack);
        }
        if self.jump {
            input.press(ButtonId::Jump);
        }
    }
}

impl InputScript {
    pub fn expanded_inputs(&self) -> Vec<ScriptedInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let actuator = match (frame.actuator_x, frame.actuator_y) {
                (None, None) => None,
                (x, y) => Some(DVec2::new(
                    x.unwrap_or(0.0).clamp(-1.0, 1.0),
                    y.unwrap_or(0.0).clamp(-1.0, 1.0),
                )),
            };
            let entry = ScriptedInput {
                actuator,
                attack: frame.attack,
                jump: frame.jump,
                touches: frame.touches.iter().map(|touch| touch.to_event()).collect(),
            };
            // Taps and touches happen once; the actuator is held for the
            // whole repeat.
            out.push(entry.clone());
            for _ in 1..frame.repeat.max(1) {
                out.push(ScriptedInput {
                    actuator,
                    ..ScriptedInput::default()
                });
            }
        }
        out
    }

    /// Device-to-window mapping for scripts recorded on a device.
    pub fn display(&self, game_width: f64, game_height: f64) -> Option<GameDisplay> {
        self.device
            .map(|device| GameDisplay::new(device.width, device.height, game_width, game_height))
    }
}

pub fn load_script_from_path(path: &Path) -> Result<InputScript, ScriptError> {
    let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let script: InputScript = serde_json::from_str(&raw).map_err(|source| ScriptError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_script(&script)?;
    Ok(script)
}

fn validate_script(script: &InputScript) -> Result<(), ScriptError> {
    if script.frames.is_empty() {
        return Err(ScriptError::Invalid("frames list is empty".to_string()));
    }
    if let Some(device) = script.device {
        if !(device.width > 0.0 && device.height > 0.0) {
            return Err(ScriptError::Invalid("device size must be positive".to_string()));
        }
    }
    let finite = script.frames.iter().all(|frame| {
        frame.actuator_x.map_or(true, f64::is_finite)
            && frame.actuator_y.map_or(true, f64::is_finite)
            && frame
                .touches
                .iter()
                .all(|touch| touch.x.is_finite() && touch.y.is_finite())
    });
    if !finite {
        return Err(ScriptError::Invalid("coordinates must be finite".to_string()));
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}
