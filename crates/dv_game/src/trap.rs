//! Bear traps: a one-shot four-phase animation that hurts while snapping.

use dv_core::{Countdown, Rect};
use dv_render::{Blit, Canvas, SpriteSheet};
use glam::DVec2;

use crate::viewport::GameView;

/// Phases in sheet-column order. Progress is one-way and `Spent` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrapPhase {
    #[default]
    Unarmed,
    Triggered,
    InAction,
    Spent,
}

impl TrapPhase {
    fn column(self) -> u32 {
        match self {
            Self::Unarmed => 0,
            Self::Triggered => 1,
            Self::InAction => 2,
            Self::Spent => 3,
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Unarmed => Self::Unarmed,
            Self::Triggered => Self::InAction,
            Self::InAction | Self::Spent => Self::Spent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BearTrap {
    position: DVec2,
    phase: TrapPhase,
    updates_per_frame: u32,
    frame_timer: Countdown,
}

impl BearTrap {
    pub fn new(position: DVec2, phase: TrapPhase, updates_per_frame: u32) -> Self {
        Self {
            position,
            phase,
            updates_per_frame: updates_per_frame.max(1),
            frame_timer: Countdown::starting_at(updates_per_frame.max(1)),
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn phase(&self) -> TrapPhase {
        self.phase
    }

    /// Spring an unarmed trap. Returns `true` only for the call that sprang it.
    pub fn trigger(&mut self) -> bool {
        if self.phase != TrapPhase::Unarmed {
            return false;
        }
        self.phase = TrapPhase::Triggered;
        self.frame_timer.restart(self.updates_per_frame);
        true
    }

    pub fn is_in_action(&self) -> bool {
        self.phase == TrapPhase::InAction
    }

    /// Animate a sprung trap; idle and spent traps do not change.
    pub fn update(&mut self) {
        if matches!(self.phase, TrapPhase::Unarmed | TrapPhase::Spent) {
            return;
        }
        if self.frame_timer.tick() {
            self.phase = self.phase.next();
            self.frame_timer.restart(self.updates_per_frame);
        }
    }

    /// The jaws: a narrow band in the middle third of the frame.
    pub fn trigger_rect(&self, frame_width: f64, frame_height: f64) -> Rect {
        let x = self.position.x + frame_width / 3.0;
        let y = self.position.y + frame_height / 3.0;
        Rect::new(x + 10.0, y, x + frame_width / 3.0 - 10.0, y + frame_height / 3.0)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, view: &GameView, sheet: &SpriteSheet) {
        let window = view.to_window_space(self.position);
        canvas.blit(Blit {
            image: sheet.image().clone(),
            src: sheet.frame_rect(0, self.phase.column()),
            dst: Rect::from_origin_size(
                window.x,
                window.y,
                sheet.frame_width(),
                sheet.frame_height(),
            ),
            flip_x: false,
            rotation_deg: 0.0,
        });
    }
}
