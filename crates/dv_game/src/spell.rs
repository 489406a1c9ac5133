//! Water spells cast by slimes.
//!
//! A spell flies in a straight line at a velocity fixed at launch. It plays
//! its launch frames once, loops the flight frames, and switches to the hit
//! frames when it strikes. The game removes it once the hit animation has
//! finished or it has left the window.

use std::sync::Arc;

use dv_core::{FrameClock, Rect};
use dv_render::{AssetError, Blit, Canvas, SpriteSheet};
use glam::DVec2;

use crate::character::Character;
use crate::entity::Body;
use crate::viewport::GameView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellPhase {
    Launch,
    Flight,
    Hit,
}

impl SpellPhase {
    fn row(self) -> usize {
        match self {
            Self::Launch => 0,
            Self::Flight => 1,
            Self::Hit => 2,
        }
    }
}

/// Spell sheet: three rows (launch, flight, hit) with their own frame counts.
#[derive(Debug, Clone)]
pub struct SpellSheet {
    sheet: SpriteSheet,
    frames: [usize; 3],
}

impl SpellSheet {
    pub fn new(sheet: SpriteSheet, frames: [usize; 3]) -> Result<Self, AssetError> {
        let cols = sheet.cols() as usize;
        if sheet.rows() < 3 || frames.iter().any(|&count| count == 0 || count > cols) {
            return Err(AssetError::SheetGeometry {
                id: sheet.image().to_string(),
                width: sheet.cols() * sheet.frame_width() as u32,
                height: sheet.rows() * sheet.frame_height() as u32,
                rows: 3,
                cols: frames.iter().copied().max().unwrap_or(0) as u32,
            });
        }
        Ok(Self { sheet, frames })
    }

    pub fn frame_width(&self) -> f64 {
        self.sheet.frame_width()
    }

    pub fn frame_height(&self) -> f64 {
        self.sheet.frame_height()
    }

    pub fn frames(&self, phase: SpellPhase) -> usize {
        self.frames[phase.row()]
    }
}

#[derive(Debug, Clone)]
pub struct Spell {
    body: Body,
    sheet: Arc<SpellSheet>,
    clock: FrameClock,
    phase: SpellPhase,
    column: usize,
    finished: bool,
    counted: bool,
}

impl Spell {
    /// Launch from `caster` along its facing direction at `max_speed`.
    pub fn launch(
        sheet: Arc<SpellSheet>,
        caster: &Character,
        max_speed: f64,
        clock: FrameClock,
    ) -> Self {
        let start = DVec2::new(
            caster.position().x,
            caster.position().y + caster.width() / 2.0 - sheet.frame_height() / 2.0,
        );
        let mut body = Body::new(start);
        body.velocity = caster.body.direction() * max_speed;
        body.face_towards(DVec2::ZERO, caster.body.direction());
        Self {
            body,
            sheet,
            clock,
            phase: SpellPhase::Launch,
            column: 0,
            finished: false,
            counted: false,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.body.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.body.velocity
    }

    pub fn phase(&self) -> SpellPhase {
        self.phase
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_counted(&self) -> bool {
        self.counted
    }

    /// Record that this spell's damage has been applied.
    pub fn count_hit(&mut self) {
        self.counted = true;
    }

    pub fn center(&self) -> DVec2 {
        self.body.position + DVec2::new(self.sheet.frame_width(), self.sheet.frame_height()) * 0.5
    }

    pub fn update(&mut self) {
        self.body.integrate();
        if self.finished || !self.clock.tick() {
            return;
        }
        self.column += 1;
        let frame_count = self.sheet.frames(self.phase);
        if self.column < frame_count {
            return;
        }
        match self.phase {
            SpellPhase::Launch => {
                self.phase = SpellPhase::Flight;
                self.column = 0;
            }
            SpellPhase::Flight => self.column = 0,
            SpellPhase::Hit => {
                self.column = frame_count - 1;
                self.finished = true;
            }
        }
    }

    /// Switch to the hit animation and stop. Repeated calls only keep the
    /// spell stopped.
    pub fn set_hit(&mut self) {
        if self.phase != SpellPhase::Hit {
            self.phase = SpellPhase::Hit;
            self.column = 0;
            self.clock.reset();
        }
        self.body.velocity = DVec2::ZERO;
    }

    /// Generous proximity test: centre distance below the target's frame
    /// width minus `margin`.
    pub fn is_hit(&self, target: &Character, margin: f64) -> bool {
        self.center().distance(target.center()) < target.width() - margin
    }

    /// Window-space X beyond `margin` pixels off either edge of the window.
    pub fn is_outside_window(&self, view: &GameView, margin: f64) -> bool {
        let window_x = view.to_window_x(self.body.position.x);
        window_x < -margin || window_x > view.window_width() + margin
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, view: &GameView) {
        let window = view.to_window_space(self.body.position);
        let direction = self.body.direction();
        canvas.blit(Blit {
            image: self.sheet.sheet.image().clone(),
            src: self.sheet.sheet.frame_rect(self.phase.row() as u32, self.column as u32),
            dst: Rect::from_origin_size(
                window.x,
                window.y,
                self.sheet.frame_width(),
                self.sheet.frame_height(),
            ),
            flip_x: false,
            rotation_deg: direction.y.atan2(direction.x).to_degrees(),
        });
    }
}
