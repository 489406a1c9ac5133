//! Parallax background strips.
//!
//! Each strip is a window-wide image tiled twice side by side. While the view
//! scrolls, a strip lags behind by `1 - speed_multiplier` of the scroll speed
//! so distant layers appear to move slower; a strip can also drift on its
//! own (the clouds). The strip's anchor is wrapped to stay within one window
//! width behind the scroll offset, so the two tiles always cover the window.

use std::sync::Arc;

use dv_core::Rect;
use dv_render::{Blit, Canvas, SpriteSheet};

use crate::viewport::GameView;

#[derive(Debug, Clone)]
pub struct Background {
    image: Arc<str>,
    width: f64,
    height: f64,
    level_x: f64,
    y: f64,
    speed_multiplier: f64,
    drift: f64,
}

impl Background {
    pub fn new(sheet: &SpriteSheet, y: f64) -> Self {
        Self {
            image: sheet.image().clone(),
            width: sheet.frame_width(),
            height: sheet.frame_height(),
            level_x: 0.0,
            y,
            speed_multiplier: 1.0,
            drift: 0.0,
        }
    }

    pub fn with_speed_multiplier(mut self, speed_multiplier: f64) -> Self {
        self.speed_multiplier = speed_multiplier;
        self
    }

    pub fn with_drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }

    pub fn level_x(&self) -> f64 {
        self.level_x
    }

    pub fn update(&mut self, view: &GameView) {
        if view.is_moving() {
            self.level_x += view.velocity_x() * (1.0 - self.speed_multiplier);
        }
        self.level_x += self.drift;

        let offset = view.offset_x();
        if self.level_x < offset - view.window_width() {
            self.level_x = offset;
        } else if self.level_x > offset {
            self.level_x = offset - view.window_width();
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, view: &GameView) {
        let src = Rect::from_origin_size(0.0, 0.0, self.width, self.height);
        let window_x = view.to_window_x(self.level_x);
        canvas.blit(Blit {
            image: self.image.clone(),
            src,
            dst: Rect::from_origin_size(window_x, self.y, self.width, self.height),
            flip_x: false,
            rotation_deg: 0.0,
        });
        if self.level_x < view.offset_x() {
            // Second tile overlaps by a pixel to hide the seam.
            let tiled_x = window_x - 1.0 + view.window_width();
            canvas.blit(Blit {
                image: self.image.clone(),
                src,
                dst: Rect::from_origin_size(tiled_x, self.y, self.width, self.height),
                flip_x: false,
                rotation_deg: 0.0,
            });
        }
    }
}

/// The four street strips, far to near.
#[derive(Debug, Clone)]
pub struct Backdrop {
    pub sky: Background,
    pub houses: Background,
    pub fence: Background,
    pub road: Background,
}

impl Backdrop {
    pub fn update(&mut self, view: &GameView) {
        self.sky.update(view);
        self.houses.update(view);
        self.fence.update(view);
        self.road.update(view);
    }
}
