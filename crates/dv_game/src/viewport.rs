//! The scrolling window onto the level.
//!
//! Level space spans the whole street; window space is what is visible. Only
//! the horizontal axis scrolls, so Y is the same in both spaces. Positions of
//! game objects are always stored in level space and converted when drawn.

use glam::DVec2;

#[derive(Debug, Clone)]
pub struct GameView {
    offset_x: f64,
    velocity_x: f64,
    moving: bool,
    window_width: f64,
}

impl GameView {
    pub fn new(window_width: f64) -> Self {
        Self {
            offset_x: 0.0,
            velocity_x: 0.0,
            moving: false,
            window_width,
        }
    }

    /// Advance the scroll offset. The offset only changes while moving.
    pub fn update(&mut self) {
        if self.moving {
            self.offset_x += self.velocity_x;
        }
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn velocity_x(&self) -> f64 {
        self.velocity_x
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn window_width(&self) -> f64 {
        self.window_width
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }

    pub fn set_velocity_x(&mut self, velocity_x: f64) {
        self.velocity_x = velocity_x;
    }

    /// Scroll with the player once it leaves the dead zone `[low, high]` of
    /// window X. A stationary player stops the scroll; inside the dead zone
    /// the player moves freely over a still view.
    pub fn follow(&mut self, player_window_x: f64, player_velocity_x: f64, low: f64, high: f64) {
        let leaving_right = player_window_x > high && player_velocity_x > 0.0;
        let leaving_left = player_window_x < low && player_velocity_x < 0.0;
        if player_velocity_x != 0.0 && (leaving_right || leaving_left) {
            self.moving = true;
            self.velocity_x = player_velocity_x;
        } else {
            self.moving = false;
            self.velocity_x = 0.0;
        }
    }

    /// True when `level_x` lies less than one window width from the scroll
    /// offset on either side. Objects in this band are kept alive.
    pub fn is_within_window(&self, level_x: f64) -> bool {
        self.offset_x - self.window_width < level_x && level_x < self.offset_x + self.window_width
    }

    pub fn to_window_x(&self, level_x: f64) -> f64 {
        level_x - self.offset_x
    }

    pub fn to_level_x(&self, window_x: f64) -> f64 {
        window_x + self.offset_x
    }

    pub fn to_window_space(&self, level: DVec2) -> DVec2 {
        DVec2::new(self.to_window_x(level.x), level.y)
    }

    pub fn to_level_space(&self, window: DVec2) -> DVec2 {
        DVec2::new(self.to_level_x(window.x), window.y)
    }
}
