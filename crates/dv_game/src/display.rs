//! Mapping between device pixels and the fixed 480x320 game window.
//!
//! The game always renders into a game-window sized canvas which the host
//! scales onto the device. Touches arrive in device pixels and are converted
//! back before they reach [`dv_core::InputState`].

use dv_core::TouchEvent;
use glam::DVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameDisplay {
    device_width: f64,
    device_height: f64,
    game_width: f64,
    game_height: f64,
}

impl GameDisplay {
    /// Devices report either orientation; the game is always landscape, so
    /// the longer side is taken as the width.
    pub fn new(device_width: f64, device_height: f64, game_width: f64, game_height: f64) -> Self {
        let (device_width, device_height) = if device_width < device_height {
            (device_height, device_width)
        } else {
            (device_width, device_height)
        };
        Self {
            device_width: device_width.max(1.0),
            device_height: device_height.max(1.0),
            game_width,
            game_height,
        }
    }

    /// Uniform scale that fits the game window inside the device.
    pub fn scaling_factor(&self) -> f64 {
        (self.device_width / self.game_width).min(self.device_height / self.game_height)
    }

    pub fn to_game_window(&self, device: DVec2) -> DVec2 {
        DVec2::new(
            device.x / self.device_width * self.game_width,
            device.y / self.device_height * self.game_height,
        )
    }

    pub fn translate(&self, event: TouchEvent) -> TouchEvent {
        match event {
            TouchEvent::Down { pointer, x, y } => {
                let point = self.to_game_window(DVec2::new(x, y));
                TouchEvent::Down {
                    pointer,
                    x: point.x,
                    y: point.y,
                }
            }
            TouchEvent::Move { pointer, x, y } => {
                let point = self.to_game_window(DVec2::new(x, y));
                TouchEvent::Move {
                    pointer,
                    x: point.x,
                    y: point.y,
                }
            }
            TouchEvent::Up { pointer } => TouchEvent::Up { pointer },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn device_touches_scale_into_game_window() {
        let display = GameDisplay::new(1920.0, 1080.0, 480.0, 320.0);
        let point = display.to_game_window(DVec2::new(960.0, 540.0));
        assert_relative_eq!(point.x, 240.0);
        assert_relative_eq!(point.y, 160.0);
        assert_relative_eq!(display.scaling_factor(), 1080.0 / 320.0);
    }

    #[test]
    fn portrait_dimensions_are_treated_as_landscape() {
        let display = GameDisplay::new(1080.0, 1920.0, 480.0, 320.0);
        assert_eq!(display, GameDisplay::new(1920.0, 1080.0, 480.0, 320.0));
    }

    #[test]
    fn translate_keeps_pointer_ids() {
        let display = GameDisplay::new(960.0, 640.0, 480.0, 320.0);
        let event = display.translate(TouchEvent::Move {
            pointer: 3,
            x: 140.0,
            y: 560.0,
        });
        assert_eq!(
            event,
            TouchEvent::Move {
                pointer: 3,
                x: 70.0,
                y: 280.0
            }
        );
        assert_eq!(
            display.translate(TouchEvent::Up { pointer: 3 }),
            TouchEvent::Up { pointer: 3 }
        );
    }
}
