//! Touch input: a virtual joystick plus edge-triggered on-screen buttons.
//!
//! - **Level-triggered (actuator):** the joystick's 2D displacement, each
//!   axis in [-1, 1], read every update for continuous movement.
//!
//! - **Edge-triggered (just_pressed):** button taps are recorded when the
//!   touch lands and cleared by `end_frame()`, which the simulation calls only
//!   after an update has consumed them. A tap arriving between updates is
//!   therefore never lost.
//!
//! Pointer ids disambiguate simultaneous touches: the joystick binds the
//! pointer that pressed it, and only that pointer can move or release it.
//! A second finger landing while the joystick is held is tested against the
//! buttons.

use std::collections::HashSet;

use glam::DVec2;

use crate::geometry::{distance, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Attack,
    Jump,
    Exit,
    Restart,
}

/// Touch events in game-window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Down { pointer: u32, x: f64, y: f64 },
    Move { pointer: u32, x: f64, y: f64 },
    Up { pointer: u32 },
}

/// Coarse joystick direction, used to pick the joystick bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickHeading {
    Left,
    Middle,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct Joystick {
    center: DVec2,
    radius: f64,
    pointer: Option<u32>,
    actuator: DVec2,
}

impl Joystick {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self {
            center,
            radius,
            pointer: None,
            actuator: DVec2::ZERO,
        }
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_pressed(&self) -> bool {
        self.pointer.is_some()
    }

    pub fn is_touch_inside(&self, point: DVec2) -> bool {
        distance(self.center, point) < self.radius
    }

    pub fn actuator(&self) -> DVec2 {
        self.actuator
    }

    /// Displacement scaled by the outer radius, clamped to the unit circle.
    pub fn set_actuator(&mut self, point: DVec2) {
        let delta = point - self.center;
        let length = delta.length();
        if self.radius <= 0.0 || length == 0.0 {
            self.actuator = DVec2::ZERO;
        } else if length < self.radius {
            self.actuator = delta / self.radius;
        } else {
            self.actuator = delta / length;
        }
    }

    pub fn release(&mut self) {
        self.pointer = None;
        self.actuator = DVec2::ZERO;
    }

    pub fn heading(&self) -> JoystickHeading {
        if self.actuator.x > 0.5 {
            JoystickHeading::Right
        } else if self.actuator.x < -0.5 {
            JoystickHeading::Left
        } else if self.actuator.y > 0.5 {
            JoystickHeading::Down
        } else if self.actuator.y < -0.5 {
            JoystickHeading::Up
        } else {
            JoystickHeading::Middle
        }
    }
}

#[derive(Debug, Clone)]
struct ButtonZone {
    id: ButtonId,
    rect: Rect,
    enabled: bool,
}

#[derive(Debug, Clone)]
pub struct InputState {
    joystick: Joystick,
    joystick_enabled: bool,
    buttons: Vec<ButtonZone>,
    just_pressed: HashSet<ButtonId>,
}

impl InputState {
    pub fn new(joystick: Joystick) -> Self {
        Self {
            joystick,
            joystick_enabled: true,
            buttons: Vec::new(),
            just_pressed: HashSet::new(),
        }
    }

    /// Register a tappable zone. Later registrations with the same id replace
    /// the earlier zone.
    pub fn add_button(&mut self, id: ButtonId, rect: Rect, enabled: bool) {
        self.buttons.retain(|zone| zone.id != id);
        self.buttons.push(ButtonZone { id, rect, enabled });
    }

    pub fn set_button_enabled(&mut self, id: ButtonId, enabled: bool) {
        for zone in self.buttons.iter_mut().filter(|zone| zone.id == id) {
            zone.enabled = enabled;
        }
    }

    pub fn set_joystick_enabled(&mut self, enabled: bool) {
        self.joystick_enabled = enabled;
        if !enabled {
            self.joystick.release();
        }
    }

    pub fn joystick(&self) -> &Joystick {
        &self.joystick
    }

    pub fn actuator(&self) -> DVec2 {
        if self.joystick_enabled {
            self.joystick.actuator()
        } else {
            DVec2::ZERO
        }
    }

    pub fn handle_touch(&mut self, event: TouchEvent) {
        match event {
            TouchEvent::Down { pointer, x, y } => {
                let point = DVec2::new(x, y);
                if self.joystick_enabled
                    && !self.joystick.is_pressed()
                    && self.joystick.is_touch_inside(point)
                {
                    self.joystick.pointer = Some(pointer);
                    return;
                }
                self.tap(point);
            }
            TouchEvent::Move { pointer, x, y } => {
                if self.joystick.pointer == Some(pointer) {
                    self.joystick.set_actuator(DVec2::new(x, y));
                }
            }
            TouchEvent::Up { pointer } => {
                if self.joystick.pointer == Some(pointer) {
                    self.joystick.release();
                }
            }
        }
    }

    fn tap(&mut self, point: DVec2) {
        let hit = self
            .buttons
            .iter()
            .find(|zone| zone.enabled && zone.rect.contains(point))
            .map(|zone| zone.id);
        if let Some(id) = hit {
            self.just_pressed.insert(id);
        }
    }

    /// Record a press directly (keyboard hosts, scripted input).
    pub fn press(&mut self, id: ButtonId) {
        self.just_pressed.insert(id);
    }

    pub fn is_just_pressed(&self, id: ButtonId) -> bool {
        self.just_pressed.contains(&id)
    }

    /// Override the actuator directly (scripted input).
    pub fn set_actuator_direct(&mut self, actuator: DVec2) {
        self.joystick.actuator = actuator.clamp(DVec2::splat(-1.0), DVec2::splat(1.0));
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input() -> InputState {
        let mut input = InputState::new(Joystick::new(DVec2::new(70.0, 280.0), 45.0));
        input.add_button(
            ButtonId::Attack,
            Rect::from_origin_size(340.0, 262.0, 30.0, 30.0),
            true,
        );
        input.add_button(
            ButtonId::Jump,
            Rect::from_origin_size(400.0, 262.0, 30.0, 30.0),
            true,
        );
        input
    }

    #[test]
    fn joystick_binds_pointer_and_moves() {
        let mut input = input();
        input.handle_touch(TouchEvent::Down { pointer: 3, x: 70.0, y: 280.0 });
        assert!(input.joystick().is_pressed());
        input.handle_touch(TouchEvent::Move { pointer: 3, x: 92.5, y: 280.0 });
        assert_relative_eq!(input.actuator().x, 0.5);
        assert_relative_eq!(input.actuator().y, 0.0);
    }

    #[test]
    fn actuator_is_clamped_outside_radius() {
        let mut input = input();
        input.handle_touch(TouchEvent::Down { pointer: 0, x: 70.0, y: 280.0 });
        input.handle_touch(TouchEvent::Move { pointer: 0, x: 0.0, y: 280.0 });
        assert_relative_eq!(input.actuator().x, -1.0);
        assert_eq!(input.joystick().heading(), JoystickHeading::Left);
    }

    #[test]
    fn other_pointer_cannot_move_or_release_joystick() {
        let mut input = input();
        input.handle_touch(TouchEvent::Down { pointer: 0, x: 70.0, y: 280.0 });
        input.handle_touch(TouchEvent::Move { pointer: 0, x: 100.0, y: 280.0 });
        input.handle_touch(TouchEvent::Move { pointer: 1, x: 40.0, y: 280.0 });
        input.handle_touch(TouchEvent::Up { pointer: 1 });
        assert!(input.joystick().is_pressed());
        assert!(input.actuator().x > 0.0);
        input.handle_touch(TouchEvent::Up { pointer: 0 });
        assert!(!input.joystick().is_pressed());
        assert_eq!(input.actuator(), DVec2::ZERO);
    }

    #[test]
    fn second_touch_hits_buttons_while_joystick_held() {
        let mut input = input();
        input.handle_touch(TouchEvent::Down { pointer: 0, x: 70.0, y: 280.0 });
        input.handle_touch(TouchEvent::Down { pointer: 1, x: 350.0, y: 270.0 });
        assert!(input.is_just_pressed(ButtonId::Attack));
        assert!(!input.is_just_pressed(ButtonId::Jump));
    }

    #[test]
    fn end_frame_clears_presses_but_keeps_actuator() {
        let mut input = input();
        input.handle_touch(TouchEvent::Down { pointer: 0, x: 70.0, y: 280.0 });
        input.handle_touch(TouchEvent::Move { pointer: 0, x: 115.0, y: 280.0 });
        input.handle_touch(TouchEvent::Down { pointer: 1, x: 410.0, y: 270.0 });
        assert!(input.is_just_pressed(ButtonId::Jump));
        input.end_frame();
        assert!(!input.is_just_pressed(ButtonId::Jump));
        assert_relative_eq!(input.actuator().x, 1.0);
    }

    #[test]
    fn disabled_controls_ignore_touches() {
        let mut input = input();
        input.set_button_enabled(ButtonId::Attack, false);
        input.set_joystick_enabled(false);
        input.handle_touch(TouchEvent::Down { pointer: 0, x: 70.0, y: 280.0 });
        input.handle_touch(TouchEvent::Down { pointer: 1, x: 350.0, y: 270.0 });
        assert!(!input.joystick().is_pressed());
        assert!(!input.is_just_pressed(ButtonId::Attack));
        assert_eq!(input.actuator(), DVec2::ZERO);
    }

    #[test]
    fn heading_thresholds() {
        let mut joystick = Joystick::new(DVec2::ZERO, 10.0);
        joystick.set_actuator(DVec2::new(0.0, 8.0));
        assert_eq!(joystick.heading(), JoystickHeading::Down);
        joystick.set_actuator(DVec2::new(0.0, -8.0));
        assert_eq!(joystick.heading(), JoystickHeading::Up);
        joystick.set_actuator(DVec2::new(2.0, 2.0));
        assert_eq!(joystick.heading(), JoystickHeading::Middle);
    }
}
