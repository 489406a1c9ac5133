//! Overlays drawn in window space on top of the street.
//!
//! Everything here reads simulation state and draws; the only state kept is
//! presentation state (the intro fade and how long a button shows pressed).

use dv_core::{ButtonId, Countdown, InputState, Joystick, JoystickHeading, Rect, ThroughputSample};
use dv_render::{Blit, Canvas, Rgba, SpriteSheet, Text, TextAlign};
use glam::DVec2;

use crate::character::MAX_HEALTH;
use crate::session::Outcome;

/// On-screen controls are drawn at three times their bitmap size.
pub const CONTROL_SCALE: f64 = 3.0;
pub const JOYSTICK_CENTER: DVec2 = DVec2::new(70.0, 280.0);
pub const JOYSTICK_RADIUS: f64 = 45.0;
pub const ATTACK_CENTER: DVec2 = DVec2::new(355.0, 277.0);
pub const JUMP_CENTER: DVec2 = DVec2::new(415.0, 277.0);

const PRESS_HOLD_UPDATES: u32 = 10;

const HEALTH_ORIGIN: DVec2 = DVec2::new(10.0, 30.0);
const HEALTH_HEIGHT: f64 = 13.0;
const HEALTH_MARGIN: f64 = 2.0;
const HEALTH_BORDER: Rgba = Rgba::new(47, 47, 47, 255);
const HEALTH_FILL: Rgba = Rgba::new(48, 177, 66, 255);

const PANEL_BACK: Rgba = Rgba::new(211, 210, 157, 255);
const INTRO_TEXT: Rgba = Rgba::new(68, 76, 78, 255);
const PERFORMANCE_TEXT: Rgba = Rgba::new(255, 0, 255, 255);
const GAME_OVER_TEXT: Rgba = Rgba::new(214, 37, 37, 255);
const WIN_TEXT: Rgba = Rgba::new(48, 177, 66, 255);

const MENU_BUTTON_WIDTH: f64 = 130.0;
const MENU_BUTTON_HEIGHT: f64 = 30.0;
const MENU_Y: f64 = 250.0;
const MENU_EDGE_MARGIN: f64 = 20.0;

/// Bitmaps for the touch controls.
#[derive(Debug, Clone)]
pub struct ControlsArt {
    /// In `JoystickHeading` order: left, middle, right, up, down.
    pub joystick: [SpriteSheet; 5],
    pub attack_up: SpriteSheet,
    pub attack_down: SpriteSheet,
    pub jump_up: SpriteSheet,
    pub jump_down: SpriteSheet,
}

impl ControlsArt {
    fn joystick_sheet(&self, heading: JoystickHeading) -> &SpriteSheet {
        let index = match heading {
            JoystickHeading::Left => 0,
            JoystickHeading::Middle => 1,
            JoystickHeading::Right => 2,
            JoystickHeading::Up => 3,
            JoystickHeading::Down => 4,
        };
        &self.joystick[index]
    }
}

/// A bitmap scaled by [`CONTROL_SCALE`] and centred on `center`.
fn scaled_rect(center: DVec2, sheet: &SpriteSheet) -> Rect {
    let width = sheet.frame_width() * CONTROL_SCALE;
    let height = sheet.frame_height() * CONTROL_SCALE;
    Rect::from_origin_size(center.x - width / 2.0, center.y - height / 2.0, width, height)
}

fn blit_whole(canvas: &mut dyn Canvas, sheet: &SpriteSheet, dst: Rect) {
    canvas.blit(Blit {
        image: sheet.image().clone(),
        src: sheet.frame_rect(0, 0),
        dst,
        flip_x: false,
        rotation_deg: 0.0,
    });
}

/// A bitmap button that shows its pressed image for a short while after a tap.
#[derive(Debug, Clone)]
pub struct ControlButton {
    up: SpriteSheet,
    down: SpriteSheet,
    rect: Rect,
    hold: Countdown,
}

impl ControlButton {
    pub fn new(center: DVec2, up: SpriteSheet, down: SpriteSheet) -> Self {
        let rect = scaled_rect(center, &up);
        Self {
            up,
            down,
            rect,
            hold: Countdown::expired_now(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn press(&mut self) {
        self.hold.restart(PRESS_HOLD_UPDATES);
    }

    pub fn is_showing_pressed(&self) -> bool {
        !self.hold.expired()
    }

    pub fn update(&mut self) {
        self.hold.tick();
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let sheet = if self.is_showing_pressed() {
            &self.down
        } else {
            &self.up
        };
        blit_whole(canvas, sheet, self.rect);
    }
}

/// Welcome panel: opaque for a while, then fades out.
#[derive(Debug, Clone)]
pub struct IntroPanel {
    remaining: u32,
    signal_at: u32,
    fading: bool,
    opacity: i32,
}

impl IntroPanel {
    pub fn new(intro_updates: u32, signal_at: u32) -> Self {
        Self {
            remaining: intro_updates,
            signal_at,
            fading: intro_updates == 0,
            opacity: 255,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity >= 0
    }

    pub fn opacity(&self) -> i32 {
        self.opacity
    }

    /// Advance one update. Returns `true` on the update where the intro is
    /// `signal_at` updates from ending.
    pub fn update(&mut self) -> bool {
        if !self.is_visible() {
            return false;
        }
        if self.fading {
            self.opacity -= 2;
            if self.opacity < 170 {
                self.opacity -= 5;
            }
            if self.opacity < 100 {
                self.opacity -= 10;
            }
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.fading = true;
        }
        self.remaining == self.signal_at
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, width: f64, height: f64) {
        if !self.is_visible() {
            return;
        }
        let alpha = self.opacity.clamp(0, 255) as u8;
        canvas.fill_rect(Rect::new(0.0, 0.0, width, height), PANEL_BACK.with_alpha(alpha));
        canvas.text(Text {
            content: "Welcome to Dogville!".to_string(),
            x: width / 2.0,
            y: height / 2.0,
            size: 50.0,
            color: INTRO_TEXT.with_alpha(alpha),
            align: TextAlign::Center,
        });
    }
}

/// Exit / restart buttons shown once the session is decided.
#[derive(Debug, Clone)]
pub struct ExitRestartMenu {
    exit: Rect,
    restart: Rect,
}

impl ExitRestartMenu {
    pub fn new(window_width: f64) -> Self {
        let exit_x = window_width - MENU_BUTTON_WIDTH - MENU_EDGE_MARGIN;
        Self {
            exit: Rect::from_origin_size(exit_x, MENU_Y, MENU_BUTTON_WIDTH, MENU_BUTTON_HEIGHT),
            restart: Rect::from_origin_size(
                MENU_EDGE_MARGIN,
                MENU_Y,
                MENU_BUTTON_WIDTH,
                MENU_BUTTON_HEIGHT,
            ),
        }
    }

    pub fn exit_rect(&self) -> Rect {
        self.exit
    }

    pub fn restart_rect(&self) -> Rect {
        self.restart
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for (rect, label) in [(self.exit, "Exit game"), (self.restart, "Restart game")] {
            canvas.fill_rect(rect, PANEL_BACK);
            canvas.text(Text {
                content: label.to_string(),
                x: rect.center().x,
                y: rect.bottom - 10.0,
                size: 30.0,
                color: Rgba::BLACK,
                align: TextAlign::Center,
            });
        }
    }
}

pub struct Hud {
    window_width: f64,
    window_height: f64,
    controls: ControlsArt,
    attack: ControlButton,
    jump: ControlButton,
    intro: IntroPanel,
    menu: ExitRestartMenu,
}

impl Hud {
    pub fn new(
        controls: ControlsArt,
        window_width: f64,
        window_height: f64,
        intro: IntroPanel,
    ) -> Self {
        let attack = ControlButton::new(
            ATTACK_CENTER,
            controls.attack_up.clone(),
            controls.attack_down.clone(),
        );
        let jump = ControlButton::new(
            JUMP_CENTER,
            controls.jump_up.clone(),
            controls.jump_down.clone(),
        );
        Self {
            window_width,
            window_height,
            controls,
            attack,
            jump,
            intro,
            menu: ExitRestartMenu::new(window_width),
        }
    }

    /// Input state with the joystick and every tappable zone registered.
    /// Menu buttons start disabled.
    pub fn input_state(&self) -> InputState {
        let mut input = InputState::new(Joystick::new(JOYSTICK_CENTER, JOYSTICK_RADIUS));
        input.add_button(ButtonId::Attack, self.attack.rect(), true);
        input.add_button(ButtonId::Jump, self.jump.rect(), true);
        input.add_button(ButtonId::Exit, self.menu.exit_rect(), false);
        input.add_button(ButtonId::Restart, self.menu.restart_rect(), false);
        input
    }

    /// Swap the touch controls for the exit / restart menu.
    pub fn show_menu(input: &mut InputState) {
        input.set_joystick_enabled(false);
        input.set_button_enabled(ButtonId::Attack, false);
        input.set_button_enabled(ButtonId::Jump, false);
        input.set_button_enabled(ButtonId::Exit, true);
        input.set_button_enabled(ButtonId::Restart, true);
    }

    pub fn intro(&self) -> &IntroPanel {
        &self.intro
    }

    pub fn attack_button(&self) -> &ControlButton {
        &self.attack
    }

    pub fn jump_button(&self) -> &ControlButton {
        &self.jump
    }

    /// Returns `true` when the intro-finished signal is due.
    pub fn update(&mut self, attack_pressed: bool, jump_pressed: bool) -> bool {
        if attack_pressed {
            self.attack.press();
        }
        if jump_pressed {
            self.jump.press();
        }
        self.attack.update();
        self.jump.update();
        self.intro.update()
    }

    pub fn draw_health(&self, canvas: &mut dyn Canvas, health: u32) {
        let width = f64::from(MAX_HEALTH) * 0.7;
        let border = Rect::from_origin_size(
            HEALTH_ORIGIN.x,
            HEALTH_ORIGIN.y,
            width + HEALTH_MARGIN * 2.0,
            HEALTH_HEIGHT,
        );
        canvas.fill_rect(border, HEALTH_BORDER);
        let fraction = f64::from(health.min(MAX_HEALTH)) / f64::from(MAX_HEALTH);
        let left = border.left + HEALTH_MARGIN;
        canvas.fill_rect(
            Rect::new(
                left,
                border.top + HEALTH_MARGIN,
                left + width * fraction,
                border.bottom - HEALTH_MARGIN,
            ),
            HEALTH_FILL,
        );
    }

    pub fn draw_controls(&self, canvas: &mut dyn Canvas, joystick: &Joystick) {
        let sheet = self.controls.joystick_sheet(joystick.heading());
        blit_whole(canvas, sheet, scaled_rect(joystick.center(), sheet));
        self.attack.draw(canvas);
        self.jump.draw(canvas);
    }

    pub fn draw_performance(&self, canvas: &mut dyn Canvas, sample: &ThroughputSample) {
        let rows = [
            ("UPS", sample.average_ups, 30.0),
            ("FPS", sample.average_fps, 50.0),
        ];
        for (label, value, y) in rows {
            canvas.text(Text {
                content: format!("{label}: {value:05.2}"),
                x: 350.0,
                y,
                size: 20.0,
                color: PERFORMANCE_TEXT,
                align: TextAlign::Left,
            });
        }
    }

    pub fn draw_intro(&self, canvas: &mut dyn Canvas) {
        self.intro.draw(canvas, self.window_width, self.window_height);
    }

    pub fn draw_outcome(&self, canvas: &mut dyn Canvas, outcome: Outcome) {
        let (content, color) = match outcome {
            Outcome::Won => ("YOU WIN!", WIN_TEXT),
            Outcome::Lost => ("GAME OVER", GAME_OVER_TEXT),
        };
        canvas.text(Text {
            content: content.to_string(),
            x: self.window_width / 2.0,
            y: self.window_height / 2.0,
            size: 120.0,
            color,
            align: TextAlign::Center,
        });
        self.menu.draw(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{nominal_assets, GameArt};
    use dv_core::TouchEvent;
    use dv_render::{DrawCommand, DrawList};

    fn hud() -> Hud {
        let art = GameArt::load(&nominal_assets()).expect("nominal art");
        Hud::new(art.controls, 480.0, 320.0, IntroPanel::new(150, 10))
    }

    #[test]
    fn intro_signals_then_fades_out() {
        let mut intro = IntroPanel::new(150, 10);
        let signals: Vec<u32> = (1..=150).filter(|_| intro.update()).collect();
        assert_eq!(signals, vec![140]);
        assert_eq!(intro.opacity(), 255);

        let mut fade_updates = 0;
        while intro.is_visible() {
            intro.update();
            fade_updates += 1;
            assert!(fade_updates < 100);
        }
        // 43 updates down to 164, ten more to 84, then five at 17 each.
        assert_eq!(fade_updates, 58);
        assert!(!intro.update());
    }

    #[test]
    fn buttons_sit_where_the_thumbs_are() {
        let hud = hud();
        // 16 px bitmaps drawn at 48 px.
        assert_eq!(hud.attack_button().rect(), Rect::new(331.0, 253.0, 379.0, 301.0));
        assert_eq!(hud.jump_button().rect(), Rect::new(391.0, 253.0, 439.0, 301.0));

        let mut input = hud.input_state();
        input.handle_touch(TouchEvent::Down { pointer: 0, x: 415.0, y: 277.0 });
        assert!(input.is_just_pressed(ButtonId::Jump));
        // Menu is hidden during play.
        input.handle_touch(TouchEvent::Down { pointer: 1, x: 400.0, y: 260.0 });
        input.handle_touch(TouchEvent::Down { pointer: 2, x: 40.0, y: 260.0 });
        assert!(!input.is_just_pressed(ButtonId::Exit));
        assert!(!input.is_just_pressed(ButtonId::Restart));
    }

    #[test]
    fn menu_replaces_controls() {
        let hud = hud();
        let mut input = hud.input_state();
        Hud::show_menu(&mut input);
        input.handle_touch(TouchEvent::Down { pointer: 0, x: 70.0, y: 280.0 });
        input.handle_touch(TouchEvent::Down { pointer: 1, x: 355.0, y: 277.0 });
        input.handle_touch(TouchEvent::Down { pointer: 2, x: 400.0, y: 260.0 });
        assert!(!input.joystick().is_pressed());
        assert!(!input.is_just_pressed(ButtonId::Attack));
        assert!(input.is_just_pressed(ButtonId::Exit));
    }

    #[test]
    fn pressed_bitmap_is_held_for_ten_updates() {
        let mut hud = hud();
        hud.update(true, false);
        for _ in 0..8 {
            hud.update(false, false);
        }
        assert!(hud.attack_button().is_showing_pressed());
        hud.update(false, false);
        assert!(!hud.attack_button().is_showing_pressed());
        assert!(!hud.jump_button().is_showing_pressed());
    }

    #[test]
    fn health_bar_shrinks_with_health() {
        let hud = hud();
        let mut list = DrawList::new();
        hud.draw_health(&mut list, 50);
        let rects: Vec<Rect> = list
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(rects[0], Rect::new(10.0, 30.0, 84.0, 43.0));
        assert_eq!(rects[1], Rect::new(12.0, 32.0, 47.0, 41.0));
    }

    #[test]
    fn performance_panel_formats_two_decimals() {
        let hud = hud();
        let mut list = DrawList::new();
        hud.draw_performance(
            &mut list,
            &ThroughputSample {
                average_ups: 59.876,
                average_fps: 7.5,
            },
        );
        let texts: Vec<&str> = list.texts().collect();
        assert_eq!(texts, vec!["UPS: 59.88", "FPS: 07.50"]);
    }

    #[test]
    fn outcome_banner_and_menu() {
        let hud = hud();
        let mut list = DrawList::new();
        hud.draw_outcome(&mut list, Outcome::Lost);
        let texts: Vec<&str> = list.texts().collect();
        assert_eq!(texts, vec!["GAME OVER", "Exit game", "Restart game"]);
    }
}
