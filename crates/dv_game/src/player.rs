//! The dog: joystick-driven walking, jumping onto platforms, biting.

use dv_core::{AnimationRow, Rect};
use glam::DVec2;

use crate::audio::Sound;
use crate::character::{Actor, Behaviour, Character};
use crate::config::GameConfig;
use crate::layout::LevelLayout;

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Pixels per update at full actuator deflection.
    pub max_speed: f64,
    pub gravity: f64,
    pub jump_impulse: f64,
    /// Top-left Y of a character standing on the street.
    pub floor_y: f64,
}

impl PlayerTuning {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            max_speed: config.player_max_speed(),
            gravity: config.player.gravity,
            jump_impulse: config.player.jump_impulse,
            floor_y: config.player.floor_y,
        }
    }
}

pub struct PlayerContext<'a> {
    pub actuator: DVec2,
    pub layout: &'a mut LevelLayout,
}

/// What the player touched this update. Damage is applied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    pub trap_sprung: bool,
    pub on_active_trap: bool,
}

#[derive(Debug, Clone)]
pub struct PlayerBehaviour {
    tuning: PlayerTuning,
    airborne: bool,
}

pub type Player = Actor<PlayerBehaviour>;

impl PlayerBehaviour {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            tuning,
            airborne: false,
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    /// Stop a falling character on the first surface its feet cross this
    /// update: a platform top, else the street.
    fn land(&mut self, character: &mut Character, layout: &LevelLayout) {
        let (width, height) = (character.width(), character.height());
        let body = &mut character.body;
        if body.velocity.y > 0.0 {
            let feet = body.position.y + height;
            let sweep =
                Rect::from_origin_size(body.position.x, feet - 1.0, width, body.velocity.y + 2.0);
            if let Some(surface) = layout.platform_support_at(sweep) {
                body.position.y = surface - height;
                body.velocity.y = 0.0;
                self.airborne = false;
                return;
            }
        }
        if body.position.y + body.velocity.y >= self.tuning.floor_y {
            body.position.y = self.tuning.floor_y;
            body.velocity.y = 0.0;
            self.airborne = false;
        }
    }

    fn is_supported(&self, character: &Character, layout: &LevelLayout) -> bool {
        if character.position().y >= self.tuning.floor_y {
            return true;
        }
        let feet = character.position().y + character.height();
        let query =
            Rect::from_origin_size(character.position().x, feet - 1.0, character.width(), 3.0);
        layout.platform_support_at(query).is_some()
    }
}

impl Behaviour for PlayerBehaviour {
    type Context<'a> = PlayerContext<'a>;
    type Output = PlayerStep;

    fn update(&mut self, character: &mut Character, context: PlayerContext<'_>) -> PlayerStep {
        // A finished death animation freezes the dog where it fell.
        if character.is_dead() {
            return PlayerStep::default();
        }
        let actuator = if character.is_defeated() {
            DVec2::ZERO
        } else {
            context.actuator
        };
        character.body.velocity.x = actuator.x * self.tuning.max_speed;

        if self.airborne {
            character.body.velocity.y += self.tuning.gravity;
            self.land(character, context.layout);
        }
        if !self.airborne && !self.is_supported(character, context.layout) {
            self.airborne = true;
        }

        let contact = context.layout.trap_state_at(character.foot_zone());

        character.body.integrate();
        character.body.face_velocity();
        character.tick_animation();
        character.pick_motion_animation();

        PlayerStep {
            trap_sprung: contact.sprung,
            on_active_trap: contact.in_action,
        }
    }

    fn death_sound(&self) -> Option<Sound> {
        Some(Sound::PlayerDeath)
    }
}

impl Actor<PlayerBehaviour> {
    /// Start a jump from solid ground. Ignored mid-air.
    pub fn jump(&mut self) {
        if self.behaviour.airborne || self.character.is_defeated() {
            return;
        }
        self.behaviour.airborne = true;
        self.character.body.velocity.y = -self.behaviour.tuning.jump_impulse;
    }

    /// Play the bite. The hit itself is resolved by the game.
    pub fn attack(&mut self) {
        if !self.character.is_defeated() {
            self.character.set_animation_locked(AnimationRow::Attack);
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.behaviour.is_airborne()
    }
}
