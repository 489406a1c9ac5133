//! Filthy slimes: a distance-tiered policy recomputed every update.
//!
//! | distance to player | behaviour                                    |
//! |--------------------|----------------------------------------------|
//! | > idle_beyond      | stand still                                  |
//! | > cast_beyond      | cast a spell whenever the cooldown allows    |
//! | > walk_beyond      | walk towards the player                      |
//! | > ramp_beyond      | charge, speeding up from `ramp_floor` to 1x  |
//! | > reach_beyond     | walk, with a periodic lunge that also bites  |
//! | otherwise          | stand and bite                               |
//!
//! The slime only asks for spells; the game polls
//! [`EnemyBehaviour::take_spell_request`] and spawns them.

use dv_core::{AnimationRow, Countdown};
use glam::DVec2;

use crate::audio::Sound;
use crate::character::{distance_between, Actor, Behaviour, Character};
use crate::config::{EnemyConfig, GameConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyTier {
    Idle,
    Cast,
    Walk,
    Ramp,
    Reach,
    Melee,
}

pub struct EnemyContext<'a> {
    pub player: &'a Character,
}

/// Bite timing. Both countdowns only advance while the slime is biting, so
/// the hit lands mid-animation no matter how long the slime was away.
#[derive(Debug, Clone)]
struct MeleeTimer {
    cooldown: Countdown,
    register: Countdown,
    cooldown_cycles: u32,
}

impl MeleeTimer {
    fn new(cooldown_cycles: u32) -> Self {
        Self {
            cooldown: Countdown::expired_now(),
            register: Countdown::expired_now(),
            cooldown_cycles,
        }
    }

    /// Returns `true` on the one call per bite where the hit should count.
    fn attack(&mut self, character: &mut Character) -> bool {
        if self.cooldown.expired() {
            let animation = character.animation();
            let attack_updates =
                animation.frames().get(AnimationRow::Attack) as u32 * animation.updates_per_frame();
            character.set_animation_locked(AnimationRow::Attack);
            self.cooldown.restart(attack_updates * self.cooldown_cycles);
            self.register.restart(attack_updates / 2);
            return false;
        }
        self.cooldown.tick();
        self.register.tick()
    }
}

#[derive(Debug, Clone)]
pub struct EnemyBehaviour {
    config: EnemyConfig,
    max_speed: f64,
    spell_cooldown: Countdown,
    spell_requests: u32,
    reach_timer: Countdown,
    reach_burst: Countdown,
    ramp_counter: u32,
    melee: MeleeTimer,
    hit_due: bool,
    tier: EnemyTier,
}

pub type Enemy = Actor<EnemyBehaviour>;

impl EnemyBehaviour {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            config: config.enemy,
            max_speed: config.enemy_max_speed(),
            spell_cooldown: Countdown::expired_now(),
            spell_requests: 0,
            reach_timer: Countdown::expired_now(),
            reach_burst: Countdown::expired_now(),
            ramp_counter: 0,
            melee: MeleeTimer::new(config.enemy.attack_cooldown_cycles),
            hit_due: false,
            tier: EnemyTier::Idle,
        }
    }

    pub fn tier_for(&self, distance: f64) -> EnemyTier {
        let c = &self.config;
        if distance > c.idle_beyond {
            EnemyTier::Idle
        } else if distance > c.cast_beyond {
            EnemyTier::Cast
        } else if distance > c.walk_beyond {
            EnemyTier::Walk
        } else if distance > c.ramp_beyond {
            EnemyTier::Ramp
        } else if distance > c.reach_beyond {
            EnemyTier::Reach
        } else {
            EnemyTier::Melee
        }
    }

    /// Tier chosen on the last update.
    pub fn tier(&self) -> EnemyTier {
        self.tier
    }

    /// True for exactly the update on which a bite should hurt the player.
    pub fn is_hit_due(&self) -> bool {
        self.hit_due
    }

    pub fn pending_spells(&self) -> u32 {
        self.spell_requests
    }

    /// Claim one requested spell, if any.
    pub fn take_spell_request(&mut self) -> bool {
        if self.spell_requests == 0 {
            return false;
        }
        self.spell_requests -= 1;
        true
    }

    pub fn is_lunging(&self) -> bool {
        !self.reach_burst.expired()
    }

    /// Charge multiplier: grows with time spent charging, clamped to
    /// `[ramp_floor, 1]`. The counter saturates once the ramp tops out.
    ///
    /// The growth is linear (0.75x at three quarters of `ramp_divisor`)
    /// rather than a single jump from the floor to full speed.
    fn ramp_multiplier(&mut self) -> f64 {
        let divisor = self.config.ramp_divisor.max(1);
        let multiplier = (f64::from(self.ramp_counter) / f64::from(divisor))
            .clamp(self.config.ramp_floor, 1.0);
        self.ramp_counter = (self.ramp_counter + 1).min(divisor);
        multiplier
    }

    fn cast(&mut self, character: &mut Character) {
        if self.spell_cooldown.expired() {
            self.spell_requests += 1;
            character.set_animation_locked(AnimationRow::Walk);
            self.spell_cooldown.restart(self.config.spell_cooldown);
            character.body.velocity = DVec2::ZERO;
            return;
        }
        self.spell_cooldown.tick();
    }

    fn reach(&mut self, character: &mut Character, distance: f64) {
        let direction_x = character.body.direction().x;
        character.body.velocity.x = direction_x * self.max_speed;
        if self.reach_timer.expired() {
            self.reach_timer.restart(self.config.reach_period);
            self.reach_burst.restart(self.config.reach_burst);
        }
        self.reach_timer.tick();
        if self.reach_burst.expired() {
            return;
        }
        self.reach_burst.tick();
        self.hit_due |= self.melee.attack(character);
        character.body.velocity.x =
            direction_x * self.max_speed * distance / self.config.reach_distance_divisor;
    }
}

impl Behaviour for EnemyBehaviour {
    type Context<'a> = EnemyContext<'a>;
    type Output = ();

    fn update(&mut self, character: &mut Character, context: EnemyContext<'_>) {
        self.hit_due = false;
        if character.is_defeated() {
            character.body.velocity = DVec2::ZERO;
            character.tick_animation();
            return;
        }

        let player = context.player;
        let distance = distance_between(character, player);
        character.body.face_towards(character.center(), player.center());
        let direction_x = character.body.direction().x;

        self.tier = self.tier_for(distance);
        match self.tier {
            EnemyTier::Idle => character.body.velocity.x = 0.0,
            EnemyTier::Cast => self.cast(character),
            EnemyTier::Walk => character.body.velocity.x = direction_x * self.max_speed,
            EnemyTier::Ramp => {
                let multiplier = self.ramp_multiplier();
                character.body.velocity.x = direction_x * self.max_speed * multiplier;
            }
            EnemyTier::Reach => self.reach(character, distance),
            EnemyTier::Melee => {
                self.hit_due |= self.melee.attack(character);
                character.body.velocity.x = 0.0;
            }
        }

        character.body.position.x += character.body.velocity.x;
        character.pick_motion_animation();
        character.tick_animation();
    }

    fn death_sound(&self) -> Option<Sound> {
        Some(Sound::EnemyDeath)
    }
}
