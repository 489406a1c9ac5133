//! The orchestrator: owns every object of one session, wires input to
//! actions, resolves win and loss, and composes the frame.

use std::sync::{Arc, Mutex};

use dv_core::{ButtonId, Countdown, InputState, ThroughputSample};
use dv_render::{AssetError, AssetProvider, Canvas};
use thiserror::Error;

use crate::assets::GameArt;
use crate::audio::{AudioSink, Sound};
use crate::character::{distance_between, Actor, Character};
use crate::config::{validate_config, ConfigError, GameConfig};
use crate::enemy::{Enemy, EnemyBehaviour, EnemyContext};
use crate::game_loop::{lock, Simulation};
use crate::hud::{Hud, IntroPanel};
use crate::layout::LevelLayout;
use crate::level::{validate_level, LevelError, LevelFile};
use crate::npc::{Npc, NpcBehaviour, NpcContext};
use crate::player::{Player, PlayerBehaviour, PlayerContext, PlayerTuning};
use crate::session::{Outcome, SessionSender, SessionSignal};
use crate::spell::{Spell, SpellSheet};
use crate::viewport::GameView;

/// Touch state shared between the host's input path and the simulation.
pub type SharedInput = Arc<Mutex<InputState>>;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Buttons pressed since the previous update.
#[derive(Debug, Clone, Copy, Default)]
struct Presses {
    attack: bool,
    jump: bool,
    exit: bool,
    restart: bool,
}

pub struct Game {
    config: GameConfig,
    finish_point: f64,
    view: GameView,
    layout: LevelLayout,
    player: Player,
    npc: Npc,
    enemies: Vec<Enemy>,
    spells: Vec<Spell>,
    spell_sheet: Arc<SpellSheet>,
    hud: Hud,
    input: SharedInput,
    audio: Box<dyn AudioSink>,
    session: SessionSender,
    outcome: Option<Outcome>,
    win_delay: Countdown,
    lose_delay: Countdown,
    greeted: bool,
}

impl Game {
    /// Load the art and place every object. Fails before anything runs if
    /// the config, the level or any image is unusable.
    pub fn new(
        config: GameConfig,
        level: LevelFile,
        assets: &dyn AssetProvider,
        audio: Box<dyn AudioSink>,
        session: SessionSender,
    ) -> Result<Self, GameError> {
        validate_config(&config)?;
        validate_level(&level)?;
        let art = GameArt::load(assets)?;

        let clock = config.frame_clock();
        let view = GameView::new(config.window.width);
        let layout = LevelLayout::new(
            &level,
            art.layout,
            art.backdrop,
            clock.updates_per_frame(),
            &view,
        );

        let player = Actor::new(
            Character::new(Arc::clone(&art.dog), level.player_start.into(), clock),
            PlayerBehaviour::new(PlayerTuning::from_config(&config)),
        );
        let npc = Actor::new(
            Character::new(Arc::clone(&art.cat), level.npc.into(), clock),
            NpcBehaviour,
        );
        let enemies: Vec<Enemy> = level
            .enemy_positions()
            .into_iter()
            .map(|position| {
                Actor::new(
                    Character::new(Arc::clone(&art.slime), position, clock),
                    EnemyBehaviour::new(&config),
                )
            })
            .collect();

        let rules = config.rules;
        let hud = Hud::new(
            art.controls,
            config.window.width,
            config.window.height,
            IntroPanel::new(rules.intro_updates, rules.intro_signal_at),
        );
        let input = Arc::new(Mutex::new(hud.input_state()));

        log::info!(
            "Level '{}' ready: {} slimes, finish at x={}",
            level.level_id,
            enemies.len(),
            level.finish_point
        );

        Ok(Self {
            config,
            finish_point: level.finish_point,
            view,
            layout,
            player,
            npc,
            enemies,
            spells: Vec::new(),
            spell_sheet: art.spell,
            hud,
            input,
            audio,
            session,
            outcome: None,
            win_delay: Countdown::starting_at(rules.win_delay),
            lose_delay: Countdown::starting_at(rules.lose_delay),
            greeted: false,
        })
    }

    /// Handle for the host's touch path.
    pub fn input(&self) -> SharedInput {
        Arc::clone(&self.input)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn npc(&self) -> &Npc {
        &self.npc
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn spells(&self) -> &[Spell] {
        &self.spells
    }

    pub fn view(&self) -> &GameView {
        &self.view
    }

    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }

    /// One fixed simulation step.
    pub fn update(&mut self) {
        let (presses, actuator) = {
            let mut input = lock(&self.input);
            let presses = Presses {
                attack: input.is_just_pressed(ButtonId::Attack),
                jump: input.is_just_pressed(ButtonId::Jump),
                exit: input.is_just_pressed(ButtonId::Exit),
                restart: input.is_just_pressed(ButtonId::Restart),
            };
            let actuator = input.actuator();
            input.end_frame();
            (presses, actuator)
        };

        let playing = self.outcome.is_none();
        if self.hud.update(presses.attack && playing, presses.jump && playing) {
            self.session.raise(SessionSignal::IntroFinished);
        }

        // A decided session is frozen; only the menu reacts.
        if !playing {
            if presses.exit {
                self.session.raise(SessionSignal::ExitRequested);
            }
            if presses.restart {
                self.session.raise(SessionSignal::RestartRequested);
            }
            return;
        }

        self.resolve_outcome();

        if presses.attack {
            self.player_attack();
        }
        if presses.jump {
            self.player.jump();
        }

        self.update_enemies();

        let step = self.player.update(PlayerContext {
            actuator,
            layout: &mut self.layout,
        });
        if step.trap_sprung {
            self.audio.play(Sound::Clang);
        }
        if step.on_active_trap {
            self.player
                .apply_damage(self.config.player.trap_damage, self.audio.as_mut());
        }

        self.npc.update(NpcContext {
            player: &self.player.character,
        });

        self.update_spells();

        let body = self.player.character.body;
        let player_window_x = self.view.to_window_x(body.position.x);
        self.view.follow(
            player_window_x,
            body.velocity.x,
            self.config.window.scroll_low,
            self.config.window.scroll_high,
        );
        self.layout.update(&self.view);
        self.view.update();
    }

    /// Loss after the lose delay once the player is down; win after the win
    /// delay while the player is past the finish with no live slime nearby.
    fn resolve_outcome(&mut self) {
        if self.player.character.is_defeated() {
            if elapse(&mut self.lose_delay) {
                self.decide(Outcome::Lost);
            }
            return;
        }
        if !self.is_clear_at_finish() {
            return;
        }
        if !self.greeted {
            self.greeted = true;
            self.audio.play(Sound::Meow);
        }
        if elapse(&mut self.win_delay) {
            self.decide(Outcome::Won);
        }
    }

    fn is_clear_at_finish(&self) -> bool {
        let player = &self.player.character;
        let safe_distance = self.config.rules.safe_distance;
        player.position().x > self.finish_point
            && !self.enemies.iter().any(|enemy| {
                !enemy.character.is_defeated()
                    && distance_between(player, &enemy.character) < safe_distance
            })
    }

    fn decide(&mut self, outcome: Outcome) {
        log::info!("Session decided: {:?}", outcome);
        self.outcome = Some(outcome);
        Hud::show_menu(&mut lock(&self.input));
        self.session.raise(SessionSignal::OutcomeChanged(outcome));
    }

    /// Bite: one hit on the nearest live slime in range, resolved at the
    /// moment of the press.
    fn player_attack(&mut self) {
        if self.player.character.is_defeated() {
            return;
        }
        self.player.attack();
        self.audio.play(Sound::Bite);

        let player = &self.player.character;
        let range = self.config.player.melee_range;
        let target = self
            .enemies
            .iter_mut()
            .filter(|enemy| !enemy.character.is_defeated())
            .map(|enemy| (distance_between(player, &enemy.character), enemy))
            .filter(|(distance, _)| *distance < range)
            .min_by(|a, b| a.0.total_cmp(&b.0));
        if let Some((distance, enemy)) = target {
            log::debug!("Bite lands at distance {:.1}", distance);
            enemy.apply_damage(self.config.player.melee_damage, self.audio.as_mut());
        }
    }

    fn update_enemies(&mut self) {
        let spell_speed = self.config.spell_max_speed();
        let enemy_config = self.config.enemy;
        for enemy in &mut self.enemies {
            enemy.update(EnemyContext {
                player: &self.player.character,
            });

            if enemy.behaviour.take_spell_request() {
                self.spells.push(Spell::launch(
                    Arc::clone(&self.spell_sheet),
                    &enemy.character,
                    spell_speed,
                    self.config.frame_clock(),
                ));
            }

            let bite_distance = distance_between(&enemy.character, &self.player.character);
            if enemy.behaviour.is_hit_due() && bite_distance < enemy_config.melee_range {
                self.player
                    .apply_damage(enemy_config.melee_damage, self.audio.as_mut());
                self.audio.play(Sound::EnemyBite);
            }
        }
    }

    /// Advance spells, apply each one's damage once, and drop finished or
    /// missed ones.
    fn update_spells(&mut self) {
        let spell = self.config.spell;
        let cull_margin = self.config.window.spell_cull_margin;
        let player = &mut self.player;
        let audio: &mut dyn AudioSink = self.audio.as_mut();
        let view = &self.view;

        self.spells.retain_mut(|projectile| {
            projectile.update();
            if projectile.is_finished() {
                return false;
            }
            if projectile.is_hit(&player.character, spell.hit_margin) {
                projectile.set_hit();
                if !projectile.is_counted() {
                    projectile.count_hit();
                    audio.play(Sound::SpellHit);
                    player.apply_damage(spell.damage, &mut *audio);
                }
                return true;
            }
            !projectile.is_outside_window(view, cull_margin)
        });
    }

    /// Compose one frame, back to front.
    pub fn draw(&self, canvas: &mut dyn Canvas, stats: &ThroughputSample) {
        self.layout.draw_back(canvas, &self.view);
        for enemy in &self.enemies {
            enemy.character.draw(canvas, &self.view);
        }
        self.npc.character.draw(canvas, &self.view);
        self.player.character.draw(canvas, &self.view);
        self.layout.draw_front(canvas, &self.view);
        for spell in &self.spells {
            spell.draw(canvas, &self.view);
        }

        self.hud.draw_health(canvas, self.player.character.health());
        if self.outcome.is_none() {
            let input = lock(&self.input);
            self.hud.draw_controls(canvas, input.joystick());
        }
        self.hud.draw_performance(canvas, stats);
        self.hud.draw_intro(canvas);
        if let Some(outcome) = self.outcome {
            self.hud.draw_outcome(canvas, outcome);
        }
    }
}

/// Tick an end-of-session delay; true once it has run out.
fn elapse(delay: &mut Countdown) -> bool {
    delay.tick() || delay.expired()
}

impl Simulation for Game {
    fn update(&mut self) {
        Game::update(self);
    }

    fn draw(&self, canvas: &mut dyn Canvas, stats: &ThroughputSample) {
        Game::draw(self, canvas, stats);
    }
}
