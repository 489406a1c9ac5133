//! Animated characters: the dog, the cat and the slimes.
//!
//! A [`Character`] is a [`Body`] plus a sprite animation and health. What a
//! character *does* each update lives in its [`Behaviour`]; an [`Actor`]
//! pairs the two.

use std::sync::Arc;

use dv_core::{AnimationRow, FrameClock, Rect, RowFrames, SpriteAnimation};
use dv_render::{AssetError, Blit, Canvas, SpriteSheet};
use glam::DVec2;

use crate::audio::{AudioSink, Sound};
use crate::entity::Body;
use crate::viewport::GameView;

pub const MAX_HEALTH: u32 = 100;

/// A character sprite sheet: the grid plus which sheet row holds each
/// animation row and how many frames that row has.
#[derive(Debug, Clone)]
pub struct CharacterSheet {
    sheet: SpriteSheet,
    sheet_rows: [u32; 5],
    frames: RowFrames,
}

impl CharacterSheet {
    /// `sheet_rows` and `frames` are given in `AnimationRow::ALL` order.
    pub fn new(
        sheet: SpriteSheet,
        sheet_rows: [u32; 5],
        frames: [usize; 5],
    ) -> Result<Self, AssetError> {
        let fits = sheet_rows.iter().all(|&row| row < sheet.rows())
            && frames.iter().all(|&count| count <= sheet.cols() as usize);
        if !fits {
            return Err(AssetError::SheetGeometry {
                id: sheet.image().to_string(),
                width: sheet.cols() * sheet.frame_width() as u32,
                height: sheet.rows() * sheet.frame_height() as u32,
                rows: sheet_rows.iter().copied().max().unwrap_or(0) + 1,
                cols: frames.iter().copied().max().unwrap_or(0) as u32,
            });
        }
        Ok(Self {
            sheet,
            sheet_rows,
            frames: RowFrames::new(frames),
        })
    }

    pub fn frames(&self) -> RowFrames {
        self.frames
    }

    pub fn frame_width(&self) -> f64 {
        self.sheet.frame_width()
    }

    pub fn frame_height(&self) -> f64 {
        self.sheet.frame_height()
    }

    fn source_rect(&self, row: AnimationRow, column: usize) -> Rect {
        self.sheet
            .frame_rect(self.sheet_rows[row.index()], column as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Health was already zero; nothing changed.
    Ignored,
    Hurt,
    Died,
}

#[derive(Debug, Clone)]
pub struct Character {
    pub body: Body,
    animation: SpriteAnimation,
    sheet: Arc<CharacterSheet>,
    health: u32,
}

impl Character {
    pub fn new(sheet: Arc<CharacterSheet>, position: DVec2, clock: FrameClock) -> Self {
        Self {
            body: Body::new(position),
            animation: SpriteAnimation::new(sheet.frames(), clock),
            sheet,
            health: MAX_HEALTH,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    /// Health has reached zero. The death animation may still be playing.
    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// The death animation has finished; terminal.
    pub fn is_dead(&self) -> bool {
        self.animation.is_dead()
    }

    pub fn animation(&self) -> &SpriteAnimation {
        &self.animation
    }

    pub fn width(&self) -> f64 {
        self.sheet.frame_width()
    }

    pub fn height(&self) -> f64 {
        self.sheet.frame_height()
    }

    pub fn position(&self) -> DVec2 {
        self.body.position
    }

    pub fn center(&self) -> DVec2 {
        self.body.position + DVec2::new(self.width(), self.height()) * 0.5
    }

    /// Lower third of the frame: the part that touches traps.
    pub fn foot_zone(&self) -> Rect {
        let feet = self.body.position.y + self.height();
        Rect::new(
            self.body.position.x,
            feet - self.height() / 3.0,
            self.body.position.x + self.width(),
            feet,
        )
    }

    /// Subtract `points` from health, never below zero. Reaching zero starts
    /// the death animation; any other hit plays the hurt animation.
    pub fn apply_damage(&mut self, points: u32) -> DamageOutcome {
        if self.health == 0 {
            return DamageOutcome::Ignored;
        }
        self.health = self.health.saturating_sub(points);
        if self.health == 0 {
            self.animation.set_animation_locked(AnimationRow::Death);
            DamageOutcome::Died
        } else {
            self.animation.set_animation_locked(AnimationRow::Hurt);
            DamageOutcome::Hurt
        }
    }

    pub fn set_animation(&mut self, row: AnimationRow) {
        self.animation.set_animation(row);
    }

    pub fn set_animation_locked(&mut self, row: AnimationRow) {
        self.animation.set_animation_locked(row);
    }

    pub fn tick_animation(&mut self) {
        self.animation.tick();
    }

    /// Walk while moving, idle otherwise. Locked rows are left alone.
    pub fn pick_motion_animation(&mut self) {
        if self.body.is_moving() {
            self.set_animation(AnimationRow::Walk);
        } else {
            self.set_animation(AnimationRow::Idle);
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, view: &GameView) {
        let (row, column) = self.animation.display_frame();
        let window = view.to_window_space(self.body.position);
        canvas.blit(Blit {
            image: self.sheet.sheet.image().clone(),
            src: self.sheet.source_rect(row, column),
            dst: Rect::from_origin_size(window.x, window.y, self.width(), self.height()),
            flip_x: self.body.direction().x < 0.0,
            rotation_deg: 0.0,
        });
    }
}

/// Centre-to-centre distance.
pub fn distance_between(a: &Character, b: &Character) -> f64 {
    a.center().distance(b.center())
}

/// Per-kind update logic for a character.
pub trait Behaviour {
    /// World state the behaviour reads (or touches) during its update.
    type Context<'a>;
    type Output;

    fn update(&mut self, character: &mut Character, context: Self::Context<'_>) -> Self::Output;

    /// Played once when the character's health reaches zero.
    fn death_sound(&self) -> Option<Sound>;
}

#[derive(Debug, Clone)]
pub struct Actor<B> {
    pub character: Character,
    pub behaviour: B,
}

impl<B: Behaviour> Actor<B> {
    pub fn new(character: Character, behaviour: B) -> Self {
        Self {
            character,
            behaviour,
        }
    }

    pub fn update(&mut self, context: B::Context<'_>) -> B::Output {
        self.behaviour.update(&mut self.character, context)
    }

    pub fn apply_damage(&mut self, points: u32, audio: &mut dyn AudioSink) -> DamageOutcome {
        let outcome = self.character.apply_damage(points);
        if outcome == DamageOutcome::Died {
            if let Some(sound) = self.behaviour.death_sound() {
                audio.play(sound);
            }
        }
        outcome
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use dv_render::{DrawCommand, DrawList, RawImage};
    use rstest::rstest;

    /// 48x48 frames laid out like the dog and cat sheets.
    pub(crate) fn dog_sheet() -> Arc<CharacterSheet> {
        let sheet = SpriteSheet::slice("dog", &RawImage::blank(288, 240), 5, 6).expect("grid");
        Arc::new(CharacterSheet::new(sheet, [4, 3, 0, 1, 2], [6, 4, 4, 4, 2]).expect("rows"))
    }

    pub(crate) fn dog_at(x: f64, y: f64) -> Character {
        Character::new(dog_sheet(), DVec2::new(x, y), FrameClock::new(60, 10))
    }

    #[rstest]
    #[case(&[10], 90)]
    #[case(&[30, 30, 30], 10)]
    #[case(&[60, 60], 0)]
    #[case(&[100, 5], 0)]
    #[case(&[0], 100)]
    fn health_never_goes_negative(#[case] hits: &[u32], #[case] expected: u32) {
        let mut dog = dog_at(0.0, 0.0);
        for &points in hits {
            let before = dog.health();
            dog.apply_damage(points);
            assert_eq!(before - dog.health(), points.min(before));
        }
        assert_eq!(dog.health(), expected);
    }

    #[test]
    fn fatal_damage_starts_death_exactly_once() {
        let mut dog = dog_at(0.0, 0.0);
        assert_eq!(dog.apply_damage(40), DamageOutcome::Hurt);
        assert_eq!(dog.animation().row(), AnimationRow::Hurt);
        assert_eq!(dog.apply_damage(70), DamageOutcome::Died);
        assert_eq!(dog.animation().row(), AnimationRow::Death);
        assert_eq!(dog.apply_damage(5), DamageOutcome::Ignored);
        assert!(dog.is_defeated());
        assert!(!dog.is_dead());

        // Four death frames at six updates per frame.
        for _ in 0..23 {
            dog.tick_animation();
            assert!(!dog.is_dead());
        }
        dog.tick_animation();
        assert!(dog.is_dead());
    }

    #[test]
    fn death_sound_is_played_by_actor() {
        struct Mute;
        impl Behaviour for Mute {
            type Context<'a> = ();
            type Output = ();
            fn update(&mut self, _: &mut Character, _: Self::Context<'_>) -> Self::Output {}
            fn death_sound(&self) -> Option<Sound> {
                Some(Sound::EnemyDeath)
            }
        }

        let audio = crate::audio::RecordingAudio::new();
        let mut sink = audio.clone();
        let mut actor = Actor::new(dog_at(0.0, 0.0), Mute);
        actor.apply_damage(99, &mut sink);
        assert!(audio.played().is_empty());
        actor.apply_damage(1, &mut sink);
        actor.apply_damage(1, &mut sink);
        assert_eq!(audio.played(), vec![Sound::EnemyDeath]);
    }

    #[test]
    fn draw_mirrors_when_facing_left() {
        let mut dog = dog_at(100.0, 243.0);
        let view = GameView::new(480.0);
        let mut list = DrawList::new();
        dog.draw(&mut list, &view);
        dog.body.velocity = DVec2::new(-1.0, 0.0);
        dog.body.face_velocity();
        dog.draw(&mut list, &view);

        let flips: Vec<bool> = list
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Blit(blit) => Some(blit.flip_x),
                _ => None,
            })
            .collect();
        assert_eq!(flips, vec![false, true]);
    }

    #[test]
    fn idle_frame_comes_from_mapped_sheet_row() {
        let dog = dog_at(0.0, 0.0);
        let mut list = DrawList::new();
        dog.draw(&mut list, &GameView::new(480.0));
        match &list.commands()[0] {
            DrawCommand::Blit(blit) => {
                // Idle lives on sheet row 3.
                assert_eq!(blit.src, Rect::new(0.0, 144.0, 48.0, 192.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn foot_zone_is_lower_third() {
        let dog = dog_at(10.0, 243.0);
        assert_eq!(dog.foot_zone(), Rect::new(10.0, 275.0, 58.0, 291.0));
    }
}
