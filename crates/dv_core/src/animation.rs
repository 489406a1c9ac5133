//! Row/column sprite-sheet animation driven by fixed simulation updates.
//!
//! A character sheet holds one row per action (walk, idle, attack, death,
//! hurt) with a sheet-specific number of frames per row. The animation
//! advances one column every `updates_per_frame` updates (target update rate
//! divided by the animation frame rate), so timing is deterministic under the
//! fixed-step loop and independent of how often frames are drawn.
//!
//! Locking: a locked row plays to the end of its cycle before another row may
//! replace it. Death pre-empts any lock, and once the death row completes a
//! full cycle the animation is frozen for good.

use crate::countdown::Countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationRow {
    Walk,
    Idle,
    Attack,
    Death,
    Hurt,
}

impl AnimationRow {
    pub const ALL: [AnimationRow; 5] = [
        AnimationRow::Walk,
        AnimationRow::Idle,
        AnimationRow::Attack,
        AnimationRow::Death,
        AnimationRow::Hurt,
    ];

    pub const fn index(self) -> usize {
        match self {
            Self::Walk => 0,
            Self::Idle => 1,
            Self::Attack => 2,
            Self::Death => 3,
            Self::Hurt => 4,
        }
    }
}

/// Frame count for each animation row, indexed by [`AnimationRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFrames([usize; 5]);

impl RowFrames {
    /// Counts in `AnimationRow::ALL` order: walk, idle, attack, death, hurt.
    pub const fn new(counts: [usize; 5]) -> Self {
        Self(counts)
    }

    pub const fn get(&self, row: AnimationRow) -> usize {
        self.0[row.index()]
    }
}

/// Paces frame advances: fires once every `updates_per_frame` ticks.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    updates_per_frame: u32,
    countdown: Countdown,
}

impl FrameClock {
    pub fn new(target_ups: u32, animation_fps: u32) -> Self {
        let updates_per_frame = (target_ups / animation_fps.max(1)).max(1);
        Self {
            updates_per_frame,
            countdown: Countdown::starting_at(updates_per_frame),
        }
    }

    pub const fn updates_per_frame(&self) -> u32 {
        self.updates_per_frame
    }

    /// Returns `true` when the animation should advance one column.
    pub fn tick(&mut self) -> bool {
        if self.countdown.tick() {
            self.countdown.restart(self.updates_per_frame);
            true
        } else {
            false
        }
    }

    /// Start a fresh full frame period.
    pub fn reset(&mut self) {
        self.countdown.restart(self.updates_per_frame);
    }
}

#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    frames: RowFrames,
    clock: FrameClock,
    row: AnimationRow,
    column: usize,
    locked: bool,
    dead: bool,
}

impl SpriteAnimation {
    pub fn new(frames: RowFrames, clock: FrameClock) -> Self {
        Self {
            frames,
            clock,
            row: AnimationRow::Idle,
            column: 0,
            locked: false,
            dead: false,
        }
    }

    pub fn frames(&self) -> &RowFrames {
        &self.frames
    }

    pub fn updates_per_frame(&self) -> u32 {
        self.clock.updates_per_frame()
    }

    pub fn row(&self) -> AnimationRow {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Terminal flag: set once the death row has completed one full cycle.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Switch rows unless the current row is locked or already showing.
    pub fn set_animation(&mut self, row: AnimationRow) {
        if self.dead || self.locked || row == self.row {
            return;
        }
        if self.frames.get(row) == 0 {
            log::trace!("Ignoring switch to empty animation row {:?}", row);
            return;
        }
        self.row = row;
        self.column = 0;
    }

    /// Switch rows and lock until the row completes a cycle. Death pre-empts
    /// an existing lock; any other row waits for the lock to release.
    pub fn set_animation_locked(&mut self, row: AnimationRow) {
        if self.dead || row == self.row {
            return;
        }
        if self.locked && row != AnimationRow::Death {
            return;
        }
        if self.frames.get(row) == 0 {
            if row == AnimationRow::Death {
                // Nothing to play: the sprite is dead immediately.
                self.row = row;
                self.column = 0;
                self.dead = true;
            }
            return;
        }
        self.row = row;
        self.column = 0;
        self.locked = true;
    }

    /// Advance the animation by one simulation update.
    pub fn tick(&mut self) {
        if self.dead {
            return;
        }
        let frame_count = self.frames.get(self.row);
        if frame_count == 0 || !self.clock.tick() {
            return;
        }
        self.column += 1;
        if self.column >= frame_count {
            self.column = 0;
            self.locked = false;
            if self.row == AnimationRow::Death {
                self.dead = true;
            }
        }
    }

    /// Row and column to render. Dead sprites stay on the last death frame.
    pub fn display_frame(&self) -> (AnimationRow, usize) {
        if self.dead {
            let last = self.frames.get(AnimationRow::Death).saturating_sub(1);
            (AnimationRow::Death, last)
        } else {
            (self.row, self.column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog_frames() -> RowFrames {
        RowFrames::new([6, 4, 4, 4, 2])
    }

    fn animation() -> SpriteAnimation {
        SpriteAnimation::new(dog_frames(), FrameClock::new(60, 10))
    }

    fn run(anim: &mut SpriteAnimation, updates: u32) {
        for _ in 0..updates {
            anim.tick();
        }
    }

    #[test]
    fn frame_clock_derives_updates_per_frame() {
        assert_eq!(FrameClock::new(60, 10).updates_per_frame(), 6);
        assert_eq!(FrameClock::new(60, 0).updates_per_frame(), 60);
        assert_eq!(FrameClock::new(5, 10).updates_per_frame(), 1);
    }

    #[test]
    fn frame_clock_fires_every_period() {
        let mut clock = FrameClock::new(60, 10);
        let fired: Vec<bool> = (0..12).map(|_| clock.tick()).collect();
        assert_eq!(fired.iter().filter(|f| **f).count(), 2);
        assert!(fired[5]);
        assert!(fired[11]);
    }

    #[test]
    fn advances_one_column_per_frame_period() {
        let mut anim = animation();
        anim.set_animation(AnimationRow::Walk);
        run(&mut anim, 5);
        assert_eq!(anim.column(), 0);
        run(&mut anim, 1);
        assert_eq!(anim.column(), 1);
    }

    #[test]
    fn unlocked_switch_resets_column() {
        let mut anim = animation();
        anim.set_animation(AnimationRow::Walk);
        run(&mut anim, 12);
        assert_eq!(anim.column(), 2);
        anim.set_animation(AnimationRow::Idle);
        assert_eq!(anim.row(), AnimationRow::Idle);
        assert_eq!(anim.column(), 0);
    }

    #[test]
    fn same_row_switch_keeps_column() {
        let mut anim = animation();
        anim.set_animation(AnimationRow::Walk);
        run(&mut anim, 6);
        anim.set_animation(AnimationRow::Walk);
        assert_eq!(anim.column(), 1);
    }

    #[test]
    fn lock_holds_until_cycle_completes() {
        let mut anim = animation();
        anim.set_animation_locked(AnimationRow::Attack);
        anim.set_animation(AnimationRow::Walk);
        anim.set_animation_locked(AnimationRow::Hurt);
        assert_eq!(anim.row(), AnimationRow::Attack);
        // 4 attack frames * 6 updates per frame
        run(&mut anim, 23);
        assert!(anim.is_locked());
        run(&mut anim, 1);
        assert!(!anim.is_locked());
        assert_eq!(anim.column(), 0);
        anim.set_animation(AnimationRow::Walk);
        assert_eq!(anim.row(), AnimationRow::Walk);
    }

    #[test]
    fn death_preempts_lock() {
        let mut anim = animation();
        anim.set_animation_locked(AnimationRow::Attack);
        run(&mut anim, 7);
        anim.set_animation_locked(AnimationRow::Death);
        assert_eq!(anim.row(), AnimationRow::Death);
        assert_eq!(anim.column(), 0);
        assert!(anim.is_locked());
    }

    #[test]
    fn dead_only_after_full_death_cycle() {
        let mut anim = animation();
        anim.set_animation_locked(AnimationRow::Death);
        for _ in 0..(4 * 6 - 1) {
            anim.tick();
            assert!(!anim.is_dead());
        }
        anim.tick();
        assert!(anim.is_dead());
        assert_eq!(anim.display_frame(), (AnimationRow::Death, 3));
    }

    #[test]
    fn dead_is_terminal() {
        let mut anim = animation();
        anim.set_animation_locked(AnimationRow::Death);
        run(&mut anim, 24);
        assert!(anim.is_dead());
        anim.set_animation(AnimationRow::Walk);
        anim.set_animation_locked(AnimationRow::Hurt);
        run(&mut anim, 100);
        assert!(anim.is_dead());
        assert_eq!(anim.display_frame(), (AnimationRow::Death, 3));
    }

    #[test]
    fn empty_row_is_ignored() {
        let frames = RowFrames::new([6, 4, 0, 4, 2]);
        let mut anim = SpriteAnimation::new(frames, FrameClock::new(60, 10));
        anim.set_animation_locked(AnimationRow::Attack);
        assert_eq!(anim.row(), AnimationRow::Idle);
        assert!(!anim.is_locked());
        run(&mut anim, 30);
        assert!(anim.column() < 4);
    }

    #[test]
    fn empty_death_row_kills_immediately() {
        let frames = RowFrames::new([6, 4, 4, 0, 2]);
        let mut anim = SpriteAnimation::new(frames, FrameClock::new(60, 10));
        anim.set_animation_locked(AnimationRow::Death);
        assert!(anim.is_dead());
        assert_eq!(anim.display_frame(), (AnimationRow::Death, 0));
    }
}
