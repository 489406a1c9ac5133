//! Wall-clock pacing for a fixed update rate.
//!
//! The loop keeps a one-second measurement window. Within it, update `n` is
//! scheduled at `n * period` after the window start: if the loop is ahead it
//! sleeps for the difference, if it is behind it runs extra updates without
//! drawing. Catch-up is capped per cycle so a long stall cannot starve
//! rendering. When the window closes, the rolling UPS/FPS averages are
//! recomputed and the schedule restarts from the current instant.
//!
//! All methods take `now` explicitly so pacing decisions are testable without
//! sleeping.

use std::time::{Duration, Instant};

const STATS_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThroughputSample {
    pub average_ups: f64,
    pub average_fps: f64,
}

pub struct TimeState {
    pub target_ups: u32,
    period: Duration,
    window_start: Instant,
    updates_in_window: u32,
    frames_in_window: u32,
    catch_up_this_cycle: u32,
    pub total_updates: u64,
    pub total_frames: u64,
    pub latest: ThroughputSample,
}

impl TimeState {
    pub fn new(target_ups: u32, now: Instant) -> Self {
        let target_ups = target_ups.max(1);
        Self {
            target_ups,
            period: Duration::from_secs_f64(1.0 / f64::from(target_ups)),
            window_start: now,
            updates_in_window: 0,
            frames_in_window: 0,
            catch_up_this_cycle: 0,
            total_updates: 0,
            total_frames: 0,
            latest: ThroughputSample::default(),
        }
    }

    /// Upper bound on extra updates run in a single cycle.
    pub fn max_catch_up(&self) -> u32 {
        self.target_ups.saturating_sub(1)
    }

    pub fn begin_cycle(&mut self) {
        self.catch_up_this_cycle = 0;
    }

    pub fn record_update(&mut self) {
        self.updates_in_window += 1;
        self.total_updates += 1;
    }

    pub fn record_catch_up(&mut self) {
        self.record_update();
        self.catch_up_this_cycle += 1;
    }

    pub fn record_frame(&mut self) {
        self.frames_in_window += 1;
        self.total_frames += 1;
    }

    fn scheduled(&self) -> Duration {
        self.period * self.updates_in_window
    }

    /// How long to sleep before the next update is due, if the loop is ahead.
    pub fn ahead_by(&self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.window_start);
        self.scheduled()
            .checked_sub(elapsed)
            .filter(|remaining| !remaining.is_zero())
    }

    pub fn is_behind(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.window_start) > self.scheduled()
    }

    pub fn can_catch_up(&self) -> bool {
        self.catch_up_this_cycle < self.max_catch_up()
    }

    /// Close the measurement window once a second has elapsed.
    pub fn roll_window(&mut self, now: Instant) -> Option<ThroughputSample> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < STATS_WINDOW {
            return None;
        }
        let seconds = elapsed.as_secs_f64();
        self.latest = ThroughputSample {
            average_ups: f64::from(self.updates_in_window) / seconds,
            average_fps: f64::from(self.frames_in_window) / seconds,
        };
        self.updates_in_window = 0;
        self.frames_in_window = 0;
        self.window_start = now;
        Some(self.latest)
    }
}
