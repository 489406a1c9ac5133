//! Fixed-step update/draw loop on its own thread.
//!
//! Each cycle acquires a frame, runs one update and one draw while holding
//! the simulation lock, and presents. Between cycles the loop sleeps when
//! ahead of schedule and runs draw-less catch-up updates when behind, with
//! pacing delegated to [`TimeState`].

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use dv_core::{ThroughputSample, TimeState};
use dv_render::{Canvas, Surface};

/// What the loop drives.
pub trait Simulation: Send + 'static {
    fn update(&mut self);
    fn draw(&self, canvas: &mut dyn Canvas, stats: &ThroughputSample);
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct GameLoop<F> {
    running: Arc<AtomicBool>,
    stats: Arc<Mutex<ThroughputSample>>,
    handle: Option<JoinHandle<F>>,
}

impl<F: Surface + 'static> GameLoop<F> {
    /// Spawn the loop thread. The surface moves into the thread and is handed
    /// back by [`GameLoop::stop`].
    pub fn start<S: Simulation>(
        simulation: Arc<Mutex<S>>,
        surface: F,
        target_ups: u32,
    ) -> io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(Mutex::new(ThroughputSample::default()));
        let handle = thread::Builder::new().name("game-loop".to_string()).spawn({
            let running = Arc::clone(&running);
            let stats = Arc::clone(&stats);
            move || run(&simulation, surface, &running, &stats, target_ups)
        })?;
        Ok(Self {
            running,
            stats,
            handle: Some(handle),
        })
    }
}

impl<F> GameLoop<F> {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Most recent rolling averages (zero until the first second elapses).
    pub fn stats(&self) -> ThroughputSample {
        *lock(&self.stats)
    }

    /// Ask the loop to finish and wait for the thread to exit. No update or
    /// draw runs after this returns. Returns the surface on the first call.
    pub fn stop(&mut self) -> Option<F> {
        self.running.store(false, Ordering::Release);
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(surface) => {
                log::info!("Game loop stopped");
                Some(surface)
            }
            Err(_) => {
                log::error!("Game loop thread panicked");
                None
            }
        }
    }
}

impl<F> Drop for GameLoop<F> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<S: Simulation, F: Surface>(
    simulation: &Mutex<S>,
    mut surface: F,
    running: &AtomicBool,
    stats: &Mutex<ThroughputSample>,
    target_ups: u32,
) -> F {
    let mut time = TimeState::new(target_ups, Instant::now());
    log::info!("Game loop started at {} UPS", time.target_ups);

    while running.load(Ordering::Acquire) {
        time.begin_cycle();
        run_cycle(simulation, &mut surface, &mut time);

        if let Some(sleep) = time.ahead_by(Instant::now()) {
            thread::sleep(sleep);
        }

        while time.is_behind(Instant::now())
            && time.can_catch_up()
            && running.load(Ordering::Acquire)
        {
            lock(simulation).update();
            time.record_catch_up();
        }

        if let Some(sample) = time.roll_window(Instant::now()) {
            log::debug!(
                "Throughput: {:.2} UPS, {:.2} FPS",
                sample.average_ups,
                sample.average_fps
            );
            *lock(stats) = sample;
        }
    }

    log::debug!(
        "Game loop exiting after {} updates, {} frames",
        time.total_updates,
        time.total_frames
    );
    surface
}

/// One update and one draw. A surface that cannot be acquired skips the
/// whole cycle; a failed present loses only the frame.
fn run_cycle<S: Simulation, F: Surface>(
    simulation: &Mutex<S>,
    surface: &mut F,
    time: &mut TimeState,
) {
    let mut frame = match surface.acquire() {
        Ok(frame) => frame,
        Err(err) => {
            log::warn!("Skipping cycle: {err}");
            return;
        }
    };

    {
        let mut simulation = lock(simulation);
        simulation.update();
        time.record_update();
        simulation.draw(&mut frame, &time.latest);
    }

    match surface.present(frame) {
        Ok(()) => time.record_frame(),
        Err(err) => log::warn!("Dropped frame: {err}"),
    }
}
