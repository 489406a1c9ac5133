use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use dv_game::{
    load_config_from_path, load_level_from_path, load_script_from_path, nominal_assets,
    session_channel, ConfigError, Game, GameConfig, GameError, GameLoop, LevelError, LevelFile,
    LogAudio, ScriptError, SessionSignal,
};
use dv_render::{AssetProvider, DirectoryAssets, HeadlessSurface};
use env_logger::Env;
use thiserror::Error;

/// Run the Dogville simulation without a display.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game config JSON; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level JSON; the built-in Dogville street when omitted
    #[arg(long)]
    level: Option<PathBuf>,

    /// Directory of PNG sheets; blank sheets of the shipped sizes when omitted
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Input script replayed one entry per update
    #[arg(long)]
    script: Option<PathBuf>,

    /// Stop after this many seconds if the session is still undecided
    #[arg(long, default_value_t = 10)]
    seconds: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("failed to start game loop: {0}")]
    Spawn(#[from] io::Error),
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();
}

fn run(args: &Args) -> Result<(), RunError> {
    let config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => GameConfig::default(),
    };
    let level = match &args.level {
        Some(path) => load_level_from_path(path)?,
        None => LevelFile::dogville(),
    };
    let script = args.script.as_deref().map(load_script_from_path).transpose()?;
    let assets: Box<dyn AssetProvider> = match &args.assets {
        Some(dir) => Box::new(DirectoryAssets::new(dir)),
        None => {
            log::info!("No asset directory given; using blank sheets");
            Box::new(nominal_assets())
        }
    };

    let (session, signals) = session_channel();
    let game = Game::new(config.clone(), level, assets.as_ref(), Box::new(LogAudio), session)?;
    let input = game.input();
    let game = Arc::new(Mutex::new(game));

    let target_ups = config.timing.target_ups;
    let mut game_loop = GameLoop::start(Arc::clone(&game), HeadlessSurface::new(), target_ups)?;

    let display = script
        .as_ref()
        .and_then(|script| script.display(config.window.width, config.window.height));
    let mut scripted = script
        .map(|script| script.expanded_inputs())
        .unwrap_or_default()
        .into_iter();

    // The feed runs at the update rate but is not locked to the loop, so
    // two entries can occasionally land in the same update.
    let period = Duration::from_secs_f64(1.0 / f64::from(target_ups.max(1)));
    let deadline = Instant::now().checked_add(Duration::from_secs(args.seconds));
    let mut done = false;
    while !done && deadline.map_or(true, |deadline| Instant::now() < deadline) {
        if let Some(entry) = scripted.next() {
            let mut input = input.lock().unwrap_or_else(PoisonError::into_inner);
            entry.apply(&mut input, display.as_ref());
        }
        for signal in signals.try_iter() {
            match signal {
                SessionSignal::ExitRequested | SessionSignal::OutcomeChanged(_) => done = true,
                SessionSignal::RestartRequested => {
                    log::info!("Restart requested; headless runs end instead");
                    done = true;
                }
                SessionSignal::IntroFinished => {}
            }
        }
        thread::sleep(period);
    }
    if !done {
        log::info!("Time limit of {}s reached", args.seconds);
    }

    let stats = game_loop.stats();
    let frames = game_loop
        .stop()
        .map_or(0, |surface| surface.presented_count());
    let game = game.lock().unwrap_or_else(PoisonError::into_inner);
    let player = &game.player().character;
    log::info!(
        "Session over: outcome {:?}, health {}, x={:.1}, {} frames, last {:.2} UPS / {:.2} FPS",
        game.outcome(),
        player.health(),
        player.position().x,
        frames,
        stats.average_ups,
        stats.average_fps
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    log::info!("Dogville starting...");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
