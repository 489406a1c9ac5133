pub mod assets;
pub mod audio;
pub mod background;
pub mod character;
pub mod config;
pub mod display;
pub mod enemy;
pub mod entity;
pub mod game;
pub mod game_loop;
pub mod hud;
pub mod layout;
pub mod level;
pub mod npc;
pub mod player;
pub mod replay;
pub mod session;
pub mod spell;
pub mod trap;
pub mod viewport;

pub use assets::{nominal_assets, GameArt};
pub use audio::{AudioSink, LogAudio, RecordingAudio, Sound};
pub use config::{load_config_from_path, ConfigError, GameConfig};
pub use display::GameDisplay;
pub use game::{Game, GameError, SharedInput};
pub use game_loop::{GameLoop, Simulation};
pub use level::{load_level_from_path, LevelError, LevelFile};
pub use replay::{load_script_from_path, InputScript, ScriptError, ScriptedInput};
pub use session::{session_channel, Outcome, SessionSender, SessionSignal};
