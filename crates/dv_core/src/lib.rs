pub mod animation;
pub mod countdown;
pub mod geometry;
pub mod input;
pub mod time;

pub use animation::{AnimationRow, FrameClock, RowFrames, SpriteAnimation};
pub use countdown::Countdown;
pub use geometry::Rect;
pub use input::{ButtonId, InputState, Joystick, JoystickHeading, TouchEvent};
pub use time::{ThroughputSample, TimeState};
