pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod food;
pub mod game;
pub mod grid;
pub mod particles;
pub mod segment;
pub mod sim;
pub mod snake;

pub use config::{CliArgs, GameConfig, PlayerConfig};
pub use control::{ControlScheme, ControlStrategy, DirectInput, Key, KeySet, Pursuit};
pub use error::ConfigError;
pub use events::{EventSink, GameEvent};
pub use food::{Food, FoodKind, FoodVariant};
pub use grid::{Direction, Grid, Position};
pub use segment::{classify_segment, SegmentShape};
pub use sim::{Simulation, Winner};
pub use snake::{Rules, Snake, SnakeColor, SnakeView};
