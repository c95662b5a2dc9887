mod bot_controller;
mod constraints;
mod entity;
mod events;
mod game_state;
mod grid;
mod session;
mod settings;
mod snake;
mod spawner;
mod types;

pub use bot_controller::{BotController, SnakeBotKind};
pub use constraints::{ConstraintCounters, ConstraintTracker};
pub use entity::EntityPool;
pub use events::{TerminalEvent, TickEffect, TickOutcome, TickSnapshot};
pub use game_state::SnakeGame;
pub use grid::{Grid, is_occupied};
pub use session::{SessionBroadcaster, SnakeSession, SnakeSessionState};
pub use settings::{CellConfig, GameConfig, GameSettings, validate_initial_snake};
pub use snake::SnakeBody;
pub use spawner::EntitySpawner;
pub use types::{Cell, ConsumableEntity, DeathCause, Direction, EntityIdentity, Lifecycle, StationKind};
