pub mod board;
pub mod command;
pub mod config;
pub mod engine;
pub mod listener;
mod logging;
pub mod registry;
pub mod session;

pub use board::{AttackResult, Board, Cell};
pub use command::Command;
pub use config::{BOARD_SIZE, DEFAULT_BIND, DEPLOYMENT};
pub use engine::{Actor, GameServer};
pub use listener::{run, serve};
pub use logging::init_logging;
pub use registry::{Player, PlayerRegistry, RegistryError, Slot, MAX_PLAYERS};
pub use session::{run_session, SessionHandle};
