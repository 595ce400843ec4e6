//! Serialized game state and attack resolution.
//!
//! All shared state (the board and both player slots) lives behind a single
//! mutex, so logins, logouts, attacks and disconnects are linearized: one
//! operation fully completes, broadcast included, before the next mutates.
//! Broadcasts are non-blocking queue pushes, so the lock is never held
//! across an await point.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::board::{AttackResult, Board};
use crate::command::Command;
use crate::registry::{PlayerRegistry, RegistryError, Slot};
use crate::session::SessionHandle;
use core::fmt;

/// Attribution of an attack. Attacks from connections that never logged in
/// are allowed and carry an empty name on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Named(String),
    Unknown,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Named(name) => f.write_str(name),
            Actor::Unknown => Ok(()),
        }
    }
}

struct GameState {
    board: Board,
    registry: PlayerRegistry,
}

/// The shared game: one board, two player slots, one lock.
pub struct GameServer {
    state: Mutex<GameState>,
}

impl GameServer {
    /// A server over the reference deployment.
    pub fn new() -> Self {
        Self::with_board(Board::new())
    }

    pub fn with_board(board: Board) -> Self {
        GameServer {
            state: Mutex::new(GameState {
                board,
                registry: PlayerRegistry::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, GameState> {
        // State mutations are single assignments, so a poisoned lock still
        // holds consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Route one parsed command from the connection at `addr`. Failures are
    /// silent on the wire; the connection stays open.
    pub fn dispatch(&self, addr: &str, handle: &SessionHandle, command: Command) {
        match command {
            Command::Login { name } => {
                if let Err(err) = self.login(addr, &name, handle) {
                    log::debug!("login {:?} from {} rejected: {}", name, addr, err);
                }
            }
            Command::Logout { name } => {
                if let Err(err) = self.logout(&name) {
                    log::debug!("logout {:?} from {} rejected: {}", name, addr, err);
                }
            }
            Command::Attack { x, y } => self.attack(addr, handle, &x, &y),
        }
    }

    /// Register the connection at `addr` as a player.
    pub fn login(
        &self,
        addr: &str,
        name: &str,
        handle: &SessionHandle,
    ) -> Result<Slot, RegistryError> {
        let mut state = self.state();
        let slot = state.registry.login(name, addr, handle.clone())?;
        log::info!("ready player {}: {} ({})", slot.number(), name, addr);
        Ok(slot)
    }

    /// Free the named player's slot and close its connection.
    pub fn logout(&self, name: &str) -> Result<(), RegistryError> {
        let player = self.state().registry.logout(name)?;
        player.handle.close();
        log::info!("player {} logged out", player.name);
        Ok(())
    }

    /// Release whatever slot the connection at `addr` holds. Called when a
    /// session ends without a logout; a no-op for unregistered connections.
    pub fn disconnect(&self, addr: &str) {
        if let Some(player) = self.state().registry.release_addr(addr) {
            log::info!("player {} disconnected", player.name);
        }
    }

    /// Resolve an attack issued by the connection at `addr`.
    ///
    /// The outcome broadcasts to both registered players as
    /// `"<actor>:<result> <x> <y>"`. On victory the attacker additionally
    /// receives `"Game won by <actor>"` and both players are force-logged
    /// out, ending the match.
    pub fn attack(&self, addr: &str, handle: &SessionHandle, x_raw: &str, y_raw: &str) {
        // A missing coordinate token short-circuits with no response at all.
        if x_raw.is_empty() || y_raw.is_empty() {
            return;
        }
        let mut state = self.state();
        let actor = match state.registry.identify(addr) {
            Some(player) => Actor::Named(player.name.clone()),
            None => Actor::Unknown,
        };
        let result = match (x_raw.parse::<usize>(), y_raw.parse::<usize>()) {
            (Ok(x), Ok(y)) => state.board.attack(x, y),
            // Non-numeric coordinates are rejected, not read as zero.
            _ => AttackResult::Invalid,
        };
        let message = format!("{}:{} {} {}", actor, result, x_raw, y_raw);
        log::info!("{}", message);
        state.registry.broadcast(&message);

        if state.board.victory() {
            log::info!("game won by {}", actor);
            handle.send(format!("Game won by {}", actor));
            for player in state.registry.drain() {
                player.handle.close();
            }
        }
    }
}

impl Default for GameServer {
    fn default() -> Self {
        GameServer::new()
    }
}
