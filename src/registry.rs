//! Player slots: at most two named, connected players at a time.

use crate::session::SessionHandle;
use core::fmt;

/// Number of player slots.
pub const MAX_PLAYERS: usize = 2;

/// A registered player bound to the connection that logged it in.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    /// Remote address of the owning connection, used for command attribution.
    pub addr: String,
    pub handle: SessionHandle,
}

/// One of the two fixed player positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub fn number(self) -> u8 {
        match self {
            Slot::One => 1,
            Slot::Two => 2,
        }
    }

    fn from_index(index: usize) -> Slot {
        if index == 0 {
            Slot::One
        } else {
            Slot::Two
        }
    }
}

/// Errors returned by registry operations. All are no-ops from the client's
/// point of view; nothing is sent back on failure.
#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Both player slots are already taken.
    AlreadyFull,
    /// No registered player carries the given name.
    NotFound,
    /// Login was attempted with an empty name.
    EmptyName,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::AlreadyFull => write!(f, "both player slots are taken"),
            RegistryError::NotFound => write!(f, "no player with that name"),
            RegistryError::EmptyName => write!(f, "player name must not be empty"),
        }
    }
}

/// Holds the two player slots. Slot 1 fills before slot 2.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    slots: [Option<Player>; MAX_PLAYERS],
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` on the first free slot, bound to `addr`.
    pub fn login(
        &mut self,
        name: &str,
        addr: &str,
        handle: SessionHandle,
    ) -> Result<Slot, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let index = self
            .slots
            .iter()
            .position(|slot| slot.is_none())
            .ok_or(RegistryError::AlreadyFull)?;
        self.slots[index] = Some(Player {
            name: name.to_string(),
            addr: addr.to_string(),
            handle,
        });
        Ok(Slot::from_index(index))
    }

    /// Remove and return the player named `name`, freeing its slot.
    pub fn logout(&mut self, name: &str) -> Result<Player, RegistryError> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|p| p.name == name))
            .ok_or(RegistryError::NotFound)?;
        self.slots[index].take().ok_or(RegistryError::NotFound)
    }

    /// Free the slot bound to `addr`, if any. Used when a connection drops
    /// without a logout.
    pub fn release_addr(&mut self, addr: &str) -> Option<Player> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|p| p.addr == addr))?;
        self.slots[index].take()
    }

    /// Resolve the player that owns the connection at `addr`.
    pub fn identify(&self, addr: &str) -> Option<&Player> {
        self.slots.iter().flatten().find(|p| p.addr == addr)
    }

    /// Registered players, slot 1 first.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `line` to every registered player. Empty slots are skipped
    /// and a failed delivery to one player never affects the other.
    pub fn broadcast(&self, line: &str) {
        for player in self.players() {
            if !player.handle.send(line) {
                log::warn!("dropping broadcast to {}: session is gone", player.name);
            }
        }
    }

    /// Remove and return all registered players, freeing both slots.
    pub fn drain(&mut self) -> Vec<Player> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }
}
