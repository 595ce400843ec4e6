//! Fixed game configuration: board dimension and the reference deployment.

/// Side length of the square board.
pub const BOARD_SIZE: usize = 10;

/// Ship cells present in the reference deployment: two single-cell ships
/// in opposite corners.
pub const DEPLOYMENT: [(usize, usize); 2] = [(0, 0), (9, 9)];

/// Default listen address for the server.
pub const DEFAULT_BIND: &str = "localhost:8080";
