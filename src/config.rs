use crate::common::BoardError;
use crate::shot::RepeatShotPolicy;

/// Default side length of the board.
pub const BOARD_SIZE: usize = 5;
/// Default number of single-cell ships in a fleet.
pub const NUM_SHIPS: usize = 3;
/// Default TCP port the listener binds to.
pub const DEFAULT_PORT: u16 = 12345;
/// Largest side length that fits the `u128` bitboards backing a board.
pub const MAX_BOARD_SIZE: usize = 11;
/// Largest frame either framing accepts, in bytes (the `u16` length prefix limit).
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Rules for one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub board_size: usize,
    pub ship_count: usize,
    pub repeat_policy: RepeatShotPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            ship_count: NUM_SHIPS,
            repeat_policy: RepeatShotPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Reject configurations under which placement could not terminate.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(BoardError::InvalidSize {
                size: self.board_size,
                max: MAX_BOARD_SIZE,
            });
        }
        let cells = self.board_size * self.board_size;
        if self.ship_count == 0 || self.ship_count >= cells {
            return Err(BoardError::PlacementExhaustion {
                ships: self.ship_count,
                cells,
            });
        }
        Ok(())
    }
}

/// Listener settings, assembled by the CLI.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub game: GameConfig,
    pub framing: crate::transport::Framing,
    /// Fixed RNG seed; connection `n` uses `seed + n`.
    pub seed: Option<u64>,
}

#[cfg(feature = "std")]
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            game: GameConfig::default(),
            framing: crate::transport::Framing::default(),
            seed: None,
        }
    }
}

#[cfg(feature = "std")]
impl ServerConfig {
    /// `bind:port` suitable for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
