//! Per-connection game state machine.
//!
//! `Idle --place/reset--> Active --last ship hit--> GameOver --reset--> Active`
//!
//! Shots are only resolved while `Active`; in the other phases they are
//! answered with `INVALIDO` so the client always gets exactly one reply
//! per shot. Reset and add-ships are accepted in every phase.

use alloc::vec;
use alloc::vec::Vec;
use rand::rngs::SmallRng;

use crate::board::Board;
use crate::common::{BoardError, Coord, ShotOutcome};
use crate::config::GameConfig;
use crate::fleet::place_fleet;
use crate::protocol::{
    Request, ServerMessage, ADD_SHIPS_TEXT, FLEET_SUNK_TEXT, GREETING_TEXT, RESET_TEXT,
};
use crate::shot::resolve_shot;

/// Lifecycle phase of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// No fleet placed yet.
    Idle,
    /// Shots are being accepted.
    Active,
    /// Every ship cell has been hit.
    GameOver,
}

/// One client's game: the board, the rules it was created with, and the
/// RNG used to (re)place the fleet.
pub struct GameSession {
    config: GameConfig,
    rng: SmallRng,
    board: Option<Board>,
    phase: Phase,
}

impl GameSession {
    /// A fresh, idle session. Fails if `config` could never place a fleet.
    pub fn new(config: GameConfig, rng: SmallRng) -> Result<Self, BoardError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            board: None,
            phase: Phase::Idle,
        })
    }

    /// An active session over a board the caller has already populated.
    /// Later resets place `config.ship_count` ships on a board of the same size.
    pub fn from_board(config: GameConfig, board: Board, rng: SmallRng) -> Result<Self, BoardError> {
        let config = GameConfig {
            board_size: board.size(),
            ..config
        };
        config.validate()?;
        let phase = if board.remaining_ship_cells() == 0 {
            Phase::GameOver
        } else {
            Phase::Active
        };
        Ok(Self {
            config,
            rng,
            board: Some(board),
            phase,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current board, once a fleet has been placed.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Ship cells not yet hit.
    pub fn remaining(&self) -> usize {
        self.board.map_or(0, |b| b.remaining_ship_cells())
    }

    /// Message sent to the client when the session starts.
    pub fn greeting(&self) -> ServerMessage {
        ServerMessage::Inicio(GREETING_TEXT.into())
    }

    /// Apply one request and return the replies to send, in order.
    pub fn handle(&mut self, request: Request) -> Result<Vec<ServerMessage>, BoardError> {
        match request {
            Request::Reset => self.restart(RESET_TEXT),
            Request::AddShips => self.restart(ADD_SHIPS_TEXT),
            Request::Shot(at) => Ok(self.shoot(at)),
        }
    }

    /// Replace the board wholesale with a freshly placed fleet.
    fn restart(&mut self, ack: &str) -> Result<Vec<ServerMessage>, BoardError> {
        let mut board = Board::new(self.config.board_size)?;
        let placed = place_fleet(&mut board, self.config.ship_count, &mut self.rng)?;
        log::debug!("fleet placed at {:?}", placed);
        self.board = Some(board);
        self.phase = Phase::Active;
        Ok(vec![ServerMessage::Reset(ack.into())])
    }

    fn shoot(&mut self, at: Coord) -> Vec<ServerMessage> {
        let board = match (self.phase, self.board.as_mut()) {
            (Phase::Active, Some(board)) => board,
            (phase, _) => {
                log::debug!("shot at {} rejected: session is {:?}", at, phase);
                return vec![ServerMessage::Invalido(at)];
            }
        };

        let outcome = resolve_shot(board, at, self.config.repeat_policy);
        log::debug!(
            "shot at {} -> {:?}, {} ship cells left\n{}",
            at,
            outcome,
            board.remaining_ship_cells(),
            board
        );
        let mut replies = vec![match outcome {
            ShotOutcome::Hit => ServerMessage::Impacto(at),
            ShotOutcome::Miss => ServerMessage::Agua(at),
            ShotOutcome::Invalid | ShotOutcome::Repeated => ServerMessage::Invalido(at),
        }];
        if outcome == ShotOutcome::Hit && board.remaining_ship_cells() == 0 {
            self.phase = Phase::GameOver;
            replies.push(ServerMessage::Hundida(FLEET_SUNK_TEXT.into()));
        }
        replies
    }
}
