#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bitboard;
mod board;
mod common;
mod config;
mod fleet;
mod game;
pub mod protocol;
mod shot;

#[cfg(feature = "std")]
pub mod client;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod server;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;

pub use bitboard::{BitBoard, BitBoardError};
pub use board::{Board, Cell};
pub use common::{BoardError, Coord, ShotOutcome};
pub use config::*;
pub use fleet::place_fleet;
pub use game::{GameSession, Phase};
pub use protocol::{ProtocolError, Request, ServerMessage};
pub use shot::{resolve_shot, RepeatShotPolicy};

#[cfg(feature = "std")]
pub use client::{SessionClient, ShotReport, SweepSummary};
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use server::Server;
#[cfg(feature = "std")]
pub use session::{run_session, SessionSummary};
#[cfg(feature = "std")]
pub use transport::{
    FramedTransport, Framing, InMemoryTransport, TcpTransport, Transport, TransportError,
};
