//! Text protocol spoken between a session and its client.
//!
//! Client requests are bare tokens: `row,col`, `RESET` or `ADD_SHIPS`.
//! Server messages are `TYPE:PAYLOAD`, where the payload is either a
//! coordinate pair or free text. Framing is the transport's concern.

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

use crate::common::Coord;

/// Greeting sent when a session starts.
pub const GREETING_TEXT: &str = "Bienvenido. Envia ADD_SHIPS para colocar la flota.";
/// Acknowledgement of a `RESET` request.
pub const RESET_TEXT: &str = "Barcos reubicados. ¡Que comience el juego!";
/// Acknowledgement of an `ADD_SHIPS` request.
pub const ADD_SHIPS_TEXT: &str = "Barcos colocados. ¡Que comience el juego!";
/// Sent after the shot that sinks the last ship cell.
pub const FLEET_SUNK_TEXT: &str = "Toda la flota ha sido hundida. ¡Enhorabuena!";

/// Errors produced while decoding either direction of the protocol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Request is neither a coordinate pair nor a control token.
    #[error("malformed request: {0:?}")]
    MalformedRequest(String),
    /// Server message without a `TYPE:` prefix.
    #[error("message has no type delimiter: {0:?}")]
    MissingDelimiter(String),
    #[error("unknown message type: {0:?}")]
    UnknownType(String),
    /// Coordinate payload that is not `row,col`.
    #[error("malformed coordinates: {0:?}")]
    MalformedCoordinates(String),
}

/// Parse `row,col` (whitespace around either number is allowed).
fn parse_coord(s: &str) -> Option<Coord> {
    let (row, col) = s.split_once(',')?;
    let row = row.trim().parse().ok()?;
    let col = col.trim().parse().ok()?;
    Some(Coord::new(row, col))
}

/// A request sent by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Fire at a cell.
    Shot(Coord),
    /// Re-place the fleet and restart.
    Reset,
    /// Same effect as `Reset`; sent by clients on start-up.
    AddShips,
}

impl Request {
    pub const RESET_TOKEN: &'static str = "RESET";
    pub const ADD_SHIPS_TOKEN: &'static str = "ADD_SHIPS";

    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        match raw.trim() {
            Self::RESET_TOKEN => Ok(Request::Reset),
            Self::ADD_SHIPS_TOKEN => Ok(Request::AddShips),
            other => parse_coord(other)
                .map(Request::Shot)
                .ok_or_else(|| ProtocolError::MalformedRequest(raw.to_owned())),
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Shot(at) => write!(f, "{}", at),
            Request::Reset => f.write_str(Self::RESET_TOKEN),
            Request::AddShips => f.write_str(Self::ADD_SHIPS_TOKEN),
        }
    }
}

/// A message sent by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Session start acknowledgement.
    Inicio(String),
    /// Shot hit a ship.
    Impacto(Coord),
    /// Shot hit water.
    Agua(Coord),
    /// Shot was rejected.
    Invalido(Coord),
    /// Every ship cell is hit; the game is over.
    Hundida(String),
    /// Fleet (re)placed; a new game is running.
    Reset(String),
}

impl ServerMessage {
    /// Wire tag of the message type.
    pub fn tag(&self) -> &'static str {
        match self {
            ServerMessage::Inicio(_) => "INICIO",
            ServerMessage::Impacto(_) => "IMPACTO",
            ServerMessage::Agua(_) => "AGUA",
            ServerMessage::Invalido(_) => "INVALIDO",
            ServerMessage::Hundida(_) => "HUNDIDA",
            ServerMessage::Reset(_) => "RESET",
        }
    }

    pub fn encode(&self) -> String {
        match self {
            ServerMessage::Inicio(text)
            | ServerMessage::Hundida(text)
            | ServerMessage::Reset(text) => format!("{}:{}", self.tag(), text),
            ServerMessage::Impacto(at) | ServerMessage::Agua(at) | ServerMessage::Invalido(at) => {
                format!("{}:{}", self.tag(), at)
            }
        }
    }

    /// Decode one `TYPE:PAYLOAD` message. The payload is everything after
    /// the first `:`.
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        let (tag, payload) = raw
            .split_once(':')
            .ok_or_else(|| ProtocolError::MissingDelimiter(raw.to_owned()))?;
        let coord = || {
            parse_coord(payload).ok_or_else(|| ProtocolError::MalformedCoordinates(payload.to_owned()))
        };
        match tag {
            "INICIO" => Ok(ServerMessage::Inicio(payload.to_owned())),
            "IMPACTO" => coord().map(ServerMessage::Impacto),
            "AGUA" => coord().map(ServerMessage::Agua),
            "INVALIDO" => coord().map(ServerMessage::Invalido),
            "HUNDIDA" => Ok(ServerMessage::Hundida(payload.to_owned())),
            "RESET" => Ok(ServerMessage::Reset(payload.to_owned())),
            other => Err(ProtocolError::UnknownType(other.to_owned())),
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
