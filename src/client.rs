//! Client side of the protocol, without any presentation.

use anyhow::{anyhow, bail};
use tokio::net::ToSocketAddrs;

use crate::common::Coord;
use crate::protocol::{Request, ServerMessage};
use crate::transport::{Framing, TcpTransport, Transport};

/// Outcome of one shot as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotReport {
    /// `IMPACTO`, `AGUA` or `INVALIDO`.
    pub reply: ServerMessage,
    /// The server followed up with `HUNDIDA`.
    pub fleet_sunk: bool,
}

/// Totals of a row-by-row sweep of the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SweepSummary {
    pub shots: usize,
    pub hits: usize,
    pub misses: usize,
    pub invalid: usize,
    pub fleet_sunk: bool,
}

/// Drives one session from the client end.
///
/// `HUNDIDA` arrives unprompted after the final hit, so it is picked up from
/// the stream in front of whatever reply comes next. The configured fleet
/// size is only an estimate: once it says the fleet should be gone, each
/// further hit is followed by an out-of-range shot, whose `INVALIDO` reply
/// flushes out a pending `HUNDIDA` without ever waiting on it.
pub struct SessionClient<T: Transport> {
    transport: T,
    ship_count: usize,
    remaining: usize,
    fleet_sunk: bool,
}

/// Always off the board, so the server answers `INVALIDO` in every phase.
const SYNC_SHOT: Coord = Coord { row: -1, col: -1 };

impl SessionClient<TcpTransport> {
    pub async fn connect<A: ToSocketAddrs>(
        addr: A,
        framing: Framing,
        ship_count: usize,
    ) -> anyhow::Result<Self> {
        let transport = TcpTransport::connect(addr, framing).await?;
        Ok(Self::new(transport, ship_count))
    }
}

impl<T: Transport> SessionClient<T> {
    pub fn new(transport: T, ship_count: usize) -> Self {
        Self {
            transport,
            ship_count,
            remaining: ship_count,
            fleet_sunk: false,
        }
    }

    /// Ship cells the client believes are still afloat.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// The server has announced `HUNDIDA` for the current fleet.
    pub fn fleet_sunk(&self) -> bool {
        self.fleet_sunk
    }

    /// Next decodable server message. Undecodable ones are logged and skipped.
    pub async fn recv_message(&mut self) -> anyhow::Result<ServerMessage> {
        loop {
            let raw = self
                .transport
                .recv()
                .await?
                .ok_or_else(|| anyhow!("server closed the connection"))?;
            match ServerMessage::decode(&raw) {
                Ok(msg) => return Ok(msg),
                Err(e) => log::warn!("ignoring server message: {}", e),
            }
        }
    }

    /// Next reply to a request, recording any `HUNDIDA` queued in front of it.
    async fn recv_reply(&mut self) -> anyhow::Result<ServerMessage> {
        loop {
            match self.recv_message().await? {
                ServerMessage::Hundida(text) => {
                    log::debug!("fleet sunk: {}", text);
                    self.fleet_sunk = true;
                    self.remaining = 0;
                }
                reply => return Ok(reply),
            }
        }
    }

    /// Read the `INICIO` greeting and return its text.
    pub async fn expect_greeting(&mut self) -> anyhow::Result<String> {
        match self.recv_message().await? {
            ServerMessage::Inicio(text) => Ok(text),
            other => bail!("expected INICIO, got {}", other),
        }
    }

    /// Ask the server to place a fleet (`ADD_SHIPS`).
    pub async fn place_ships(&mut self) -> anyhow::Result<String> {
        self.restart(Request::AddShips).await
    }

    /// Ask the server to re-place the fleet and start over (`RESET`).
    pub async fn reset(&mut self) -> anyhow::Result<String> {
        self.restart(Request::Reset).await
    }

    async fn restart(&mut self, request: Request) -> anyhow::Result<String> {
        self.transport.send(&request.encode()).await?;
        match self.recv_reply().await? {
            ServerMessage::Reset(text) => {
                self.remaining = self.ship_count;
                self.fleet_sunk = false;
                Ok(text)
            }
            other => bail!("expected RESET after {}, got {}", request, other),
        }
    }

    async fn exchange_shot(&mut self, at: Coord) -> anyhow::Result<ServerMessage> {
        self.transport.send(&Request::Shot(at).encode()).await?;
        let reply = self.recv_reply().await?;
        let answers_shot = matches!(
            &reply,
            ServerMessage::Impacto(c) | ServerMessage::Agua(c) | ServerMessage::Invalido(c)
                if *c == at
        );
        if !answers_shot {
            bail!("unexpected reply to shot at {}: {}", at, reply);
        }
        Ok(reply)
    }

    /// Make sure a `HUNDIDA` the server may have sent has been read.
    pub async fn sync(&mut self) -> anyhow::Result<()> {
        self.exchange_shot(SYNC_SHOT).await?;
        Ok(())
    }

    /// Fire at one cell. `fleet_sunk` in the report reflects every message
    /// received up to and including the reply.
    pub async fn shoot(&mut self, row: i32, col: i32) -> anyhow::Result<ShotReport> {
        let reply = self.exchange_shot(Coord::new(row, col)).await?;
        if matches!(reply, ServerMessage::Impacto(_)) && !self.fleet_sunk {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.sync().await?;
            }
        }
        Ok(ShotReport {
            reply,
            fleet_sunk: self.fleet_sunk,
        })
    }

    /// Shoot every cell row by row until the fleet is sunk or the board ends.
    pub async fn sweep(&mut self, board_size: usize) -> anyhow::Result<SweepSummary> {
        self.sweep_with(board_size, |_| {}).await
    }

    /// Like [`sweep`](Self::sweep), handing each report to `on_shot` as it
    /// arrives.
    pub async fn sweep_with<F>(
        &mut self,
        board_size: usize,
        mut on_shot: F,
    ) -> anyhow::Result<SweepSummary>
    where
        F: FnMut(&ShotReport),
    {
        let mut summary = SweepSummary::default();
        let size = i32::try_from(board_size)?;
        'board: for row in 0..size {
            for col in 0..size {
                let report = self.shoot(row, col).await?;
                on_shot(&report);
                summary.shots += 1;
                match report.reply {
                    ServerMessage::Impacto(_) => summary.hits += 1,
                    ServerMessage::Agua(_) => summary.misses += 1,
                    _ => summary.invalid += 1,
                }
                if report.fleet_sunk {
                    break 'board;
                }
            }
        }
        if !self.fleet_sunk {
            self.sync().await?;
        }
        summary.fleet_sunk = self.fleet_sunk;
        Ok(summary)
    }
}
