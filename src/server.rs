//! Connection listener: one accept loop, one task per connection.

use std::net::SocketAddr;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::game::GameSession;
use crate::session::run_session;
use crate::transport::{Framing, TcpTransport};

pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    /// Validate `config` and bind the listening socket.
    pub async fn bind(config: ServerConfig) -> anyhow::Result<Self> {
        config
            .game
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid game configuration: {}", e))?;
        let listener = TcpListener::bind(config.listen_addr()).await?;
        Ok(Self { listener, config })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever, starting an independent session for each.
    pub async fn run(self) -> anyhow::Result<()> {
        log::info!(
            "listening on {} ({}x{} board, {} ships, {:?} framing)",
            self.local_addr()?,
            self.config.game.board_size,
            self.config.game.board_size,
            self.config.game.ship_count,
            self.config.framing
        );
        let mut connection: u64 = 0;
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    log::warn!("accept failed: {}", e);
                    continue;
                }
            };
            log::info!("player connected from {}", peer);
            let rng = self.session_rng(connection);
            connection = connection.wrapping_add(1);
            match GameSession::new(self.config.game, rng) {
                Ok(game) => {
                    tokio::spawn(serve_connection(stream, peer, game, self.config.framing));
                }
                Err(e) => log::error!("cannot start session for {}: {}", peer, e),
            }
        }
    }

    fn session_rng(&self, connection: u64) -> SmallRng {
        match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(connection)),
            None => SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

async fn serve_connection(stream: TcpStream, peer: SocketAddr, game: GameSession, framing: Framing) {
    if let Err(e) = stream.set_nodelay(true) {
        log::debug!("set_nodelay failed for {}: {}", peer, e);
    }
    let mut transport = TcpTransport::new(stream, framing);
    match run_session(&mut transport, game).await {
        Ok(summary) => log::info!("player {} disconnected: {:?}", peer, summary),
        Err(e) => log::warn!("session with {} ended: {}", peer, e),
    }
}
