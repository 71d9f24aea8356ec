//! Request/response loop for one connected client.

use crate::game::GameSession;
use crate::protocol::{Request, ServerMessage};
use crate::transport::{Transport, TransportError};

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SessionSummary {
    /// Requests that decoded successfully.
    pub requests: usize,
    /// Requests dropped as malformed.
    pub malformed: usize,
    /// Shot requests, including rejected ones.
    pub shots: usize,
    /// Games that ended with the whole fleet sunk.
    pub fleets_sunk: usize,
}

/// Greet the client, then answer requests until the peer disconnects.
///
/// Malformed requests are logged and dropped without a reply. A transport
/// fault ends the loop with `Err`; it only ever affects this session.
pub async fn run_session<T>(
    transport: &mut T,
    mut game: GameSession,
) -> Result<SessionSummary, TransportError>
where
    T: Transport + ?Sized,
{
    let mut summary = SessionSummary::default();
    transport.send(&game.greeting().encode()).await?;

    loop {
        let raw = match transport.recv().await {
            Ok(Some(raw)) => raw,
            Ok(None) => break,
            Err(e) if e.is_recoverable() => {
                log::warn!("dropping unreadable request: {}", e);
                summary.malformed += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let request = match Request::parse(&raw) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("{}", e);
                summary.malformed += 1;
                continue;
            }
        };
        summary.requests += 1;
        if matches!(request, Request::Shot(_)) {
            summary.shots += 1;
        }

        let replies = match game.handle(request) {
            Ok(replies) => replies,
            Err(e) => {
                // GameSession::new validated the config; placement can't fail.
                log::error!("cannot handle {}: {}", request, e);
                continue;
            }
        };
        for reply in &replies {
            if matches!(reply, ServerMessage::Hundida(_)) {
                summary.fleets_sunk += 1;
            }
            log::debug!("{} -> {}", request, reply);
            transport.send(&reply.encode()).await?;
        }
    }
    Ok(summary)
}
