//! TCP accept loop: one session task per connection.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::engine::GameServer;
use crate::session::run_session;

/// Bind `addr` and serve a fresh game until the listener fails.
pub async fn run(addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, Arc::new(GameServer::new())).await
}

/// Accept connections on an already-bound listener and spawn a session for
/// each. Session errors never reach the listener; only an accept failure
/// ends the loop.
pub async fn serve(listener: TcpListener, server: Arc<GameServer>) -> anyhow::Result<()> {
    log::info!("battleship server listening on {}", listener.local_addr()?);
    loop {
        let (stream, peer) = listener.accept().await?;
        log::info!("client {} connected", peer);
        let server = Arc::clone(&server);
        tokio::spawn(run_session(stream, peer, server));
    }
}
