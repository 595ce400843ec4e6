//! Per-connection session: an outbound line queue plus the iterative
//! read-dispatch loop.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Notify;

use crate::command::Command;
use crate::engine::GameServer;

/// Cloneable handle to a session's outbound side.
///
/// Lines queue on an unbounded channel and are written by the session's
/// writer task, so a slow or dead peer never blocks the sender.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    outbound: UnboundedSender<String>,
    shutdown: Arc<Notify>,
}

impl SessionHandle {
    /// Create a handle together with the receiving end of its outbound queue.
    pub fn channel() -> (Self, UnboundedReceiver<String>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let handle = SessionHandle {
            outbound,
            shutdown: Arc::new(Notify::new()),
        };
        (handle, rx)
    }

    /// Queue one line for delivery. Returns `false` if the session is gone.
    pub fn send(&self, line: impl Into<String>) -> bool {
        self.outbound.send(line.into()).is_ok()
    }

    /// Ask the owning session to close. Lines already queued are still
    /// delivered before the socket goes down.
    pub fn close(&self) {
        self.shutdown.notify_one();
    }

    /// Resolves once [`close`](Self::close) has been called.
    pub async fn closed(&self) {
        self.shutdown.notified().await;
    }
}

/// Run one connection's session to completion.
///
/// Reads newline-terminated lines and dispatches each parsed command
/// synchronously before the next read. Malformed or unknown lines are
/// ignored. The loop ends on end-of-stream, a read error, or a forced
/// close (logout or victory), after which the connection's slot is
/// released.
pub async fn run_session(stream: TcpStream, peer: SocketAddr, server: Arc<GameServer>) {
    let addr = peer.to_string();
    let (read_half, write_half) = stream.into_split();
    let (handle, outbound) = SessionHandle::channel();
    tokio::spawn(drain_outbound(write_half, outbound));

    let mut lines = BufReader::new(read_half).lines();
    loop {
        tokio::select! {
            read = lines.next_line() => match read {
                Ok(Some(line)) => {
                    if let Some(command) = Command::parse(&line) {
                        server.dispatch(&addr, &handle, command);
                    }
                }
                Ok(None) | Err(_) => break,
            },
            _ = handle.closed() => break,
        }
    }

    server.disconnect(&addr);
    log::info!("client {} left", addr);
}

/// Writer task: drains the outbound queue onto the socket, one line per
/// message. Exits when every sender is dropped or the peer stops reading.
async fn drain_outbound(mut writer: OwnedWriteHalf, mut outbound: UnboundedReceiver<String>) {
    while let Some(mut line) = outbound.recv().await {
        line.push('\n');
        if writer.write_all(line.as_bytes()).await.is_err() {
            break;
        }
    }
}
