//! Per-socket connection handling.
//!
//! A `Connection` wraps one TCP socket as two independent directions: a
//! reader task that decodes inbound frames and a writer task that drains
//! an outbound queue, one frame per item, FIFO. Heartbeat replies are
//! absorbed by the reader itself (they flip a shared flag the owning
//! match controller polls and clears each cycle), so the protocol loop
//! only ever sees game-relevant messages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::net::codec;
use crate::net::messages::{ClientMessage, ServerMessage};

/// Handle to one client socket. Owned by the match controller (or, before
/// routing, by the accept handler).
///
/// Dropping the handle stops the reader immediately; the writer keeps
/// running until it has drained every queued message, then shuts the
/// socket down. Messages sent just before a drop are therefore still
/// delivered.
#[derive(Debug)]
pub struct Connection {
    outbound: mpsc::UnboundedSender<ServerMessage>,
    heartbeat: Arc<AtomicBool>,
    reader: JoinHandle<()>,
}

impl Connection {
    /// Split the socket into reader and writer tasks. Returns the handle
    /// and the inbound message stream; the stream ends when the peer
    /// disconnects or sends an undecodable frame.
    pub fn spawn(stream: TcpStream) -> (Self, mpsc::UnboundedReceiver<ClientMessage>) {
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let (mut read_half, mut write_half) = stream.into_split();

        let heartbeat = Arc::new(AtomicBool::new(false));
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerMessage>();

        let flag = heartbeat.clone();
        let reader_peer = peer.clone();
        let reader = tokio::spawn(async move {
            loop {
                match codec::read_message::<_, ClientMessage>(&mut read_half).await {
                    Ok(ClientMessage::HeartbeatReply { .. }) => {
                        flag.store(true, Ordering::SeqCst);
                    }
                    Ok(msg) => {
                        if inbound_tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!(peer = %reader_peer, "inbound stream ended: {e}");
                        break;
                    }
                }
            }
        });

        // Detached on purpose: the writer outlives the handle just long
        // enough to drain the queue once the sender is dropped.
        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                if let Err(e) = codec::write_message(&mut write_half, &msg).await {
                    debug!(peer = %peer, "outbound write failed: {e}");
                    break;
                }
            }
            // Queue drained or broken: shut the socket down.
            let _ = tokio::io::AsyncWriteExt::shutdown(&mut write_half).await;
        });

        (
            Connection {
                outbound: outbound_tx,
                heartbeat,
                reader,
            },
            inbound_rx,
        )
    }

    /// Enqueue a message for delivery. Delivery order per seat is the
    /// enqueue order. A dead writer makes this a no-op; the failure shows
    /// up through the disconnect path instead.
    pub fn send(&self, msg: ServerMessage) {
        let _ = self.outbound.send(msg);
    }

    /// Poll-and-clear the heartbeat flag: true if a heartbeat reply was
    /// received since the previous call.
    pub fn take_heartbeat(&self) -> bool {
        self.heartbeat.swap(false, Ordering::SeqCst)
    }

    /// Stop reading from the peer. Safe to call more than once. Queued
    /// outbound messages are still flushed; the socket closes once the
    /// handle itself is dropped.
    pub fn close(&self) {
        self.reader.abort();
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
