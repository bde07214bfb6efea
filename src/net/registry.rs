//! Match registry: thread-safe map from match ID to its pending seat.
//!
//! A match is joinable between creation and the second player's arrival.
//! The registry hands the joiner's connection to the match controller
//! through a capacity-one channel; the controller evicts its own entry
//! exactly once when the match ends.

use std::collections::HashMap;
use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use crate::net::connection::Connection;
use crate::net::messages::ClientMessage;

/// A routed connection waiting to be seated: the socket handle plus its
/// inbound message stream.
#[derive(Debug)]
pub struct PendingSeat {
    pub conn: Connection,
    pub inbound: mpsc::UnboundedReceiver<ClientMessage>,
}

/// The joiner's entry point into a pending match. `None` once the second
/// seat is taken.
type JoinSlot = Option<mpsc::Sender<PendingSeat>>;

/// Registry of live matches.
#[derive(Debug)]
pub struct Registry {
    matches: RwLock<HashMap<String, JoinSlot>>,
    id_len: usize,
}

impl Registry {
    pub fn new(id_len: usize) -> Arc<Self> {
        Arc::new(Registry {
            matches: RwLock::new(HashMap::new()),
            id_len,
        })
    }

    /// Create a match under a fresh random ID, returning the ID and the
    /// receiver on which the controller awaits the second seat.
    ///
    /// Generation and insertion happen under one write lock, so two
    /// concurrent creates can never claim the same ID.
    pub async fn create(&self) -> (String, mpsc::Receiver<PendingSeat>) {
        let (seat_tx, seat_rx) = mpsc::channel(1);
        let mut matches = self.matches.write().await;
        let id = loop {
            let candidate = random_id(self.id_len);
            if !matches.contains_key(&candidate) {
                break candidate;
            }
            debug!(match_id = %candidate, "match ID collision, regenerating");
        };
        matches.insert(id.clone(), Some(seat_tx));
        debug!(match_id = %id, total = matches.len(), "match registered");
        (id, seat_rx)
    }

    /// Claim the second seat of a pending match. `None` when the ID is
    /// unknown or the match is already full.
    pub async fn join(&self, id: &str) -> Option<mpsc::Sender<PendingSeat>> {
        let mut matches = self.matches.write().await;
        matches.get_mut(id)?.take()
    }

    /// Evict a match. Called once, by the owning controller, at match end.
    pub async fn remove(&self, id: &str) {
        let mut matches = self.matches.write().await;
        if matches.remove(id).is_some() {
            debug!(match_id = %id, total = matches.len(), "match evicted");
        }
    }

    /// Number of registered matches.
    pub async fn len(&self) -> usize {
        self.matches.read().await.len()
    }

    /// Whether a match ID is currently registered.
    pub async fn contains(&self, id: &str) -> bool {
        self.matches.read().await.contains_key(id)
    }
}

/// Short random alphanumeric identifier.
fn random_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
