use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Tracks connected WebSocket clients.
///
/// Every client receives the full market-update stream; there is no
/// per-symbol subscription filtering.
pub struct ClientRegistry {
    clients: DashMap<Uuid, mpsc::UnboundedSender<String>>,
}

impl ClientRegistry {
    /// Create a new registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            clients: DashMap::new(),
        })
    }

    /// Register a new client.
    pub fn register(&self, tx: mpsc::UnboundedSender<String>) -> Uuid {
        let client_id = Uuid::new_v4();
        self.clients.insert(client_id, tx);
        client_id
    }

    /// Unregister a client.
    pub fn unregister(&self, client_id: Uuid) {
        self.clients.remove(&client_id);
    }

    /// Broadcast a message to every connected client.
    ///
    /// Send failures mean the client task is shutting down; its entry is
    /// removed on disconnect, so failures are ignored here.
    pub fn broadcast_all(&self, message: &str) {
        for client in self.clients.iter() {
            let _ = client.value().send(message.to_string());
        }
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self {
            clients: DashMap::new(),
        }
    }
}
