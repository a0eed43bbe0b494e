use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::types::ServerMessage;
use crate::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Channel for messages destined for this client.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let client_id = state.registry.register(tx.clone());
    info!("WebSocket client connected: {}", client_id);

    // Send the current market snapshot immediately on connect.
    let initial = ServerMessage::MarketUpdate {
        data: state.store.market_map(),
    };
    if let Ok(json) = serde_json::to_string(&initial) {
        let _ = tx.send(json);
    }

    // Forward queued messages to the socket.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    // Drain incoming frames; clients only listen, so text frames are noted
    // and dropped.
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                debug!("Ignoring message from {}: {}", client_id, text);
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket client disconnecting: {}", client_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                // Pong is handled automatically by axum.
                debug!("Received ping from {}", client_id);
            }
            Err(e) => {
                error!("WebSocket error for {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    state.registry.unregister(client_id);
    send_task.abort();
    info!("WebSocket client disconnected: {}", client_id);
}
