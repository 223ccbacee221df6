use crate::error::ProtocolError;
use crate::signaling::SignalingService;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use duet_core::{ClientMessage, ConnectionId, ServerMessage};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let conn_id = ConnectionId::new();
    info!(%conn_id, "new WebSocket connection");

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.register(conn_id, tx);
    service.send_to(conn_id, ServerMessage::Welcome { id: conn_id });

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!(%conn_id, "failed to serialize outbound message: {e}"),
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => handle_text(&service, conn_id, &text),
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Runs whichever way the socket died, so room cleanup and the peer-left
    // notice never depend on a clean close frame.
    service.disconnect(conn_id);
    info!(%conn_id, "WebSocket disconnected");
}

/// Parse and dispatch one frame. Protocol violations go back to the sender
/// only; they never disturb room state.
fn handle_text(service: &SignalingService, conn_id: ConnectionId, text: &str) {
    let result = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => service.handle_message(conn_id, msg),
        Err(e) => Err(ProtocolError::from(e)),
    };
    if let Err(e) = result {
        warn!(%conn_id, "protocol error: {e}");
        service.send_to(
            conn_id,
            ServerMessage::Error {
                message: e.to_string(),
            },
        );
    }
}
