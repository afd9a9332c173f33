use axum::extract::ws::{Message, WebSocket};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::incoming::ws_axum::protocol::{ClientMessage, WSMessage};
use crate::shared::app_state::AppState;
use domain::events::SlotChangedEvent;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] axum::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConnectionResult<T> = Result<T, ConnectionError>;

pub struct ConnectionCounterGuard {
    state: AppState,
}

impl ConnectionCounterGuard {
    pub fn new(state: AppState) -> Self {
        state.increment_websocket_connections();
        Self { state }
    }
}

impl Drop for ConnectionCounterGuard {
    fn drop(&mut self) {
        self.state.decrement_websocket_connections();
    }
}

pub struct ConnectionHandler {
    socket_sender: SplitSink<WebSocket, Message>,
    message_receiver: SplitStream<WebSocket>,
    broadcast_receiver: broadcast::Receiver<SlotChangedEvent>,
    _connection_counter_guard: ConnectionCounterGuard,
}

impl ConnectionHandler {
    pub fn new(socket: WebSocket, state: &AppState) -> Self {
        let (socket_sender, message_receiver) = socket.split();
        Self {
            socket_sender,
            message_receiver,
            broadcast_receiver: state.ws_broadcast.subscribe(),
            _connection_counter_guard: ConnectionCounterGuard::new(state.clone()),
        }
    }

    pub async fn run(mut self) {
        info!("New live WebSocket connection established");

        loop {
            tokio::select! {
                client_msg = self.message_receiver.next() => {
                    if !self.handle_client_message(client_msg).await {
                        break;
                    }
                }

                broadcast_msg = self.broadcast_receiver.recv() => {
                    if !self.handle_broadcast_message(broadcast_msg).await {
                        break;
                    }
                }
            }
        }

        info!("Live WebSocket connection closed");
    }

    async fn send_ws_message(&mut self, message: &WSMessage) -> ConnectionResult<()> {
        let json = serde_json::to_string(message)?;
        self.socket_sender.send(Message::Text(json.into())).await?;
        Ok(())
    }

    async fn handle_text_message(&mut self, text: &str) -> ConnectionResult<()> {
        debug!("Received client message: {}", text);
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(ClientMessage::Ping) => self.send_ws_message(&WSMessage::Pong).await,
            Err(e) => {
                let reply = WSMessage::error(format!("Invalid message format: {}", e));
                self.send_ws_message(&reply).await
            }
        }
    }

    async fn handle_client_message(&mut self, msg_result: Option<Result<Message, axum::Error>>) -> bool {
        let result = match msg_result {
            Some(Ok(Message::Text(text))) => self.handle_text_message(text.as_str()).await,
            Some(Ok(Message::Ping(data))) => {
                debug!("Received ping, sending pong");
                self.socket_sender
                    .send(Message::Pong(data))
                    .await
                    .map_err(ConnectionError::from)
            }
            Some(Ok(Message::Close(_))) => {
                debug!("WebSocket close frame received");
                return false;
            }
            Some(Ok(Message::Pong(_) | Message::Binary(_))) => Ok(()),
            Some(Err(e)) => {
                warn!("WebSocket error: {}", e);
                return false;
            }
            None => {
                debug!("WebSocket connection closed by client");
                return false;
            }
        };

        if let Err(e) = result {
            error!("Error handling client message: {}", e);
            return false;
        }
        true
    }

    async fn handle_broadcast_message(
        &mut self,
        msg_result: Result<SlotChangedEvent, broadcast::error::RecvError>,
    ) -> bool {
        use broadcast::error::RecvError;

        match msg_result {
            Ok(event) => {
                let ws_msg = WSMessage::slot_changed(&event);
                debug!("Sending message to WebSocket client: {:?}", ws_msg);
                if let Err(e) = self.send_ws_message(&ws_msg).await {
                    error!("Error sending broadcast message: {}", e);
                    return false;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(
                    "WebSocket connection lagged behind broadcast channel, skipped {} messages",
                    skipped
                );
            }
            Err(RecvError::Closed) => {
                info!("Broadcast channel closed, terminating WebSocket connection");
                return false;
            }
        }
        true
    }
}
