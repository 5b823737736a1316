use crate::room::RelayState;
use crate::signaling::frame_log::FrameClass;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tandem_core::RoomId;
use tracing::info;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    State(state): State<RelayState>,
) -> impl IntoResponse {
    let room = RoomId::from(room_id);

    ws.on_upgrade(move |socket| handle_socket(socket, room, state))
}

async fn handle_socket(socket: WebSocket, room: RoomId, state: RelayState) {
    let (mut sender, mut receiver) = socket.split();
    let (conn_id, mut rx) = state.join(&room);

    info!(
        "Client {} connected to room {}. Total clients: {}",
        conn_id,
        room,
        state.room_size(&room)
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let state = state.clone();
        let room = room.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        let class = FrameClass::of(text.as_str());
                        class.log(&room);
                        if class.should_forward() {
                            state.broadcast(&room, conn_id, text.as_str());
                        }
                    }
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

    state.leave(&room, conn_id);
    info!("Client {} disconnected from room {}", conn_id, room);
}
