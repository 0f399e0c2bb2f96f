//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::{MatchCommand, Outbound, PlayerId};
use crate::util::rate_limit::PlayerRateLimiter;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// WebSocket upgrade handler. Every connection becomes a new player.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let player_id = Uuid::new_v4();
    info!(user_id = %player_id, "New WebSocket connection");

    let (ws_sink, ws_stream) = socket.split();

    // Subscribe before joining so the welcome unicast is not missed
    let outbound_rx = state.match_handle.subscribe();
    let input_tx = state.match_handle.input_tx.clone();

    if input_tx
        .send(MatchCommand::Join { player_id })
        .await
        .is_err()
    {
        error!(user_id = %player_id, "Match is not running");
        return;
    }

    run_session(
        player_id,
        ws_sink,
        ws_stream,
        input_tx,
        outbound_rx,
        PlayerRateLimiter::new(state.config.input_rate_limit),
    )
    .await;

    info!(user_id = %player_id, "WebSocket connection closed");
}

/// Run the WebSocket session with read/write split
async fn run_session(
    player_id: PlayerId,
    mut ws_sink: futures::stream::SplitSink<WebSocket, Message>,
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
    input_tx: mpsc::Sender<MatchCommand>,
    mut outbound_rx: broadcast::Receiver<Outbound>,
    rate_limiter: PlayerRateLimiter,
) {
    // Spawn writer task: match output -> WebSocket
    let mut writer_handle = tokio::spawn(async move {
        loop {
            match outbound_rx.recv().await {
                Ok(out) => {
                    let Some(msg) = out.for_player(player_id) else {
                        continue;
                    };
                    if let Err(e) = send_msg(&mut ws_sink, msg).await {
                        debug!(user_id = %player_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Every update is a full snapshot, the next one catches up
                    warn!(user_id = %player_id, lagged_count = n, "Client lagged, skipping updates");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(user_id = %player_id, "Outbound channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> match
    loop {
        let result = tokio::select! {
            next = ws_stream.next() => match next {
                Some(result) => result,
                None => break,
            },
            // Writer gone means the socket is dead
            _ = &mut writer_handle => break,
        };

        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_input() {
                    warn!(user_id = %player_id, "Rate limited input message");
                    continue;
                }

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(client_msg) => {
                        if input_tx.send(into_command(player_id, client_msg)).await.is_err() {
                            debug!(user_id = %player_id, "Input channel closed");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(user_id = %player_id, error = %e, "Failed to parse client message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(user_id = %player_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(user_id = %player_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(user_id = %player_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Signal disconnect to the match
    let _ = input_tx.send(MatchCommand::Leave { player_id }).await;

    writer_handle.abort();
}

fn into_command(player_id: PlayerId, msg: ClientMsg) -> MatchCommand {
    match msg {
        ClientMsg::Move { dx, dy } => MatchCommand::Move { player_id, dx, dy },
        ClientMsg::Shoot { dx, dy } => MatchCommand::Shoot { player_id, dx, dy },
    }
}

/// Send a message over WebSocket
async fn send_msg(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
