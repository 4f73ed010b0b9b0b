use crate::render::AnsiScrub;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};
use wstail_messaging_nats::NatsWildcardSubject;
use wstail_relay::viewer::{self, ViewerSink};
use wstail_relay::{Error, LogFrame, RelayConfig, Result};

/// Frames buffered per viewer before the connection is considered too slow.
const OUTBOUND_QUEUE: usize = 256;

/// Shared state for the live-tail endpoint.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: RelayConfig,
    pub(crate) wildcard: NatsWildcardSubject,
}

pub(crate) async fn live_tail_handler(
    Path(path): Path<String>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let source = source_from_path(&path);
    ws.on_upgrade(move |socket| handle_socket(socket, state, source))
}

/// The log source is the portion of the request path after the first
/// separator: `/live/myservice` and `/myservice` both name `myservice`.
fn source_from_path(path: &str) -> String {
    let path = path.trim_start_matches('/');
    match path.split_once('/') {
        Some((_, rest)) => rest.to_string(),
        None => path.to_string(),
    }
}

async fn handle_socket(socket: WebSocket, state: AppState, source: String) {
    info!("viewer connected for {source}");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::channel::<LogFrame>(OUTBOUND_QUEUE);
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let text = match serde_json::to_string(&frame) {
                Ok(text) => text,
                Err(error) => {
                    warn!("dropping unencodable frame: {error}");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let session_source = source.clone();
    let mut session_task = tokio::spawn(async move {
        let mut sink = QueueSink(tx);
        let result = viewer::run(
            &state.wildcard,
            &session_source,
            &state.config,
            &AnsiScrub,
            &mut sink,
        )
        .await;
        if let Err(error) = result {
            warn!("session for {session_source} ended: {error}");
        }
    });

    // Drain the client side only to notice the close.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = ws_receiver.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    // Whichever side finishes first tears the session down.
    tokio::select! {
        _ = &mut session_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            session_task.abort();
        }
    }
    send_task.abort();

    info!("viewer for {source} disconnected");
}

struct QueueSink(mpsc::Sender<LogFrame>);

#[async_trait::async_trait]
impl ViewerSink for QueueSink {
    async fn send(&mut self, frame: LogFrame) -> Result<()> {
        // A viewer that stops draining fills its queue; treat overflow like
        // a gone client rather than stalling this session's bus loop.
        self.0.try_send(frame).map_err(|_| Error::SendClosed)
    }
}
