// Minecraft command stream handler (SSE)
use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::Json;
use conoha_common::{MinecraftRequest, MinecraftResponse, EVENT_ERROR, EVENT_RESULT};
use futures_util::{Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

use crate::app::AppState;
use crate::dispatcher::{DispatchError, Dispatcher};
use crate::stream::{one_shot, StreamItem};

/// POST /minecraft - run one chat command and stream its single result
#[utoipa::path(
    post,
    path = "/minecraft",
    tag = "minecraft",
    request_body = MinecraftRequest,
    responses(
        (status = 200, description = "SSE stream closing after one `result` event (MinecraftResponse) or one `error` event (StreamError)", content_type = "text/event-stream", body = MinecraftResponse)
    )
)]
pub async fn minecraft(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MinecraftRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = start_stream(state.dispatcher.clone(), req.command);
    Sse::new(rx.map(to_event))
}

/// Run the dispatch in its own task and hand back the consumer end.
///
/// If the consumer goes away first, the in-flight provider call is dropped.
pub fn start_stream(dispatcher: Arc<Dispatcher>, command: String) -> ReceiverStream<StreamItem> {
    let (tx, rx) = one_shot();
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("minecraft", %request_id);

    tokio::spawn(
        async move {
            let outcome = tokio::select! {
                outcome = dispatcher.dispatch(&command) => Some(outcome),
                _ = tx.closed() => None,
            };

            let Some(outcome) = outcome else {
                tracing::warn!("caller disconnected, provider call abandoned");
                return;
            };

            let item = outcome.map_err(|e| {
                log_failure(&e);
                e.to_stream_error()
            });
            if !tx.send(item) {
                tracing::debug!("caller disconnected before the result was delivered");
            }
        }
        .instrument(span),
    );

    rx
}

fn log_failure(err: &DispatchError) {
    match err {
        DispatchError::UnrecognizedCommand(command) => {
            tracing::info!(command = %command, "unrecognized command")
        }
        other => tracing::error!(code = other.code().as_str(), "{}", other),
    }
}

fn to_event(item: StreamItem) -> Result<Event, Infallible> {
    let event = match item {
        Ok(resp) => Event::default().event(EVENT_RESULT).json_data(&resp),
        Err(err) => Event::default().event(EVENT_ERROR).json_data(&err),
    };
    Ok(event.unwrap_or_else(|e| {
        tracing::error!("failed to encode stream event: {}", e);
        Event::default()
            .event(EVENT_ERROR)
            .data(r#"{"code":"internal","message":"failed to encode result"}"#)
    }))
}
