//! `GET /events`: one long-lived `text/event-stream` per subscriber.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};

use crate::broadcast::Subscription;
use crate::server::AppState;

/// Comment text of the periodic keep-alive (`: ping`).
pub const KEEP_ALIVE_TEXT: &str = "ping";

/// Open a subscription. The first event is the current snapshot; the stream
/// ends, and the subscriber is dropped, when the client disconnects.
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.scoreboard.subscribe();
    snapshot_events(subscription, state.keep_alive)
}

/// Wrap a subscription as an SSE body with keep-alive comments.
pub fn snapshot_events(
    subscription: Subscription,
    keep_alive: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = subscription.map(|payload| Ok(Event::default().data(payload)));
    Sse::new(stream).keep_alive(KeepAlive::new().interval(keep_alive).text(KEEP_ALIVE_TEXT))
}
