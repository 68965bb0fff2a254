//! Keep a [`LiveMirror`] in sync with the server until cancelled.

use futures::StreamExt;

use crate::client::ScoreboardClient;
use crate::mirror::LiveMirror;
use crate::sse::SnapshotEvent;

/// Fetch the list, then follow the event stream, reopening it after
/// `reconnect_delay` whenever it fails or ends. `on_change` runs after every
/// change to the mirror. Never returns; cancel by dropping the future.
pub async fn watch<F>(client: &ScoreboardClient, mirror: &mut LiveMirror, mut on_change: F)
where
    F: FnMut(&LiveMirror),
{
    match client.list().await {
        Ok(matches) => mirror.apply_snapshot(matches),
        Err(e) => tracing::debug!(error = %e, "Initial list failed"),
    }
    on_change(mirror);

    let delay = client.config().reconnect_delay;
    loop {
        match client.subscribe().await {
            Ok(mut stream) => {
                tracing::info!(server = client.base_url(), "Event stream open");
                mirror.set_live(true);
                on_change(mirror);

                while let Some(event) = stream.next().await {
                    match event {
                        SnapshotEvent::Snapshot(matches) => {
                            mirror.apply_snapshot(matches);
                            on_change(mirror);
                        }
                        SnapshotEvent::Error(e) => {
                            tracing::warn!(error = %e, "Event stream failed");
                            break;
                        }
                    }
                }
            }
            Err(e) => tracing::debug!(error = %e, "Event stream unavailable"),
        }

        if mirror.is_live() {
            mirror.set_live(false);
            on_change(mirror);
        }
        tokio::time::sleep(delay).await;
    }
}
