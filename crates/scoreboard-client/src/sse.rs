//! Event-stream decoding for `GET /events`.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::{Buf, BytesMut};
use futures::Stream;
use scoreboard_core::Match;

use crate::error::ClientError;

/// A live stream that stays silent this long is treated as dead. The server
/// sends keep-alive comments well inside this window.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// One item from a [`SnapshotStream`].
#[derive(Debug)]
pub enum SnapshotEvent {
    /// Full replacement list of matches.
    Snapshot(Vec<Match>),
    /// The stream failed; no further items follow.
    Error(ClientError),
}

/// Join the `data:` lines of one frame. Comment-only frames yield `None`.
pub fn frame_data(frame: &str) -> Option<String> {
    let mut data: Option<String> = None;
    for line in frame.lines() {
        if line.starts_with(':') {
            continue;
        }
        if let Some(value) = line.strip_prefix("data:") {
            let value = value.strip_prefix(' ').unwrap_or(value);
            match data.as_mut() {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(value);
                }
                None => data = Some(value.to_string()),
            }
        }
    }
    data
}

/// Offset and length of the first frame terminator (`\n\n` or `\r\n\r\n`).
fn frame_end(buf: &[u8]) -> Option<(usize, usize)> {
    (0..buf.len()).find_map(|i| {
        let rest = &buf[i..];
        if rest.starts_with(b"\n\n") {
            Some((i, 2))
        } else if rest.starts_with(b"\r\n\r\n") {
            Some((i, 4))
        } else {
            None
        }
    })
}

/// Wraps the response byte stream and yields decoded snapshots, with an idle
/// timeout that resets on every received chunk.
pub struct SnapshotStream {
    inner: Pin<Box<dyn Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send>>,
    buffer: BytesMut,
    pending: VecDeque<SnapshotEvent>,
    idle_deadline: Pin<Box<tokio::time::Sleep>>,
    idle_duration: Duration,
    finished: bool,
}

impl SnapshotStream {
    pub fn new(
        byte_stream: impl Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
    ) -> Self {
        Self::with_idle_timeout(byte_stream, IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(
        byte_stream: impl Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            buffer: BytesMut::new(),
            pending: VecDeque::new(),
            idle_deadline: Box::pin(tokio::time::sleep(idle_timeout)),
            idle_duration: idle_timeout,
            finished: false,
        }
    }

    /// Decode one complete frame. Only whole frames are UTF-8 decoded, so a
    /// character split across chunks survives.
    fn decode_frame(&mut self, frame: &[u8]) {
        let text = match std::str::from_utf8(frame) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring non-UTF-8 frame");
                return;
            }
        };
        let Some(data) = frame_data(text) else {
            return;
        };
        match serde_json::from_str::<Vec<Match>>(&data) {
            Ok(matches) => self.pending.push_back(SnapshotEvent::Snapshot(matches)),
            Err(e) => tracing::debug!(error = %e, "Ignoring undecodable snapshot"),
        }
    }

    fn fail(&mut self, error: ClientError) -> Poll<Option<SnapshotEvent>> {
        self.finished = true;
        Poll::Ready(Some(SnapshotEvent::Error(error)))
    }
}

impl Stream for SnapshotStream {
    type Item = SnapshotEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(event) = self.pending.pop_front() {
            return Poll::Ready(Some(event));
        }
        if self.finished {
            return Poll::Ready(None);
        }

        loop {
            match self.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    let new_deadline = tokio::time::Instant::now() + self.idle_duration;
                    self.idle_deadline.as_mut().reset(new_deadline);

                    self.buffer.extend_from_slice(&bytes);

                    while let Some((pos, len)) = frame_end(&self.buffer) {
                        let frame = self.buffer.split_to(pos);
                        self.buffer.advance(len);
                        self.decode_frame(&frame);
                    }

                    if let Some(event) = self.pending.pop_front() {
                        return Poll::Ready(Some(event));
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    return self.fail(ClientError::StreamInterrupted(e.to_string()));
                }
                Poll::Ready(None) => {
                    let remaining = self.buffer.split();
                    if !remaining.is_empty() {
                        self.decode_frame(&remaining);
                    }
                    self.finished = true;
                    return Poll::Ready(self.pending.pop_front());
                }
                Poll::Pending => {
                    if self.idle_deadline.as_mut().poll(cx).is_ready() {
                        let secs = self.idle_duration.as_secs();
                        return self.fail(ClientError::StreamInterrupted(format!(
                            "idle timeout after {secs}s"
                        )));
                    }
                    return Poll::Pending;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    type Chunk = Result<bytes::Bytes, reqwest::Error>;

    fn from_chunks(chunks: &[&str]) -> SnapshotStream {
        let owned: Vec<Chunk> = chunks
            .iter()
            .map(|c| Ok(bytes::Bytes::from(c.to_string())))
            .collect();
        SnapshotStream::with_idle_timeout(futures::stream::iter(owned), Duration::from_secs(5))
    }

    fn snapshot(event: Option<SnapshotEvent>) -> Vec<Match> {
        match event {
            Some(SnapshotEvent::Snapshot(m)) => m,
            other => panic!("expected snapshot, got: {other:?}"),
        }
    }

    #[test]
    fn frame_data_skips_comments() {
        assert_eq!(frame_data(":ping\n\n"), None);
        assert_eq!(frame_data(": ping\ndata: []\n\n").as_deref(), Some("[]"));
        assert_eq!(frame_data("data:[]\n\n").as_deref(), Some("[]"));
        assert_eq!(frame_data("data: [\ndata: ]\n\n").as_deref(), Some("[\n]"));
        assert_eq!(frame_data("event: other\n\n"), None);
    }

    #[tokio::test]
    async fn decodes_snapshots_in_order() {
        let mut stream = from_chunks(&[
            "data: []\n\n",
            r#"data: [{"id":1,"team1":"Arsenal","team2":"Chelsea","score":"0 : 0"}]"#,
            "\n\n",
        ]);
        assert!(snapshot(stream.next().await).is_empty());
        let second = snapshot(stream.next().await);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].team1, "Arsenal");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn frames_split_across_chunks() {
        let mut stream = from_chunks(&["da", "ta: [", "]\n", "\n"]);
        assert!(snapshot(stream.next().await).is_empty());
    }

    #[tokio::test]
    async fn keep_alive_and_garbage_are_ignored() {
        let mut stream = from_chunks(&[":ping\n\n", "data: not json\n\n", "data: []\n\n"]);
        assert!(snapshot(stream.next().await).is_empty());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn crlf_frames_decode() {
        let mut stream = from_chunks(&["data: []\r\n\r\n"]);
        assert!(snapshot(stream.next().await).is_empty());
    }

    #[tokio::test]
    async fn multibyte_character_split_across_chunks() {
        let frame = r#"data: [{"id":1,"team1":"Málaga","team2":"Sevilla","score":"1 : 0"}]"#
            .to_string()
            + "\n\n";
        let bytes = frame.as_bytes();
        let split = frame.find('á').unwrap() + 1;
        let chunks: Vec<Chunk> = vec![
            Ok(bytes::Bytes::copy_from_slice(&bytes[..split])),
            Ok(bytes::Bytes::copy_from_slice(&bytes[split..])),
        ];
        let mut stream =
            SnapshotStream::with_idle_timeout(futures::stream::iter(chunks), Duration::from_secs(5));

        let matches = snapshot(stream.next().await);
        assert_eq!(matches[0].team1, "Málaga");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn crlf_terminator_split_across_chunks() {
        let mut stream = from_chunks(&["data: []\r", "\n\r", "\ndata: [", "]\r\n\r\n"]);
        assert!(snapshot(stream.next().await).is_empty());
        assert!(snapshot(stream.next().await).is_empty());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn trailing_frame_without_blank_line() {
        let mut stream = from_chunks(&["data: []"]);
        assert!(snapshot(stream.next().await).is_empty());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn idle_timeout_fires_when_no_data() {
        tokio::time::pause();

        let byte_stream = futures::stream::pending::<Chunk>();
        let mut stream = Box::pin(SnapshotStream::with_idle_timeout(
            byte_stream,
            Duration::from_secs(5),
        ));

        tokio::time::advance(Duration::from_secs(6)).await;

        let event = stream.next().await;
        assert!(
            matches!(&event, Some(SnapshotEvent::Error(ClientError::StreamInterrupted(msg))) if msg.contains("idle timeout")),
            "expected idle timeout error, got: {event:?}"
        );
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn idle_timeout_resets_on_keep_alive() {
        tokio::time::pause();

        let (tx, rx) = tokio::sync::mpsc::channel::<Chunk>(16);
        let mut stream = Box::pin(SnapshotStream::with_idle_timeout(
            tokio_stream::wrappers::ReceiverStream::new(rx),
            Duration::from_secs(5),
        ));

        tx.send(Ok(bytes::Bytes::from("data: []\n\n"))).await.unwrap();
        let _ = snapshot(stream.next().await);

        tokio::time::advance(Duration::from_secs(4)).await;
        tx.send(Ok(bytes::Bytes::from(":ping\n\n"))).await.unwrap();
        // Consumes the comment and resets the deadline without yielding.
        assert!(futures::FutureExt::now_or_never(stream.next()).is_none());
        tokio::time::advance(Duration::from_secs(4)).await;
        tx.send(Ok(bytes::Bytes::from("data: []\n\n"))).await.unwrap();
        let _ = snapshot(stream.next().await);

        drop(tx);
        let event = stream.next().await;
        assert!(event.is_none(), "expected stream end, got: {event:?}");
    }
}
