pub mod client;
pub mod error;
pub mod mirror;
pub mod sse;
pub mod view;
pub mod watch;

pub use client::{ClientConfig, ScoreboardClient};
pub use error::ClientError;
pub use mirror::LiveMirror;
pub use sse::{SnapshotEvent, SnapshotStream};
pub use watch::watch;
