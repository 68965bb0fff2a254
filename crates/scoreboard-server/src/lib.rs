pub mod auth;
pub mod broadcast;
pub mod error;
pub mod handlers;
pub mod scoreboard;
pub mod server;
pub mod sse;

pub use broadcast::{Broadcaster, Subscription};
pub use error::ApiError;
pub use scoreboard::LiveScoreboard;
pub use server::{build_router, start, start_with_scoreboard, AppState, ServerConfig, ServerHandle};
