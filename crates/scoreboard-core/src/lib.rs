pub mod errors;
pub mod ids;
pub mod matches;
pub mod score;
pub mod security;

pub use errors::ValidationError;
pub use ids::{InvalidMatchId, MatchId, SubscriberId};
pub use matches::{Match, MatchPatch, NewMatch, ValidatedPatch};
pub use score::{Score, ScoreError};
pub use security::{AdminToken, Role, ADMIN_TOKEN_HEADER};
