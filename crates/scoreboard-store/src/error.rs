use scoreboard_core::{MatchId, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Match not found")]
    NotFound(MatchId),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
