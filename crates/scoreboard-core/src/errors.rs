use crate::score::ScoreError;

/// Rejected input for a create or update. Always a client error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("team1 and team2 are required")]
    MissingTeams,
    #[error("{0} must not be empty")]
    BlankTeam(&'static str),
    #[error(transparent)]
    Score(#[from] ScoreError),
}
