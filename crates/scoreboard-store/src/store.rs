use scoreboard_core::{Match, MatchId, MatchPatch, NewMatch};

use crate::error::StoreError;

/// Authoritative match storage.
///
/// Methods are synchronous; callers serialize access (see
/// `scoreboard_server::LiveScoreboard`).
pub trait MatchStore: Send {
    /// All matches in creation order.
    fn list(&self) -> Vec<Match>;

    /// Number of stored matches.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a match at `0 : 0` with the next id.
    fn create(&mut self, new: &NewMatch) -> Result<Match, StoreError>;

    /// Apply a patch. Nothing is written if any field fails validation.
    fn update(&mut self, id: MatchId, patch: &MatchPatch) -> Result<Match, StoreError>;

    /// Remove a match.
    fn delete(&mut self, id: MatchId) -> Result<(), StoreError>;
}
