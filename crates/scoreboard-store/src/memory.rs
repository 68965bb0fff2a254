use scoreboard_core::{Match, MatchId, MatchPatch, NewMatch};
use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::store::MatchStore;

/// Ordered in-memory list plus a monotonic id counter. State is lost on
/// restart.
#[derive(Debug)]
pub struct InMemoryStore {
    matches: Vec<Match>,
    next_id: MatchId,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
            next_id: MatchId::FIRST,
        }
    }

    fn position(&self, id: MatchId) -> Result<usize, StoreError> {
        self.matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

impl MatchStore for InMemoryStore {
    fn list(&self) -> Vec<Match> {
        self.matches.clone()
    }

    fn len(&self) -> usize {
        self.matches.len()
    }

    #[instrument(skip(self, new))]
    fn create(&mut self, new: &NewMatch) -> Result<Match, StoreError> {
        let (team1, team2) = new.validate()?;
        let id = self.next_id;
        self.next_id = id.next();

        let created = Match::kickoff(id, team1, team2);
        self.matches.push(created.clone());
        debug!(match_id = %id, "match created");
        Ok(created)
    }

    #[instrument(skip(self, patch), fields(match_id = %id))]
    fn update(&mut self, id: MatchId, patch: &MatchPatch) -> Result<Match, StoreError> {
        let idx = self.position(id)?;
        let valid = patch.validate()?;

        let target = &mut self.matches[idx];
        valid.apply(target);
        debug!(score = %target.score, "match updated");
        Ok(target.clone())
    }

    #[instrument(skip(self), fields(match_id = %id))]
    fn delete(&mut self, id: MatchId) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        let _ = self.matches.remove(idx);
        debug!("match deleted");
        Ok(())
    }
}
