//! Client-side copy of the server's match list.

use scoreboard_core::{Match, MatchId};

/// Read-only mirror, replaced wholesale on every snapshot. Never mutated
/// locally.
#[derive(Debug, Default)]
pub struct LiveMirror {
    matches: Vec<Match>,
    live: bool,
    selected: Option<MatchId>,
}

impl LiveMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_snapshot(&mut self, matches: Vec<Match>) {
        self.matches = matches;
    }

    pub fn set_live(&mut self, live: bool) {
        self.live = live;
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn select(&mut self, id: MatchId) {
        self.selected = Some(id);
    }

    /// The selected match as it appears in the current list. `None` once it
    /// has been deleted.
    pub fn selected(&self) -> Option<&Match> {
        let id = self.selected?;
        self.matches.iter().find(|m| m.id == id)
    }

    /// Clear the selection if it points at `id`.
    pub fn forget(&mut self, id: MatchId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoreboard_core::Score;

    fn fixture(id: u64, team1: &str, team2: &str) -> Match {
        Match::kickoff(MatchId::new(id), team1.into(), team2.into())
    }

    #[test]
    fn starts_empty_and_offline() {
        let mirror = LiveMirror::new();
        assert!(mirror.matches().is_empty());
        assert!(!mirror.is_live());
        assert!(mirror.selected().is_none());
    }

    #[test]
    fn snapshot_replaces_everything() {
        let mut mirror = LiveMirror::new();
        mirror.apply_snapshot(vec![fixture(1, "A", "B"), fixture(2, "C", "D")]);
        mirror.apply_snapshot(vec![fixture(2, "C", "D")]);
        assert_eq!(mirror.matches(), &[fixture(2, "C", "D")]);
    }

    #[test]
    fn selection_follows_latest_snapshot() {
        let mut mirror = LiveMirror::new();
        mirror.apply_snapshot(vec![fixture(1, "Arsenal", "Chelsea")]);
        mirror.select(MatchId::FIRST);

        let mut scored = fixture(1, "Arsenal", "Chelsea");
        scored.score = Score::new(3, 1);
        mirror.apply_snapshot(vec![scored.clone()]);
        assert_eq!(mirror.selected(), Some(&scored));

        mirror.apply_snapshot(Vec::new());
        assert!(mirror.selected().is_none());
    }

    #[test]
    fn forget_only_clears_matching_selection() {
        let mut mirror = LiveMirror::new();
        mirror.apply_snapshot(vec![fixture(1, "A", "B"), fixture(2, "C", "D")]);
        mirror.select(MatchId::new(2));

        mirror.forget(MatchId::FIRST);
        assert_eq!(mirror.selected().map(|m| m.id), Some(MatchId::new(2)));

        mirror.forget(MatchId::new(2));
        assert!(mirror.selected().is_none());
    }
}
