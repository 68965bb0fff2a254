use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::ids::MatchId;
use crate::score::Score;

/// A tracked fixture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub team1: String,
    pub team2: String,
    pub score: Score,
}

impl Match {
    /// A freshly created match at `0 : 0`.
    pub fn kickoff(id: MatchId, team1: String, team2: String) -> Self {
        Self {
            id,
            team1,
            team2,
            score: Score::KICKOFF,
        }
    }
}

/// Body of a create request. Both fields are required but optional on the
/// wire so a missing one is reported as a validation error, not a decode error.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team2: Option<String>,
}

impl NewMatch {
    pub fn new(team1: impl Into<String>, team2: impl Into<String>) -> Self {
        Self {
            team1: Some(team1.into()),
            team2: Some(team2.into()),
        }
    }

    /// Trimmed `(team1, team2)`, or an error if either is missing or blank.
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let team1 = non_blank(self.team1.as_deref()).ok_or(ValidationError::MissingTeams)?;
        let team2 = non_blank(self.team2.as_deref()).ok_or(ValidationError::MissingTeams)?;
        Ok((team1, team2))
    }
}

/// Body of an update request. Absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
}

impl MatchPatch {
    pub fn with_team1(mut self, team1: impl Into<String>) -> Self {
        self.team1 = Some(team1.into());
        self
    }

    pub fn with_team2(mut self, team2: impl Into<String>) -> Self {
        self.team2 = Some(team2.into());
        self
    }

    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.score = Some(score.into());
        self
    }

    /// True when no field would be applied. Empty strings count as absent.
    pub fn is_empty(&self) -> bool {
        present(&self.team1).is_none() && present(&self.team2).is_none() && present(&self.score).is_none()
    }

    /// Check every present field. Nothing is applied unless all of them pass.
    /// An empty string leaves its field untouched, like an absent one.
    pub fn validate(&self) -> Result<ValidatedPatch, ValidationError> {
        let team1 = match present(&self.team1) {
            Some(raw) => Some(non_blank(Some(raw)).ok_or(ValidationError::BlankTeam("team1"))?),
            None => None,
        };
        let team2 = match present(&self.team2) {
            Some(raw) => Some(non_blank(Some(raw)).ok_or(ValidationError::BlankTeam("team2"))?),
            None => None,
        };
        let score = present(&self.score).map(Score::parse).transpose()?;
        Ok(ValidatedPatch {
            team1,
            team2,
            score,
        })
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// A patch whose fields have all been checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedPatch {
    team1: Option<String>,
    team2: Option<String>,
    score: Option<Score>,
}

impl ValidatedPatch {
    pub fn apply(self, target: &mut Match) {
        if let Some(team1) = self.team1 {
            target.team1 = team1;
        }
        if let Some(team2) = self.team2 {
            target.team2 = team2;
        }
        if let Some(score) = self.score {
            target.score = score;
        }
    }
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
