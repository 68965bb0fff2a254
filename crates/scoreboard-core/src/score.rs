//! Score grammar: two non-negative integers separated by a colon, with
//! arbitrary whitespace around either side.
//!
//! Accepted input is normalized to `"<home> : <away>"`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// `[0-9]` rather than `\d`: regex's `\d` matches any Unicode digit.
static SCORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([0-9]+)\s*:\s*([0-9]+)\s*$").unwrap());

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("Score must be: number : number (e.g. 3 : 2)")]
    Malformed,
    #[error("Score value out of range: {0}")]
    OutOfRange(String),
}

/// A match score. Goals for the first-named team come first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub const KICKOFF: Score = Score { home: 0, away: 0 };

    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    pub fn parse(input: &str) -> Result<Self, ScoreError> {
        input.parse()
    }
}

impl FromStr for Score {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = SCORE_PATTERN.captures(s).ok_or(ScoreError::Malformed)?;
        let side = |i: usize| -> Result<u32, ScoreError> {
            let digits = &caps[i];
            digits
                .parse::<u32>()
                .map_err(|_| ScoreError::OutOfRange(digits.to_string()))
        };
        Ok(Self {
            home: side(1)?,
            away: side(2)?,
        })
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.home, self.away)
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kickoff_is_nil_nil() {
        assert_eq!(Score::KICKOFF.to_string(), "0 : 0");
    }

    #[test]
    fn whitespace_variants_normalize() {
        for input in ["2:1", " 2 : 1 ", "2  :1", "2: 1", "\t2 :\t1\n"] {
            let score = Score::parse(input).unwrap();
            assert_eq!(score.to_string(), "2 : 1", "input: {input:?}");
        }
    }

    #[test]
    fn malformed_scores_rejected() {
        for input in ["two:one", "1-0", "1:", ":1", "", "1 : 2 : 3", "-1:0", "1.0:2", "a1:2"] {
            assert_eq!(Score::parse(input), Err(ScoreError::Malformed), "input: {input:?}");
        }
    }

    #[test]
    fn non_ascii_digits_rejected() {
        // Arabic-Indic digits
        assert_eq!(Score::parse("٣:١"), Err(ScoreError::Malformed));
    }

    #[test]
    fn leading_zeros_dropped() {
        assert_eq!(Score::parse("007:01").unwrap().to_string(), "7 : 1");
    }

    #[test]
    fn huge_values_out_of_range() {
        let err = Score::parse("99999999999:0").unwrap_err();
        assert!(matches!(err, ScoreError::OutOfRange(ref d) if d == "99999999999"));
    }

    #[test]
    fn serializes_as_normalized_string() {
        let json = serde_json::to_string(&Score::new(3, 1)).unwrap();
        assert_eq!(json, "\"3 : 1\"");
    }

    #[test]
    fn deserializes_from_loose_string() {
        let score: Score = serde_json::from_str("\"4:0\"").unwrap();
        assert_eq!(score, Score::new(4, 0));
        assert!(serde_json::from_str::<Score>("\"4-0\"").is_err());
    }

    #[test]
    fn malformed_message_matches_api_contract() {
        assert_eq!(
            ScoreError::Malformed.to_string(),
            "Score must be: number : number (e.g. 3 : 2)"
        );
    }
}
