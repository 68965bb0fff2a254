use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Server-assigned match identifier. Starts at 1 and is never reused.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(u64);

impl MatchId {
    pub const FIRST: MatchId = MatchId(1);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text that is not a plain run of ASCII digits fitting a `u64`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid match id: {0:?}")]
pub struct InvalidMatchId(pub String);

impl FromStr for MatchId {
    type Err = InvalidMatchId;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidMatchId(s.to_string()));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| InvalidMatchId(s.to_string()))
    }
}

macro_rules! branded_id {
    ($name:ident, $prefix:expr) => {
        #[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(format!("{}_{}", $prefix, Uuid::now_v7()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

branded_id!(SubscriberId, "sub");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_id_parses_digits() {
        let id: MatchId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn match_id_rejects_non_numeric() {
        assert!("abc".parse::<MatchId>().is_err());
        assert!("1.5".parse::<MatchId>().is_err());
        assert!("-3".parse::<MatchId>().is_err());
        assert!("".parse::<MatchId>().is_err());
    }

    #[test]
    fn match_id_rejects_sign_and_whitespace() {
        for raw in [" 1", "1 ", "+1", "1\n", "18446744073709551616"] {
            assert_eq!(
                raw.parse::<MatchId>(),
                Err(InvalidMatchId(raw.to_string())),
                "accepted {raw:?}"
            );
        }
        assert_eq!("007".parse::<MatchId>(), Ok(MatchId::new(7)));
    }

    #[test]
    fn match_id_next_increments() {
        assert_eq!(MatchId::FIRST.next(), MatchId::new(2));
    }

    #[test]
    fn match_id_serializes_as_number() {
        let json = serde_json::to_string(&MatchId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn subscriber_id_has_prefix() {
        let id = SubscriberId::new();
        assert!(id.as_str().starts_with("sub_"), "got: {id}");
    }

    #[test]
    fn subscriber_ids_are_unique() {
        assert_ne!(SubscriberId::new(), SubscriberId::new());
    }
}
