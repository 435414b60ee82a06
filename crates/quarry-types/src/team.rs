//! Team labels for the pursuit game.
//!
//! Exactly three teams exist.  Anything else is rejected with
//! [`QuarryError::InvalidTeamLabel`] so a typo in a config file cannot
//! silently create a fourth team.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::QuarryError;

/// One of the three recognised team colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamColor {
    Red,
    Green,
    Blue,
}

impl TeamColor {
    /// Resolve a numeric team index (0 = red, 1 = green, 2 = blue).
    pub fn from_index(index: usize) -> Result<Self, QuarryError> {
        match index {
            0 => Ok(Self::Red),
            1 => Ok(Self::Green),
            2 => Ok(Self::Blue),
            _ => Err(QuarryError::InvalidTeamLabel(format!("index {index}"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl FromStr for TeamColor {
    type Err = QuarryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            other => Err(QuarryError::InvalidTeamLabel(other.to_string())),
        }
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognised_labels() {
        assert_eq!("red".parse::<TeamColor>().unwrap(), TeamColor::Red);
        assert_eq!("green".parse::<TeamColor>().unwrap(), TeamColor::Green);
        assert_eq!("blue".parse::<TeamColor>().unwrap(), TeamColor::Blue);
    }

    #[test]
    fn rejects_unknown_label() {
        let err = "magenta".parse::<TeamColor>().unwrap_err();
        assert!(matches!(err, QuarryError::InvalidTeamLabel(label) if label == "magenta"));
    }

    #[test]
    fn rejects_capitalised_label() {
        // Labels are exact; "Red" is not a team.
        assert!("Red".parse::<TeamColor>().is_err());
    }

    #[test]
    fn from_index_maps_all_three() {
        assert_eq!(TeamColor::from_index(0).unwrap(), TeamColor::Red);
        assert_eq!(TeamColor::from_index(1).unwrap(), TeamColor::Green);
        assert_eq!(TeamColor::from_index(2).unwrap(), TeamColor::Blue);
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        assert!(matches!(
            TeamColor::from_index(3),
            Err(QuarryError::InvalidTeamLabel(_))
        ));
    }

    #[test]
    fn display_matches_wire_label() {
        assert_eq!(TeamColor::Blue.to_string(), "blue");
        let json = serde_json::to_string(&TeamColor::Blue).unwrap();
        assert_eq!(json, "\"blue\"");
    }
}
