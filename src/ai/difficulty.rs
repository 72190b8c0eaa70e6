use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Bot strength. Each tier keeps the behavior of the tiers below it as a fallback.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Random legal column.
    #[default]
    Easy,
    /// Blocks an immediate win of the human.
    Medium,
    /// Takes its own immediate win first.
    Hard,
    /// Also avoids columns that hand the human a win on the reply.
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    /// Integer tier as stored in the settings file.
    pub fn tier(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = SettingsError;

    fn try_from(tier: u8) -> Result<Self, Self::Error> {
        Difficulty::ALL
            .get(tier as usize)
            .copied()
            .ok_or(SettingsError::InvalidDifficulty(tier))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_round_trip() {
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::try_from(difficulty.tier()).unwrap(), difficulty);
        }
        assert_eq!(Difficulty::Extreme.tier(), 3);
    }

    #[test]
    fn test_out_of_range_tier() {
        assert!(matches!(
            Difficulty::try_from(4),
            Err(SettingsError::InvalidDifficulty(4))
        ));
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Hard < Difficulty::Extreme);
    }
}
