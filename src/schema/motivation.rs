use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why an NPC hands out a quest. Each motivation groups the strategies
/// that can satisfy it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Motivation {
    Knowledge,
    Comfort,
    Reputation,
    Serenity,
    Protection,
    Conquest,
    Wealth,
    Ability,
    Equipment,
}

impl Motivation {
    pub const ALL: [Motivation; 9] = [
        Self::Knowledge,
        Self::Comfort,
        Self::Reputation,
        Self::Serenity,
        Self::Protection,
        Self::Conquest,
        Self::Wealth,
        Self::Ability,
        Self::Equipment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Knowledge => "KNOWLEDGE",
            Self::Comfort => "COMFORT",
            Self::Reputation => "REPUTATION",
            Self::Serenity => "SERENITY",
            Self::Protection => "PROTECTION",
            Self::Conquest => "CONQUEST",
            Self::Wealth => "WEALTH",
            Self::Ability => "ABILITY",
            Self::Equipment => "EQUIPMENT",
        }
    }

    pub fn from_name(name: &str) -> Option<Motivation> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Motivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Motivation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown motivation '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_motivation() {
        assert_eq!("comfort".parse::<Motivation>(), Ok(Motivation::Comfort));
        assert_eq!(Motivation::from_name("SERENITY"), Some(Motivation::Serenity));
        assert!("boredom".parse::<Motivation>().is_err());
    }
}
