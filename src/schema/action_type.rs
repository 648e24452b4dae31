use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::objective::ObjectiveType;

/// The verb of a quest action.
///
/// The set is closed: strategies, the completion engine and the export
/// formats all key on these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// Epsilon placeholder for a quest with nothing to do.
    None,
    /// A whole sub-quest picked from the motivation strategies.
    Quest,
    Capture,
    Damage,
    Defend,
    Escort,
    Exchange,
    Experiment,
    Explore,
    Gather,
    Get,
    Give,
    Goto,
    Kill,
    Learn,
    Listen,
    Read,
    Repair,
    Report,
    Spy,
    Steal,
    Stealth,
    Take,
    Use,
}

impl ActionType {
    pub const ALL: [ActionType; 24] = [
        Self::None,
        Self::Quest,
        Self::Capture,
        Self::Damage,
        Self::Defend,
        Self::Escort,
        Self::Exchange,
        Self::Experiment,
        Self::Explore,
        Self::Gather,
        Self::Get,
        Self::Give,
        Self::Goto,
        Self::Kill,
        Self::Learn,
        Self::Listen,
        Self::Read,
        Self::Repair,
        Self::Report,
        Self::Spy,
        Self::Steal,
        Self::Stealth,
        Self::Take,
        Self::Use,
    ];

    /// Wire name, as written in exports (e.g. "GOTO").
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Quest => "QUEST",
            Self::Capture => "CAPTURE",
            Self::Damage => "DAMAGE",
            Self::Defend => "DEFEND",
            Self::Escort => "ESCORT",
            Self::Exchange => "EXCHANGE",
            Self::Experiment => "EXPERIMENT",
            Self::Explore => "EXPLORE",
            Self::Gather => "GATHER",
            Self::Get => "GET",
            Self::Give => "GIVE",
            Self::Goto => "GOTO",
            Self::Kill => "KILL",
            Self::Learn => "LEARN",
            Self::Listen => "LISTEN",
            Self::Read => "READ",
            Self::Repair => "REPAIR",
            Self::Report => "REPORT",
            Self::Spy => "SPY",
            Self::Steal => "STEAL",
            Self::Stealth => "STEALTH",
            Self::Take => "TAKE",
            Self::Use => "USE",
        }
    }

    /// Case-insensitive inverse of [`ActionType::name`].
    pub fn from_name(name: &str) -> Option<ActionType> {
        Self::ALL
            .iter()
            .copied()
            .find(|verb| verb.name().eq_ignore_ascii_case(name))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Verbs that are never split into a sub-quest.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            Self::Quest
                | Self::Goto
                | Self::Learn
                | Self::Get
                | Self::Steal
                | Self::Spy
                | Self::Capture
                | Self::Kill
        )
    }

    /// The objective slots a gameplay event of this verb carries, in the
    /// order the per-verb event constructors take them.
    pub fn event_slots(&self) -> &'static [ObjectiveType] {
        use ObjectiveType::*;
        match self {
            Self::None | Self::Quest => &[],
            Self::Exchange => &[ObjGive, ObjGet, Pnj],
            Self::Get => &[ObjGet, LocObjective],
            Self::Give => &[ObjGive, LocObjective],
            Self::Steal | Self::Take => &[ObjGet, Pnj],
            Self::Use => &[ObjUse, LocObjective],
            _ => &[Objective],
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown action type '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for verb in ActionType::ALL {
            assert_eq!(ActionType::from_name(verb.name()), Some(verb));
        }
        assert_eq!(ActionType::from_name("goto"), Some(ActionType::Goto));
        assert_eq!(ActionType::from_name("fly"), None);
    }

    #[test]
    fn terminal_verbs() {
        assert!(!ActionType::Goto.is_terminal());
        assert!(!ActionType::Quest.is_terminal());
        assert!(ActionType::Report.is_terminal());
        assert!(ActionType::Damage.is_terminal());
        assert!(ActionType::None.is_terminal());
    }

    #[test]
    fn event_slots_per_verb() {
        assert_eq!(ActionType::Goto.event_slots(), &[ObjectiveType::Objective]);
        assert_eq!(
            ActionType::Exchange.event_slots(),
            &[
                ObjectiveType::ObjGive,
                ObjectiveType::ObjGet,
                ObjectiveType::Pnj
            ]
        );
        assert!(ActionType::Quest.event_slots().is_empty());
    }

    #[test]
    fn serde_uses_wire_names() {
        let s = ron::to_string(&ActionType::Goto).unwrap();
        assert_eq!(s, "GOTO");
    }
}
