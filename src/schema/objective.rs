use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The role a concrete value plays within an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectiveType {
    /// Primary target: the place to go, the NPC to kill, the one to report to.
    Objective,
    /// Object to obtain.
    ObjGet,
    /// Object to hand over.
    ObjGive,
    /// Object or skill being used.
    ObjUse,
    /// Location, source or recipient of the action.
    LocObjective,
    /// Counterpart NPC (trader, victim of a theft).
    Pnj,
    /// Reserved: tag of the executor that produced the action.
    Class,
}

impl ObjectiveType {
    pub const ALL: [ObjectiveType; 7] = [
        Self::Objective,
        Self::ObjGet,
        Self::ObjGive,
        Self::ObjUse,
        Self::LocObjective,
        Self::Pnj,
        Self::Class,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Objective => "OBJECTIVE",
            Self::ObjGet => "OBJ_GET",
            Self::ObjGive => "OBJ_GIVE",
            Self::ObjUse => "OBJ_USE",
            Self::LocObjective => "LOC_OBJECTIVE",
            Self::Pnj => "PNJ",
            Self::Class => "CLASS",
        }
    }

    /// Case-insensitive inverse of [`ObjectiveType::name`].
    pub fn from_name(name: &str) -> Option<ObjectiveType> {
        Self::ALL
            .iter()
            .copied()
            .find(|slot| slot.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ObjectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectiveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown objective type '{}'", s))
    }
}

/// A resolved leaf value together with the category path it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectiveValue {
    pub value: String,
    pub path: String,
}

const MISSING: &str = "ERR";

impl ObjectiveValue {
    pub fn new(value: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            path: path.into(),
        }
    }

    /// Sentinel returned when an action is asked for a slot it never received.
    pub fn missing() -> Self {
        Self::new(MISSING, MISSING)
    }

    pub fn is_missing(&self) -> bool {
        self.value == MISSING && self.path == MISSING
    }
}

impl fmt::Display for ObjectiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.path)
    }
}

/// Slot → value map carried by every action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objectives(BTreeMap<ObjectiveType, ObjectiveValue>);

impl Objectives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: ObjectiveType) -> Option<&ObjectiveValue> {
        self.0.get(&slot)
    }

    pub fn insert(&mut self, slot: ObjectiveType, value: ObjectiveValue) -> Option<ObjectiveValue> {
        self.0.insert(slot, value)
    }

    pub fn contains(&self, slot: ObjectiveType) -> bool {
        self.0.contains_key(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectiveType, &ObjectiveValue)> {
        self.0.iter().map(|(slot, value)| (*slot, value))
    }

    pub fn values(&self) -> impl Iterator<Item = &ObjectiveValue> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ObjectiveType, ObjectiveValue)> for Objectives {
    fn from_iter<I: IntoIterator<Item = (ObjectiveType, ObjectiveValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(ObjectiveType, ObjectiveValue); N]> for Objectives {
    fn from(slots: [(ObjectiveType, ObjectiveValue); N]) -> Self {
        slots.into_iter().collect()
    }
}

impl Objectives {
    /// Copy of this map without the reserved CLASS slot.
    pub fn without_class(&self) -> Objectives {
        self.iter()
            .filter(|(slot, _)| *slot != ObjectiveType::Class)
            .map(|(slot, value)| (slot, value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_equality_includes_path() {
        let a = ObjectiveValue::new("Mira", "pnj/being");
        let b = ObjectiveValue::new("Mira", "pnj/being");
        let c = ObjectiveValue::new("Mira", "pnj/beast");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn missing_sentinel() {
        assert!(ObjectiveValue::missing().is_missing());
        assert!(!ObjectiveValue::new("ERR", "pnj").is_missing());
    }

    #[test]
    fn objectives_keep_one_value_per_slot() {
        let mut objectives = Objectives::new();
        objectives.insert(ObjectiveType::Objective, ObjectiveValue::new("Wolf", "pnj/beast"));
        let previous =
            objectives.insert(ObjectiveType::Objective, ObjectiveValue::new("Bandit", "pnj/beast"));
        assert_eq!(previous.map(|v| v.value), Some("Wolf".to_string()));
        assert_eq!(objectives.len(), 1);
        assert_eq!(objectives.get(ObjectiveType::Objective).unwrap().value, "Bandit");
    }

    #[test]
    fn slot_names() {
        assert_eq!(ObjectiveType::LocObjective.name(), "LOC_OBJECTIVE");
        assert_eq!(ObjectiveType::from_name("obj_get"), Some(ObjectiveType::ObjGet));
        assert_eq!(ObjectiveType::from_name("target"), None);
    }
}
