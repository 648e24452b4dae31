use serde::{Deserialize, Serialize};

use super::action_type::ActionType;
use super::objective::{ObjectiveType, ObjectiveValue};

/// Something the player did in the game, fed to the completion engine.
///
/// The payload carries one value per slot of the verb's `event_slots()`;
/// a leaf action matches when it has the same verb, the event fills exactly
/// those slots, and every value is equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub verb: ActionType,
    pub payload: Vec<(ObjectiveType, ObjectiveValue)>,
}

impl GameEvent {
    pub fn new(verb: ActionType, payload: Vec<(ObjectiveType, ObjectiveValue)>) -> Self {
        Self { verb, payload }
    }

    /// Build an event from values given in the verb's `event_slots()` order.
    /// `None` unless there is exactly one value per slot.
    pub fn with_values(verb: ActionType, values: Vec<ObjectiveValue>) -> Option<Self> {
        (values.len() == verb.event_slots().len()).then(|| Self::slotted(verb, values))
    }

    fn slotted(verb: ActionType, values: Vec<ObjectiveValue>) -> Self {
        let payload = verb
            .event_slots()
            .iter()
            .copied()
            .zip(values)
            .collect();
        Self { verb, payload }
    }

    fn single(verb: ActionType, value: ObjectiveValue) -> Self {
        Self::slotted(verb, vec![value])
    }

    pub fn capture(pnj: ObjectiveValue) -> Self {
        Self::single(ActionType::Capture, pnj)
    }

    pub fn damage(target: ObjectiveValue) -> Self {
        Self::single(ActionType::Damage, target)
    }

    pub fn defend(object: ObjectiveValue) -> Self {
        Self::single(ActionType::Defend, object)
    }

    pub fn escort(pnj: ObjectiveValue) -> Self {
        Self::single(ActionType::Escort, pnj)
    }

    pub fn exchange(give: ObjectiveValue, get: ObjectiveValue, to: ObjectiveValue) -> Self {
        Self::slotted(ActionType::Exchange, vec![give, get, to])
    }

    pub fn experiment(object: ObjectiveValue) -> Self {
        Self::single(ActionType::Experiment, object)
    }

    pub fn explore(area: ObjectiveValue) -> Self {
        Self::single(ActionType::Explore, area)
    }

    pub fn gather(object: ObjectiveValue) -> Self {
        Self::single(ActionType::Gather, object)
    }

    pub fn get(object: ObjectiveValue, from: ObjectiveValue) -> Self {
        Self::slotted(ActionType::Get, vec![object, from])
    }

    pub fn give(object: ObjectiveValue, to: ObjectiveValue) -> Self {
        Self::slotted(ActionType::Give, vec![object, to])
    }

    pub fn goto(area: ObjectiveValue) -> Self {
        Self::single(ActionType::Goto, area)
    }

    pub fn kill(pnj: ObjectiveValue) -> Self {
        Self::single(ActionType::Kill, pnj)
    }

    pub fn learn(object: ObjectiveValue) -> Self {
        Self::single(ActionType::Learn, object)
    }

    pub fn listen(pnj: ObjectiveValue) -> Self {
        Self::single(ActionType::Listen, pnj)
    }

    pub fn read(object: ObjectiveValue) -> Self {
        Self::single(ActionType::Read, object)
    }

    pub fn repair(object: ObjectiveValue) -> Self {
        Self::single(ActionType::Repair, object)
    }

    pub fn report(to: ObjectiveValue) -> Self {
        Self::single(ActionType::Report, to)
    }

    pub fn spy(on: ObjectiveValue) -> Self {
        Self::single(ActionType::Spy, on)
    }

    pub fn steal(object: ObjectiveValue, from: ObjectiveValue) -> Self {
        Self::slotted(ActionType::Steal, vec![object, from])
    }

    pub fn stealth(object: ObjectiveValue) -> Self {
        Self::single(ActionType::Stealth, object)
    }

    pub fn take(object: ObjectiveValue, from: ObjectiveValue) -> Self {
        Self::slotted(ActionType::Take, vec![object, from])
    }

    pub fn use_on(used: ObjectiveValue, on: ObjectiveValue) -> Self {
        Self::slotted(ActionType::Use, vec![used, on])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_fill_event_slots() {
        let event = GameEvent::get(
            ObjectiveValue::new("Ruby", "object/rare"),
            ObjectiveValue::new("Mira", "pnj/being"),
        );
        assert_eq!(event.verb, ActionType::Get);
        assert_eq!(event.payload.len(), 2);
        assert_eq!(event.payload[0].0, ObjectiveType::ObjGet);
        assert_eq!(event.payload[1].0, ObjectiveType::LocObjective);
        assert_eq!(event.payload[1].1.value, "Mira");
    }

    #[test]
    fn exchange_carries_three_slots() {
        let event = GameEvent::exchange(
            ObjectiveValue::new("Ring", "object/personal"),
            ObjectiveValue::new("Rope", "object/supply"),
            ObjectiveValue::new("Tobin", "pnj/being/merchant"),
        );
        let slots: Vec<ObjectiveType> = event.payload.iter().map(|(slot, _)| *slot).collect();
        assert_eq!(
            slots,
            vec![ObjectiveType::ObjGive, ObjectiveType::ObjGet, ObjectiveType::Pnj]
        );
    }

    #[test]
    fn with_values_needs_one_value_per_slot() {
        let rope = ObjectiveValue::new("Rope", "object/tool");
        let mill = ObjectiveValue::new("Mill", "area/place");
        assert!(GameEvent::with_values(ActionType::Goto, vec![]).is_none());
        assert!(GameEvent::with_values(ActionType::Get, vec![rope.clone()]).is_none());
        assert!(
            GameEvent::with_values(ActionType::Goto, vec![mill.clone(), rope.clone()]).is_none()
        );
        assert_eq!(
            GameEvent::with_values(ActionType::Get, vec![rope.clone(), mill.clone()]),
            Some(GameEvent::get(rope, mill))
        );
    }

    #[test]
    fn single_slot_verbs_use_objective() {
        let event = GameEvent::listen(ObjectiveValue::new("Mira", "pnj/being"));
        assert_eq!(event.verb, ActionType::Listen);
        assert_eq!(event.payload[0].0, ObjectiveType::Objective);
    }
}
