/// Completion engine: routes gameplay events down a quest tree.

use crate::core::quest::{Action, Quest};
use crate::schema::event::GameEvent;

/// Upward notifications emitted while an event completes something.
pub trait QuestListener {
    fn action_done(&mut self, _action: &Action) {}
    fn quest_done(&mut self, _quest: &Quest) {}
}

struct Silent;

impl QuestListener for Silent {}

impl Action {
    /// Whether this action, taken as a leaf, is completed by `event`: same
    /// verb, the event fills exactly the verb's event slots in order, and
    /// every value equals the action's.
    pub fn matches(&self, event: &GameEvent) -> bool {
        let slots = self.action_type.event_slots();
        self.action_type == event.verb
            && event.payload.len() == slots.len()
            && event
                .payload
                .iter()
                .zip(slots)
                .all(|((slot, value), expected)| {
                    slot == expected && self.objectives.get(*slot) == Some(value)
                })
    }
}

impl Quest {
    /// Complete the first eligible leaf matching `event`.
    pub fn dispatch(&mut self, event: &GameEvent) -> bool {
        self.dispatch_with(event, &mut Silent)
    }

    pub fn dispatch_with(&mut self, event: &GameEvent, listener: &mut dyn QuestListener) -> bool {
        let matched = self.route(event, listener);
        if !matched {
            tracing::trace!(verb = %event.verb, slots = event.payload.len(), "event matched nothing");
        }
        matched
    }

    fn route(&mut self, event: &GameEvent, listener: &mut dyn QuestListener) -> bool {
        if self.is_done() {
            return false;
        }

        for i in 0..self.actions.len() {
            if self.actions[i].is_done() || !self.ordering.allows(&self.actions, i) {
                continue;
            }
            let action = &mut self.actions[i];
            let matched = if let Some(child) = action.subquest.as_mut() {
                child.route(event, listener)
            } else if action.matches(event) {
                action.done = true;
                tracing::debug!(verb = %action.action_type, path = %action.path, "action completed");
                listener.action_done(action);
                true
            } else {
                false
            };
            if matched {
                if self.is_done() {
                    listener.quest_done(self);
                }
                return true;
            }
        }
        false
    }
}

impl GameEvent {
    /// The event that would complete `action`. Slots the action lacks carry
    /// the missing sentinel, so the event never matches it.
    pub fn for_action(action: &Action) -> GameEvent {
        let payload = action
            .action_type()
            .event_slots()
            .iter()
            .map(|slot| (*slot, action.objective(*slot)))
            .collect();
        GameEvent::new(action.action_type(), payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::OrderingPolicy;
    use crate::schema::action_type::ActionType;
    use crate::schema::objective::{ObjectiveType, ObjectiveValue, Objectives};

    fn place(name: &str) -> ObjectiveValue {
        ObjectiveValue::new(name, "area/place")
    }

    fn goto(name: &str) -> Action {
        Action::leaf(
            ActionType::Goto,
            Objectives::from([(ObjectiveType::Objective, place(name))]),
        )
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl QuestListener for Recorder {
        fn action_done(&mut self, action: &Action) {
            self.events.push(format!("action {}", action.path()));
        }

        fn quest_done(&mut self, quest: &Quest) {
            self.events.push(format!("quest of {}", quest.len()));
        }
    }

    #[test]
    fn matching_requires_every_slot() {
        let action = Action::leaf(
            ActionType::Get,
            Objectives::from([
                (ObjectiveType::ObjGet, ObjectiveValue::new("Rope", "object/tool")),
                (ObjectiveType::LocObjective, place("Mill")),
            ]),
        );
        assert!(action.matches(&GameEvent::get(
            ObjectiveValue::new("Rope", "object/tool"),
            place("Mill")
        )));
        assert!(!action.matches(&GameEvent::get(
            ObjectiveValue::new("Rope", "object/tool"),
            place("Ford")
        )));
        assert!(!action.matches(&GameEvent::goto(place("Mill"))));
    }

    #[test]
    fn empty_or_partial_payload_never_matches() {
        let mut quest = Quest::new(vec![goto("Mill")], OrderingPolicy::Sequential).unwrap();
        assert!(!quest.dispatch(&GameEvent::new(ActionType::Goto, vec![])));
        assert!(!quest.is_done());

        let rope = ObjectiveValue::new("Rope", "object/tool");
        let get = Action::leaf(
            ActionType::Get,
            Objectives::from([
                (ObjectiveType::ObjGet, rope.clone()),
                (ObjectiveType::LocObjective, place("Mill")),
            ]),
        );
        let without_source = GameEvent::new(
            ActionType::Get,
            vec![(ObjectiveType::ObjGet, rope.clone())],
        );
        assert!(!get.matches(&without_source));

        let swapped = GameEvent::new(
            ActionType::Get,
            vec![
                (ObjectiveType::LocObjective, place("Mill")),
                (ObjectiveType::ObjGet, rope),
            ],
        );
        assert!(!get.matches(&swapped));
    }

    #[test]
    fn path_is_part_of_equality() {
        let action = goto("Mill");
        assert!(!action.matches(&GameEvent::goto(ObjectiveValue::new("Mill", "area/wild"))));
    }

    #[test]
    fn missing_slot_never_matches() {
        let action = Action::leaf(ActionType::Give, Objectives::new());
        let event = GameEvent::for_action(&action);
        assert!(event.payload.iter().all(|(_, v)| v.is_missing()));
        assert!(!action.matches(&event));
    }

    #[test]
    fn listener_sees_leaf_then_enclosing_quests() {
        let inner = Quest::new(vec![goto("Mill")], OrderingPolicy::Sequential).unwrap();
        let mut quest = Quest::new(
            vec![Action::composite(ActionType::Goto, Objectives::new(), inner)],
            OrderingPolicy::Sequential,
        )
        .unwrap();

        let mut recorder = Recorder::default();
        assert!(quest.dispatch_with(&GameEvent::goto(place("Mill")), &mut recorder));
        assert_eq!(
            recorder.events,
            vec!["action 0.0", "quest of 1", "quest of 1"]
        );
        assert!(quest.is_done());
    }

    #[test]
    fn doable_but_wrong_action_does_not_block_unordered_siblings() {
        let mut quest = Quest::new(
            vec![goto("Mill"), goto("Ford")],
            OrderingPolicy::Unordered,
        )
        .unwrap();
        assert!(quest.dispatch(&GameEvent::goto(place("Ford"))));
        assert!(quest.actions()[1].is_done());
        assert!(!quest.actions()[0].is_done());
    }

    #[test]
    fn for_action_round_trips_through_matches() {
        let action = Action::leaf(
            ActionType::Exchange,
            Objectives::from([
                (ObjectiveType::ObjGive, ObjectiveValue::new("Ring", "object/personal")),
                (ObjectiveType::ObjGet, ObjectiveValue::new("Rope", "object/tool")),
                (ObjectiveType::Pnj, ObjectiveValue::new("Tobin", "pnj/being/merchant")),
            ]),
        );
        assert!(action.matches(&GameEvent::for_action(&action)));
    }
}
