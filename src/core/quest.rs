/// The action/quest tree produced by generation.
///
/// A `Quest` owns its actions and an `Action` owns its optional child quest.
/// Upward queries go through [`ActionPath`] handles resolved from the root.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::core::category::CategoryError;
use crate::core::config::OrderingPolicy;
use crate::core::executor::{GenContext, Request};
use crate::core::objective::Lineage;
use crate::schema::action_type::ActionType;
use crate::schema::objective::{ObjectiveType, ObjectiveValue, Objectives};

#[derive(Debug, Error)]
pub enum QuestError {
    #[error("a quest needs at least one action")]
    EmptyQuest,
    #[error("category error: {0}")]
    Category(#[from] CategoryError),
}

/// Index path of an action from the root quest: `[2, 0]` is the first action
/// of the child quest of the root's third action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ActionPath(Vec<usize>);

impl ActionPath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Nesting level, 0 for actions of the root quest.
    pub fn level(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Path of the action owning the quest this action belongs to.
    pub fn parent(&self) -> Option<ActionPath> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(ActionPath(rest.to_vec())),
            _ => None,
        }
    }

    pub fn child(&self, index: usize) -> ActionPath {
        let mut indices = self.0.clone();
        indices.push(index);
        ActionPath(indices)
    }
}

impl fmt::Display for ActionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        f.write_str(&parts.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub(crate) action_type: ActionType,
    pub(crate) depth: u32,
    pub(crate) splittable: bool,
    pub(crate) objectives: Objectives,
    pub(crate) subquest: Option<Quest>,
    pub(crate) path: ActionPath,
    pub(crate) done: bool,
}

impl Action {
    /// Create an action during generation, expanding it into a child quest
    /// when its verb allows and budget remains.
    pub fn build(
        ctx: &mut GenContext<'_>,
        lineage: Option<&Lineage<'_>>,
        depth: u32,
        action_type: ActionType,
        objectives: Objectives,
        splittable: bool,
    ) -> Result<Action, QuestError> {
        let expands =
            splittable && !action_type.is_empty() && !action_type.is_terminal() && depth > 0;

        let mut subquest = None;
        if expands {
            let registry = ctx.registry;
            if let Some(executor) = registry.for_verb(action_type, ctx.rng) {
                let frame = match lineage {
                    Some(parent) => parent.child(action_type, &objectives),
                    None => Lineage::root(action_type, &objectives),
                };
                let request = Request {
                    lineage: Some(&frame),
                    depth,
                    inherited: objectives.without_class(),
                };
                let quest = executor.generate(ctx, &request)?;
                if !quest.is_epsilon() {
                    subquest = Some(quest);
                }
            }
        }

        Ok(Action {
            action_type,
            depth,
            splittable,
            objectives,
            subquest,
            path: ActionPath::default(),
            done: false,
        })
    }

    pub fn leaf(action_type: ActionType, objectives: Objectives) -> Action {
        Action {
            action_type,
            depth: 0,
            splittable: false,
            objectives,
            subquest: None,
            path: ActionPath::default(),
            done: false,
        }
    }

    pub fn composite(action_type: ActionType, objectives: Objectives, quest: Quest) -> Action {
        Action {
            action_type,
            depth: 0,
            splittable: true,
            objectives,
            subquest: Some(quest),
            path: ActionPath::default(),
            done: false,
        }
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn splittable(&self) -> bool {
        self.splittable
    }

    pub fn objectives(&self) -> &Objectives {
        &self.objectives
    }

    /// Value of `slot`, or the missing sentinel.
    pub fn objective(&self, slot: ObjectiveType) -> ObjectiveValue {
        self.try_objective(slot)
            .cloned()
            .unwrap_or_else(ObjectiveValue::missing)
    }

    pub fn try_objective(&self, slot: ObjectiveType) -> Option<&ObjectiveValue> {
        self.objectives.get(slot)
    }

    /// Tag of the executor that created this action, when recorded.
    pub fn executor_tag(&self) -> Option<&str> {
        self.objectives
            .get(ObjectiveType::Class)
            .map(|v| v.value.as_str())
    }

    pub fn subquest(&self) -> Option<&Quest> {
        self.subquest.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.subquest.is_none()
    }

    pub fn path(&self) -> &ActionPath {
        &self.path
    }

    pub fn is_done(&self) -> bool {
        match &self.subquest {
            Some(quest) => quest.is_done(),
            None => self.done || self.action_type.is_empty(),
        }
    }

    fn rebase(&mut self, path: ActionPath) {
        if let Some(quest) = self.subquest.as_mut() {
            for (i, child) in quest.actions.iter_mut().enumerate() {
                child.rebase(path.child(i));
            }
        }
        self.path = path;
    }
}

impl fmt::Display for Action {
    /// Bare form: `VERB SLOT=value (path) ...`, CLASS left out.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_type.name())?;
        for (slot, value) in self.objectives.iter() {
            if slot != ObjectiveType::Class {
                write!(f, " {}={}", slot, value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quest {
    pub(crate) actions: Vec<Action>,
    pub(crate) ordering: OrderingPolicy,
}

impl Quest {
    pub fn new(actions: Vec<Action>, ordering: OrderingPolicy) -> Result<Quest, QuestError> {
        if actions.is_empty() {
            return Err(QuestError::EmptyQuest);
        }
        let mut quest = Quest { actions, ordering };
        for (i, action) in quest.actions.iter_mut().enumerate() {
            action.rebase(ActionPath(vec![i]));
        }
        Ok(quest)
    }

    /// A quest with nothing to do: a single NONE placeholder.
    pub fn epsilon(depth: u32) -> Quest {
        let mut placeholder = Action::leaf(ActionType::None, Objectives::new());
        placeholder.depth = depth;
        placeholder.path = ActionPath(vec![0]);
        Quest {
            actions: vec![placeholder],
            ordering: OrderingPolicy::Sequential,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.actions.iter().all(|a| a.action_type.is_empty())
    }

    pub fn is_done(&self) -> bool {
        self.actions.iter().all(Action::is_done)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    pub fn get(&self, path: &ActionPath) -> Option<&Action> {
        let (last, ancestors) = path.indices().split_last()?;
        let mut quest = self;
        for i in ancestors {
            quest = quest.actions.get(*i)?.subquest.as_ref()?;
        }
        quest.actions.get(*last)
    }

    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, path: &ActionPath) -> Option<&mut Action> {
        let (last, ancestors) = path.indices().split_last()?;
        let mut quest = self;
        for i in ancestors {
            quest = quest.actions.get_mut(*i)?.subquest.as_mut()?;
        }
        quest.actions.get_mut(*last)
    }

    /// The quest holding the action at `path`.
    pub fn owner(&self, path: &ActionPath) -> Option<&Quest> {
        match path.parent() {
            Some(parent) => self.get(&parent)?.subquest(),
            None if !path.indices().is_empty() => Some(self),
            None => None,
        }
    }

    /// Whether the action at `path` may be completed now: allowed by its
    /// owner's ordering, and every enclosing action allowed by theirs.
    pub fn is_doable(&self, path: &ActionPath) -> bool {
        let mut quest = self;
        for (level, i) in path.indices().iter().enumerate() {
            if *i >= quest.actions.len() || !quest.ordering.allows(&quest.actions, *i) {
                return false;
            }
            if level + 1 == path.indices().len() {
                return true;
            }
            match quest.actions[*i].subquest.as_ref() {
                Some(child) => quest = child,
                None => return false,
            }
        }
        false
    }

    /// First leaf, in traversal order, that is undone and doable.
    pub fn current_action(&self) -> Option<&Action> {
        for (i, action) in self.actions.iter().enumerate() {
            if action.is_done() || !self.ordering.allows(&self.actions, i) {
                continue;
            }
            match action.subquest.as_ref() {
                Some(child) => {
                    if let Some(found) = child.current_action() {
                        return Some(found);
                    }
                }
                None => return Some(action),
            }
        }
        None
    }

    pub fn leaves(&self) -> Vec<&Action> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Action>) {
        for action in &self.actions {
            match action.subquest.as_ref() {
                Some(child) => child.collect_leaves(out),
                None => out.push(action),
            }
        }
    }

    /// Number of actions in the whole tree, composite ones included.
    pub fn total_actions(&self) -> usize {
        self.actions
            .iter()
            .map(|a| 1 + a.subquest.as_ref().map_or(0, Quest::total_actions))
            .sum()
    }

    /// Deepest nesting level below this quest, 1 for a flat quest.
    pub fn height(&self) -> usize {
        1 + self
            .actions
            .iter()
            .filter_map(|a| a.subquest.as_ref().map(Quest::height))
            .max()
            .unwrap_or(0)
    }
}
