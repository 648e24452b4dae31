/// Objective resolution: turning category patterns into concrete slot values
/// while keeping a quest tree free of accidental repeats.

use rand::rngs::StdRng;
use rustc_hash::FxHashSet;

use crate::core::category::{CategoryError, CategoryTree};
use crate::schema::action_type::ActionType;
use crate::schema::objective::{ObjectiveType, ObjectiveValue, Objectives};

/// One frame of the ancestor chain of the action being expanded.
///
/// Frames live on the stack of the recursive generation calls, so a child
/// only ever borrows its parents.
#[derive(Debug, Clone, Copy)]
pub struct Lineage<'a> {
    pub action_type: ActionType,
    pub objectives: &'a Objectives,
    pub parent: Option<&'a Lineage<'a>>,
}

impl<'a> Lineage<'a> {
    pub fn root(action_type: ActionType, objectives: &'a Objectives) -> Self {
        Self {
            action_type,
            objectives,
            parent: None,
        }
    }

    pub fn child<'b>(&'b self, action_type: ActionType, objectives: &'b Objectives) -> Lineage<'b>
    where
        'a: 'b,
    {
        Lineage {
            action_type,
            objectives,
            parent: Some(self),
        }
    }

    /// This frame, then its parent, up to the root.
    pub fn iter(&self) -> impl Iterator<Item = &Lineage<'a>> {
        std::iter::successors(Some(self), |frame| frame.parent)
    }

    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    /// Every value committed anywhere in the chain, CLASS excluded.
    pub fn used_values(&self) -> FxHashSet<String> {
        self.iter()
            .flat_map(|frame| frame.objectives.iter())
            .filter(|(slot, _)| *slot != ObjectiveType::Class)
            .map(|(_, value)| value.value.clone())
            .collect()
    }
}

/// Per-invocation resolver handed to an executor.
pub struct ObjectiveResolver<'a> {
    categories: &'a CategoryTree,
    inherited: &'a Objectives,
    excluded: FxHashSet<String>,
}

impl<'a> ObjectiveResolver<'a> {
    pub fn new(
        categories: &'a CategoryTree,
        inherited: &'a Objectives,
        lineage: Option<&Lineage<'_>>,
    ) -> Self {
        let excluded = lineage.map(|l| l.used_values()).unwrap_or_default();
        Self {
            categories,
            inherited,
            excluded,
        }
    }

    /// Reuse the inherited value for `slot` (or for `fallback`) when there is
    /// one, otherwise draw a fresh value from `patterns`.
    pub fn resolve(
        &mut self,
        slot: ObjectiveType,
        fallback: Option<ObjectiveType>,
        patterns: &[&str],
        rng: &mut StdRng,
    ) -> Result<ObjectiveValue, CategoryError> {
        let reused = self
            .inherited(slot)
            .or_else(|| fallback.and_then(|f| self.inherited(f)));
        match reused {
            Some(value) => Ok(value.clone()),
            None => self.pick(patterns, rng),
        }
    }

    /// Fresh draw, never reusing a lineage value or one this resolver drew.
    pub fn pick(
        &mut self,
        patterns: &[&str],
        rng: &mut StdRng,
    ) -> Result<ObjectiveValue, CategoryError> {
        let value = self.categories.pick_random(patterns, &self.excluded, rng)?;
        self.excluded.insert(value.value.clone());
        Ok(value)
    }

    /// Fresh draw from the exact category node holding `of`.
    pub fn pick_sibling(
        &mut self,
        of: &ObjectiveValue,
        rng: &mut StdRng,
    ) -> Result<ObjectiveValue, CategoryError> {
        let path = of.path.clone();
        self.pick(&[path.as_str()], rng)
    }

    pub fn inherited(&self, slot: ObjectiveType) -> Option<&'a ObjectiveValue> {
        if slot == ObjectiveType::Class {
            return None;
        }
        self.inherited.get(slot)
    }

    pub fn excluded(&self) -> &FxHashSet<String> {
        &self.excluded
    }
}
