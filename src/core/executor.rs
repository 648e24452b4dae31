/// Executors turn a motivation or a verb into a quest. The registry maps
/// motivations and verbs to the executors eligible for them.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::core::category::CategoryTree;
use crate::core::config::GeneratorConfig;
use crate::core::objective::{Lineage, ObjectiveResolver};
use crate::core::quest::{Action, Quest, QuestError};
use crate::schema::action_type::ActionType;
use crate::schema::motivation::Motivation;
use crate::schema::objective::{ObjectiveType, ObjectiveValue, Objectives};

/// Everything a generation run shares across the recursive executor calls.
pub struct GenContext<'a> {
    pub categories: &'a CategoryTree,
    pub registry: &'a ExecutorRegistry,
    pub config: &'a GeneratorConfig,
    pub rng: &'a mut StdRng,
}

/// One executor invocation.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    /// Ancestor chain of the action being expanded; `None` at the root.
    pub lineage: Option<&'a Lineage<'a>>,
    /// Budget of the action being expanded. Actions created by the
    /// executor get one less.
    pub depth: u32,
    /// Objectives of the action being expanded, CLASS removed.
    pub inherited: Objectives,
}

impl Request<'static> {
    /// Request for a top-level strategy: no lineage, nothing inherited.
    pub fn root(depth: u32) -> Self {
        Request {
            lineage: None,
            depth,
            inherited: Objectives::new(),
        }
    }
}

pub trait Executor: Send + Sync {
    fn tag(&self) -> &str;

    /// Build a non-empty quest for `request`.
    fn generate(&self, ctx: &mut GenContext<'_>, request: &Request<'_>)
        -> Result<Quest, QuestError>;
}

/// An executor backed by a plain function.
#[derive(Clone, Copy)]
pub struct Strategy {
    pub tag: &'static str,
    pub build: fn(&mut Expansion<'_, '_>) -> Result<Quest, QuestError>,
}

impl Strategy {
    pub const fn new(
        tag: &'static str,
        build: fn(&mut Expansion<'_, '_>) -> Result<Quest, QuestError>,
    ) -> Self {
        Self { tag, build }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy").field("tag", &self.tag).finish()
    }
}

impl Executor for Strategy {
    fn tag(&self) -> &str {
        self.tag
    }

    fn generate(
        &self,
        ctx: &mut GenContext<'_>,
        request: &Request<'_>,
    ) -> Result<Quest, QuestError> {
        tracing::debug!(
            tag = self.tag,
            depth = request.depth,
            lineage = request.lineage.map_or(0, |l| l.depth()),
            "running executor"
        );
        let mut expansion = Expansion::new(ctx, request, self.tag);
        (self.build)(&mut expansion)
    }
}

/// Helper handed to strategy functions: draws values and builds the actions
/// of one executor call.
pub struct Expansion<'e, 'a> {
    ctx: &'e mut GenContext<'a>,
    request: &'e Request<'e>,
    resolver: ObjectiveResolver<'e>,
    tag: &'e str,
}

impl<'e, 'a> Expansion<'e, 'a> {
    pub fn new(ctx: &'e mut GenContext<'a>, request: &'e Request<'e>, tag: &'e str) -> Self {
        let categories: &'e CategoryTree = ctx.categories;
        let resolver = ObjectiveResolver::new(categories, &request.inherited, request.lineage);
        Self {
            ctx,
            request,
            resolver,
            tag,
        }
    }

    pub fn resolve(
        &mut self,
        slot: ObjectiveType,
        fallback: Option<ObjectiveType>,
        patterns: &[&str],
    ) -> Result<ObjectiveValue, QuestError> {
        Ok(self
            .resolver
            .resolve(slot, fallback, patterns, self.ctx.rng)?)
    }

    pub fn pick(&mut self, patterns: &[&str]) -> Result<ObjectiveValue, QuestError> {
        Ok(self.resolver.pick(patterns, self.ctx.rng)?)
    }

    pub fn pick_sibling(&mut self, of: &ObjectiveValue) -> Result<ObjectiveValue, QuestError> {
        Ok(self.resolver.pick_sibling(of, self.ctx.rng)?)
    }

    pub fn inherited(&self, slot: ObjectiveType) -> Option<&ObjectiveValue> {
        self.resolver.inherited(slot)
    }

    /// Budget given to the actions this call creates.
    pub fn child_depth(&self) -> u32 {
        self.request.depth.saturating_sub(1)
    }

    /// Whether a splittable action created now would expand further.
    pub fn can_split(&self) -> bool {
        self.child_depth() > 0
    }

    /// A splittable action.
    pub fn action(
        &mut self,
        action_type: ActionType,
        objectives: Objectives,
    ) -> Result<Action, QuestError> {
        self.make(action_type, objectives, true)
    }

    /// An action that never expands.
    pub fn leaf(
        &mut self,
        action_type: ActionType,
        objectives: Objectives,
    ) -> Result<Action, QuestError> {
        self.make(action_type, objectives, false)
    }

    fn make(
        &mut self,
        action_type: ActionType,
        mut objectives: Objectives,
        splittable: bool,
    ) -> Result<Action, QuestError> {
        objectives.insert(ObjectiveType::Class, ObjectiveValue::new(self.tag, ""));
        let depth = self.child_depth();
        Action::build(
            self.ctx,
            self.request.lineage,
            depth,
            action_type,
            objectives,
            splittable,
        )
    }

    /// Wrap `actions` with the configured ordering.
    pub fn quest(&self, actions: Vec<Action>) -> Result<Quest, QuestError> {
        Quest::new(actions, self.ctx.config.ordering)
    }

    pub fn epsilon(&self) -> Result<Quest, QuestError> {
        Ok(Quest::epsilon(self.child_depth()))
    }

    /// Delegate the whole request to a random motivation strategy.
    pub fn subquest(&mut self) -> Result<Quest, QuestError> {
        let registry = self.ctx.registry;
        match registry.random(self.ctx.rng) {
            Some(executor) => executor.generate(self.ctx, self.request),
            None => self.epsilon(),
        }
    }
}

/// Read-only table of executors, keyed by motivation and by verb.
#[derive(Clone, Default)]
pub struct ExecutorRegistry {
    strategies: BTreeMap<Motivation, Vec<Arc<dyn Executor>>>,
    verbs: BTreeMap<ActionType, Vec<Arc<dyn Executor>>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalogue.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for (motivation, strategy) in crate::core::strategies::MOTIVATION_STRATEGIES {
            registry = registry.with_strategy(*motivation, *strategy);
        }
        for (verb, strategy) in crate::core::strategies::VERB_EXPANSIONS {
            registry = registry.with_verb(*verb, *strategy);
        }
        registry
    }

    pub fn with_strategy<E: Executor + 'static>(mut self, motivation: Motivation, executor: E) -> Self {
        self.strategies
            .entry(motivation)
            .or_default()
            .push(Arc::new(executor));
        self
    }

    pub fn with_verb<E: Executor + 'static>(mut self, verb: ActionType, executor: E) -> Self {
        self.verbs.entry(verb).or_default().push(Arc::new(executor));
        self
    }

    pub fn by_motivation(&self, motivation: Motivation) -> &[Arc<dyn Executor>] {
        self.strategies
            .get(&motivation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn random_by_motivation(
        &self,
        motivation: Motivation,
        rng: &mut StdRng,
    ) -> Option<&Arc<dyn Executor>> {
        self.by_motivation(motivation).choose(rng)
    }

    /// Uniform over every motivation strategy.
    pub fn random(&self, rng: &mut StdRng) -> Option<&Arc<dyn Executor>> {
        let all: Vec<&Arc<dyn Executor>> = self.strategies.values().flatten().collect();
        all.choose(rng).copied()
    }

    /// Uniform among the expansions registered for `verb`.
    pub fn for_verb(&self, verb: ActionType, rng: &mut StdRng) -> Option<&Arc<dyn Executor>> {
        self.verbs.get(&verb)?.choose(rng)
    }

    pub fn strategies(&self) -> impl Iterator<Item = (Motivation, &Arc<dyn Executor>)> {
        self.strategies
            .iter()
            .flat_map(|(m, list)| list.iter().map(move |e| (*m, e)))
    }

    pub fn verbs(&self) -> impl Iterator<Item = (ActionType, &Arc<dyn Executor>)> {
        self.verbs
            .iter()
            .flat_map(|(v, list)| list.iter().map(move |e| (*v, e)))
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.values().map(Vec::len).sum()
    }
}

impl fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategies: Vec<String> = self
            .strategies()
            .map(|(m, e)| format!("{}:{}", m, e.tag()))
            .collect();
        let verbs: Vec<String> = self
            .verbs()
            .map(|(v, e)| format!("{}:{}", v, e.tag()))
            .collect();
        f.debug_struct("ExecutorRegistry")
            .field("strategies", &strategies)
            .field("verbs", &verbs)
            .finish()
    }
}
