/// The quest generator: motivation → strategy → action tree.
///
/// Wires together the category store, the executor registry, the
/// configuration and the description templates.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::category::{CategoryError, CategoryTree};
use crate::core::config::{ConfigError, GeneratorConfig};
use crate::core::describe::{DescriptionError, DescriptionSet};
use crate::core::executor::{Executor, ExecutorRegistry, GenContext, Request};
use crate::core::quest::{Action, Quest, QuestError};
use crate::schema::motivation::Motivation;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("category error: {0}")]
    Category(#[from] CategoryError),
    #[error("quest error: {0}")]
    Quest(#[from] QuestError),
    #[error("description error: {0}")]
    Description(#[from] DescriptionError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no strategy registered for motivation {0}")]
    NoStrategy(Motivation),
    #[error("the executor registry holds no strategy")]
    EmptyRegistry,
}

/// The top-level quest generator. Built via `QuestGenerator::builder()`.
pub struct QuestGenerator {
    categories: CategoryTree,
    registry: ExecutorRegistry,
    config: GeneratorConfig,
    descriptions: DescriptionSet,
    seed: u64,
    generation_count: u64,
}

/// Builder for constructing a `QuestGenerator`.
pub struct QuestGeneratorBuilder {
    categories_path: Option<PathBuf>,
    descriptions_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    seed: u64,
    /// Directly provided categories (for testing without files).
    categories: Option<CategoryTree>,
    /// Directly provided descriptions (for testing without files).
    descriptions: Option<DescriptionSet>,
    config: Option<GeneratorConfig>,
    registry: Option<ExecutorRegistry>,
}

impl QuestGenerator {
    pub fn builder() -> QuestGeneratorBuilder {
        QuestGeneratorBuilder {
            categories_path: None,
            descriptions_path: None,
            config_path: None,
            seed: 0,
            categories: None,
            descriptions: None,
            config: None,
            registry: None,
        }
    }

    /// Generate a quest from a strategy picked uniformly among all of them.
    pub fn create_random_quest(&mut self, depth: u32) -> Result<Quest, GeneratorError> {
        let mut rng = self.next_rng();
        let executor = self
            .registry
            .random(&mut rng)
            .ok_or(GeneratorError::EmptyRegistry)?;
        self.run(executor.as_ref(), None, depth, &mut rng)
    }

    /// Generate a quest for `motivation`, picking uniformly among its
    /// strategies.
    pub fn create_by_motivation(
        &mut self,
        motivation: Motivation,
        depth: u32,
    ) -> Result<Quest, GeneratorError> {
        let mut rng = self.next_rng();
        let executor = self
            .registry
            .random_by_motivation(motivation, &mut rng)
            .ok_or(GeneratorError::NoStrategy(motivation))?;
        self.run(executor.as_ref(), Some(motivation), depth, &mut rng)
    }

    fn next_rng(&mut self) -> StdRng {
        let rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.generation_count));
        self.generation_count += 1;
        rng
    }

    fn run(
        &self,
        executor: &dyn Executor,
        motivation: Option<Motivation>,
        depth: u32,
        rng: &mut StdRng,
    ) -> Result<Quest, GeneratorError> {
        let depth = self.config.clamp_depth(depth);
        let mut ctx = GenContext {
            categories: &self.categories,
            registry: &self.registry,
            config: &self.config,
            rng,
        };

        match executor.generate(&mut ctx, &Request::root(depth)) {
            Ok(quest) => {
                tracing::info!(
                    strategy = executor.tag(),
                    motivation = motivation.map(|m| m.name()).unwrap_or("random"),
                    depth,
                    actions = quest.total_actions(),
                    "generated quest"
                );
                Ok(quest)
            }
            Err(e) => {
                tracing::warn!(strategy = executor.tag(), depth, error = %e, "quest generation failed");
                Err(e.into())
            }
        }
    }

    pub fn categories(&self) -> &CategoryTree {
        &self.categories
    }

    pub fn registry(&self) -> &ExecutorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn descriptions(&self) -> &DescriptionSet {
        &self.descriptions
    }

    pub fn describe(&self, action: &Action) -> String {
        self.descriptions.describe(action)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the quest sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.generation_count = 0;
    }
}

impl QuestGeneratorBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn categories(mut self, path: impl AsRef<Path>) -> Self {
        self.categories_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_categories(mut self, categories: CategoryTree) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn descriptions(mut self, path: impl AsRef<Path>) -> Self {
        self.descriptions_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_descriptions(mut self, descriptions: DescriptionSet) -> Self {
        self.descriptions = Some(descriptions);
        self
    }

    pub fn config(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the built-in strategy catalogue.
    pub fn with_registry(mut self, registry: ExecutorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<QuestGenerator, GeneratorError> {
        let categories = match (self.categories, self.categories_path) {
            (Some(tree), _) => tree,
            (None, Some(path)) => CategoryTree::load_from_xml(&path)?,
            (None, None) => CategoryTree::default(),
        };

        // Files given by path override the built-in templates verb by verb.
        let mut descriptions = match self.descriptions {
            Some(set) => set,
            None => DescriptionSet::builtin()?,
        };
        if let Some(path) = self.descriptions_path {
            descriptions.merge(DescriptionSet::load_from_ron(&path)?);
        }

        let config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => GeneratorConfig::load_from_ron(&path)?,
            (None, None) => GeneratorConfig::default(),
        };

        let registry = self.registry.unwrap_or_else(ExecutorRegistry::standard);

        tracing::debug!(
            categories = categories.len(),
            strategies = registry.strategy_count(),
            templates = descriptions.templates.len(),
            seed = self.seed,
            "quest generator ready"
        );

        Ok(QuestGenerator {
            categories,
            registry,
            config,
            descriptions,
            seed: self.seed,
            generation_count: 0,
        })
    }
}
