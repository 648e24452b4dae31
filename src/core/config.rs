/// Generator configuration, loaded from RON or built in code.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::quest::Action;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// How the actions of one quest may be completed relative to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderingPolicy {
    /// An action is doable once every earlier sibling is done.
    #[default]
    Sequential,
    /// Any action may be completed at any time.
    Unordered,
}

impl OrderingPolicy {
    pub fn allows(&self, siblings: &[Action], index: usize) -> bool {
        match self {
            Self::Sequential => siblings[..index.min(siblings.len())]
                .iter()
                .all(|a| a.is_done()),
            Self::Unordered => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Upper bound applied to every requested depth.
    pub max_depth: u32,
    /// Depth used by front-ends when the caller gives none.
    pub default_depth: u32,
    pub ordering: OrderingPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            default_depth: 3,
            ordering: OrderingPolicy::Sequential,
        }
    }
}

impl GeneratorConfig {
    pub fn load_from_ron(path: &Path) -> Result<GeneratorConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<GeneratorConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    pub fn clamp_depth(&self, depth: u32) -> u32 {
        depth.min(self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = GeneratorConfig::default();
        assert_eq!(cfg.max_depth, 3);
        assert_eq!(cfg.default_depth, 3);
        assert_eq!(cfg.ordering, OrderingPolicy::Sequential);
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let cfg = GeneratorConfig::parse_ron("(max_depth: 5)").unwrap();
        assert_eq!(cfg.max_depth, 5);
        assert_eq!(cfg.default_depth, 3);
    }

    #[test]
    fn ordering_from_ron() {
        let cfg = GeneratorConfig::parse_ron("(ordering: Unordered)").unwrap();
        assert_eq!(cfg.ordering, OrderingPolicy::Unordered);
    }

    #[test]
    fn clamp() {
        let cfg = GeneratorConfig::default();
        assert_eq!(cfg.clamp_depth(7), 3);
        assert_eq!(cfg.clamp_depth(2), 2);
    }

    #[test]
    fn shipped_config_is_the_default() {
        let cfg = GeneratorConfig::load_from_ron(Path::new("data/config.ron")).unwrap();
        assert_eq!(cfg, GeneratorConfig::default());
    }

    #[test]
    fn load_fixture() {
        let cfg = GeneratorConfig::load_from_ron(Path::new("tests/fixtures/config.ron")).unwrap();
        assert_eq!(cfg.max_depth, 2);
        assert_eq!(cfg.default_depth, 3);
        assert_eq!(cfg.ordering, OrderingPolicy::Unordered);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            GeneratorConfig::load_from_ron(Path::new("tests/fixtures/nope.ron")),
            Err(ConfigError::Io(_))
        ));
    }
}
