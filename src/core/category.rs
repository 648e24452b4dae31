/// Category store — the hierarchical content tree quests draw their targets from.
///
/// Loaded once from an XML source of nested `category` elements holding
/// `element` leaves, then only queried.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use std::path::Path;
use thiserror::Error;

use crate::schema::objective::ObjectiveValue;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("malformed category source: {0}")]
    DataFormat(String),
    #[error("no category matches '{0}'")]
    NoSuchCategory(String),
    #[error("every value reachable from {0:?} is already in use")]
    ExhaustedCategory(Vec<String>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Index of a node in a [`CategoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(usize);

#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub name: String,
    pub parent: Option<CategoryId>,
    pub children: Vec<CategoryId>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: Vec<CategoryNode>,
    roots: Vec<CategoryId>,
}

const CATEGORY: &[u8] = b"category";
const ELEMENT: &[u8] = b"element";
const WILDCARD: &str = "*";

impl CategoryTree {
    pub fn load_from_xml(path: &Path) -> Result<CategoryTree, CategoryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_xml(&contents)
    }

    pub fn parse_xml(input: &str) -> Result<CategoryTree, CategoryError> {
        let mut reader = Reader::from_str(input);
        reader.trim_text(true);

        let mut tree = CategoryTree::default();
        let mut open: Vec<CategoryId> = Vec::new();
        // Depth of non-category wrapper elements (the document root).
        let mut wrappers = 0usize;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.name().as_ref() {
                    CATEGORY => {
                        let id = tree.open_category(&e, open.last().copied())?;
                        open.push(id);
                    }
                    ELEMENT => {
                        tree.add_element(&e, open.last().copied())?;
                        // Consume up to the matching end tag; leaves carry no children.
                        reader.read_to_end(e.name())?;
                    }
                    _ => {
                        if !open.is_empty() {
                            return Err(CategoryError::DataFormat(format!(
                                "unexpected <{}> inside category '{}'",
                                String::from_utf8_lossy(e.name().as_ref()),
                                tree.full_path(open[open.len() - 1])
                            )));
                        }
                        wrappers += 1;
                    }
                },
                Event::Empty(e) => match e.name().as_ref() {
                    CATEGORY => {
                        tree.open_category(&e, open.last().copied())?;
                    }
                    ELEMENT => tree.add_element(&e, open.last().copied())?,
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    CATEGORY => {
                        if open.pop().is_none() {
                            return Err(CategoryError::DataFormat(
                                "closing </category> without an open category".to_string(),
                            ));
                        }
                    }
                    _ => {
                        if !open.is_empty() {
                            return Err(CategoryError::DataFormat(format!(
                                "category '{}' is not closed",
                                tree.full_path(open[open.len() - 1])
                            )));
                        }
                        wrappers = wrappers.saturating_sub(1);
                    }
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(id) = open.last() {
            return Err(CategoryError::DataFormat(format!(
                "category '{}' is not closed",
                tree.full_path(*id)
            )));
        }
        if wrappers != 0 {
            return Err(CategoryError::DataFormat("unclosed document element".to_string()));
        }

        Ok(tree)
    }

    fn open_category(
        &mut self,
        e: &BytesStart<'_>,
        parent: Option<CategoryId>,
    ) -> Result<CategoryId, CategoryError> {
        let name = value_attribute(e)?.ok_or_else(|| {
            CategoryError::DataFormat("category without a 'value' attribute".to_string())
        })?;
        if name.is_empty() || name.contains('/') || name == WILDCARD {
            return Err(CategoryError::DataFormat(format!(
                "invalid category name '{}'",
                name
            )));
        }

        let siblings = match parent {
            Some(p) => &self.nodes[p.0].children,
            None => &self.roots,
        };
        if siblings.iter().any(|s| self.nodes[s.0].name == name) {
            let at = parent.map(|p| self.full_path(p)).unwrap_or_default();
            return Err(CategoryError::DataFormat(format!(
                "duplicate category '{}' under '{}'",
                name, at
            )));
        }

        let id = CategoryId(self.nodes.len());
        self.nodes.push(CategoryNode {
            name,
            parent,
            children: Vec::new(),
            values: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    fn add_element(
        &mut self,
        e: &BytesStart<'_>,
        parent: Option<CategoryId>,
    ) -> Result<(), CategoryError> {
        let parent = parent.ok_or_else(|| {
            CategoryError::DataFormat("element outside of any category".to_string())
        })?;
        let value = value_attribute(e)?.ok_or_else(|| {
            CategoryError::DataFormat(format!(
                "element without a 'value' attribute in '{}'",
                self.full_path(parent)
            ))
        })?;
        let values = &mut self.nodes[parent.0].values;
        if !values.contains(&value) {
            values.push(value);
        }
        Ok(())
    }

    pub fn node(&self, id: CategoryId) -> &CategoryNode {
        &self.nodes[id.0]
    }

    pub fn roots(&self) -> &[CategoryId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Slash-joined names from the root down to `id`.
    pub fn full_path(&self, id: CategoryId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let node = &self.nodes[c.0];
            names.push(node.name.as_str());
            current = node.parent;
        }
        names.reverse();
        names.join("/")
    }

    /// Exact lookup of a wildcard-free path.
    pub fn find(&self, path: &str) -> Option<CategoryId> {
        let mut candidates: &[CategoryId] = &self.roots;
        let mut found = None;
        for segment in path.split('/') {
            let id = *candidates
                .iter()
                .find(|c| self.nodes[c.0].name == segment)?;
            found = Some(id);
            candidates = &self.nodes[id.0].children;
        }
        found
    }

    /// Resolve a slash-separated pattern. A `*` segment stands for the nodes
    /// matched so far plus all of their descendants; any other segment must
    /// match a child name exactly.
    pub fn resolve_path(&self, pattern: &str) -> Result<Vec<CategoryId>, CategoryError> {
        let pattern = pattern.trim_matches('/');
        if pattern.is_empty() {
            return Err(CategoryError::NoSuchCategory(pattern.to_string()));
        }

        // `None` = above the roots.
        let mut current: Vec<Option<CategoryId>> = vec![None];
        for segment in pattern.split('/') {
            let mut next = Vec::new();
            if segment == WILDCARD {
                for c in &current {
                    match c {
                        Some(id) => self.collect_subtree(*id, &mut next),
                        None => {
                            for root in &self.roots {
                                self.collect_subtree(*root, &mut next);
                            }
                        }
                    }
                }
            } else {
                for c in &current {
                    let children = match c {
                        Some(id) => &self.nodes[id.0].children,
                        None => &self.roots,
                    };
                    next.extend(
                        children
                            .iter()
                            .copied()
                            .filter(|child| self.nodes[child.0].name == segment),
                    );
                }
            }
            let mut seen = FxHashSet::default();
            current = next
                .into_iter()
                .filter(|id| seen.insert(*id))
                .map(Some)
                .collect();
            if current.is_empty() {
                return Err(CategoryError::NoSuchCategory(pattern.to_string()));
            }
        }

        Ok(current.into_iter().flatten().collect())
    }

    fn collect_subtree(&self, id: CategoryId, out: &mut Vec<CategoryId>) {
        out.push(id);
        for child in &self.nodes[id.0].children {
            self.collect_subtree(*child, out);
        }
    }

    /// Every leaf value held by the nodes `pattern` resolves to.
    pub fn leaves(&self, pattern: &str) -> Result<Vec<ObjectiveValue>, CategoryError> {
        let mut out = Vec::new();
        for id in self.resolve_path(pattern)? {
            let path = self.full_path(id);
            out.extend(
                self.nodes[id.0]
                    .values
                    .iter()
                    .map(|v| ObjectiveValue::new(v.clone(), path.clone())),
            );
        }
        Ok(out)
    }

    /// Pick one leaf uniformly from the concatenated pools of `patterns`,
    /// skipping any whose value is in `exclude`.
    pub fn pick_random<S: AsRef<str>>(
        &self,
        patterns: &[S],
        exclude: &FxHashSet<String>,
        rng: &mut StdRng,
    ) -> Result<ObjectiveValue, CategoryError> {
        let mut pool: Vec<ObjectiveValue> = Vec::new();
        for pattern in patterns {
            for leaf in self.leaves(pattern.as_ref())? {
                if !exclude.contains(&leaf.value) && !pool.contains(&leaf) {
                    pool.push(leaf);
                }
            }
        }

        match pool.choose(rng) {
            Some(value) => Ok(value.clone()),
            None => {
                let patterns: Vec<String> =
                    patterns.iter().map(|p| p.as_ref().to_string()).collect();
                tracing::debug!(?patterns, excluded = exclude.len(), "category pool exhausted");
                Err(CategoryError::ExhaustedCategory(patterns))
            }
        }
    }
}

fn value_attribute(e: &BytesStart<'_>) -> Result<Option<String>, CategoryError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == b"value" {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<strings>
    <category value="pnj">
        <category value="beast">
            <category value="pests">
                <element value="Wolf"/>
                <element value="Bandit"/>
            </category>
            <element value="Bear"/>
        </category>
        <category value="being">
            <element value="Mira"/>
        </category>
    </category>
    <category value="area">
        <category value="place">
            <element value="Mill"/>
        </category>
    </category>
</strings>"#;

    fn sample() -> CategoryTree {
        CategoryTree::parse_xml(SAMPLE).unwrap()
    }

    #[test]
    fn parse_builds_hierarchy() {
        let tree = sample();
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.len(), 6);
        let pests = tree.find("pnj/beast/pests").unwrap();
        assert_eq!(tree.full_path(pests), "pnj/beast/pests");
        assert_eq!(tree.node(pests).values, vec!["Wolf", "Bandit"]);
    }

    #[test]
    fn literal_path_resolves_single_node() {
        let tree = sample();
        let ids = tree.resolve_path("pnj/being").unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(tree.full_path(ids[0]), "pnj/being");
    }

    #[test]
    fn trailing_wildcard_includes_subtree() {
        let tree = sample();
        let leaves = tree.leaves("pnj/beast/*").unwrap();
        let values: Vec<&str> = leaves.iter().map(|l| l.value.as_str()).collect();
        assert_eq!(values, vec!["Bear", "Wolf", "Bandit"]);
        assert_eq!(leaves[1].path, "pnj/beast/pests");
        assert_eq!(leaves[0].path, "pnj/beast");
    }

    #[test]
    fn embedded_wildcard() {
        let tree = sample();
        let ids = tree.resolve_path("pnj/*/pests").unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(tree.full_path(ids[0]), "pnj/beast/pests");
    }

    #[test]
    fn leading_wildcard_matches_everything() {
        let tree = sample();
        assert_eq!(tree.resolve_path("*").unwrap().len(), tree.len());
    }

    #[test]
    fn wildcard_with_suffix_is_literal() {
        let tree = sample();
        assert!(matches!(
            tree.resolve_path("pnj/be*"),
            Err(CategoryError::NoSuchCategory(_))
        ));
    }

    #[test]
    fn unknown_path_is_an_error() {
        let tree = sample();
        assert!(matches!(
            tree.resolve_path("object/luxury/*"),
            Err(CategoryError::NoSuchCategory(p)) if p == "object/luxury/*"
        ));
        assert!(tree.resolve_path("").is_err());
    }

    #[test]
    fn pick_random_respects_exclusion() {
        let tree = sample();
        let mut rng = StdRng::seed_from_u64(7);
        let exclude: FxHashSet<String> = ["Wolf".to_string()].into_iter().collect();
        for _ in 0..20 {
            let v = tree
                .pick_random(&["pnj/beast/pests/*"], &exclude, &mut rng)
                .unwrap();
            assert_eq!(v.value, "Bandit");
        }
    }

    #[test]
    fn pick_random_concatenates_pools() {
        let tree = sample();
        let mut rng = StdRng::seed_from_u64(3);
        let exclude: FxHashSet<String> =
            ["Wolf".to_string(), "Bandit".to_string()].into_iter().collect();
        let v = tree
            .pick_random(&["pnj/beast/pests/*", "area/place/*"], &exclude, &mut rng)
            .unwrap();
        assert_eq!(v, ObjectiveValue::new("Mill", "area/place"));
    }

    #[test]
    fn pick_random_exhausted() {
        let tree = sample();
        let mut rng = StdRng::seed_from_u64(1);
        let exclude: FxHashSet<String> = ["Mira".to_string()].into_iter().collect();
        assert!(matches!(
            tree.pick_random(&["pnj/being/*"], &exclude, &mut rng),
            Err(CategoryError::ExhaustedCategory(_))
        ));
    }

    #[test]
    fn element_outside_category_fails() {
        let src = r#"<strings><element value="Stray"/></strings>"#;
        assert!(matches!(
            CategoryTree::parse_xml(src),
            Err(CategoryError::DataFormat(_))
        ));
    }

    #[test]
    fn unclosed_category_fails() {
        let src = r#"<strings><category value="pnj"><element value="Mira"/></strings>"#;
        assert!(CategoryTree::parse_xml(src).is_err());
    }

    #[test]
    fn duplicate_siblings_fail() {
        let src = r#"<strings>
            <category value="pnj"></category>
            <category value="pnj"></category>
        </strings>"#;
        assert!(matches!(
            CategoryTree::parse_xml(src),
            Err(CategoryError::DataFormat(msg)) if msg.contains("duplicate")
        ));
    }

    #[test]
    fn category_without_name_fails() {
        let src = r#"<strings><category><element value="x"/></category></strings>"#;
        assert!(CategoryTree::parse_xml(src).is_err());
    }

    #[test]
    fn duplicate_values_collapse() {
        let src = r#"<strings><category value="pnj">
            <element value="Mira"/><element value="Mira"/>
        </category></strings>"#;
        let tree = CategoryTree::parse_xml(src).unwrap();
        assert_eq!(tree.leaves("pnj").unwrap().len(), 1);
    }
}
