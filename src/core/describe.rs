/// Per-verb action descriptions — template parsing, loading, and rendering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::core::quest::Action;
use crate::schema::action_type::ActionType;
use crate::schema::objective::ObjectiveType;

const BUILTIN: &str = include_str!("../../data/descriptions.ron");

#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("template parse error: {0}")]
    TemplateParse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateSegment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// Value of an objective slot: `{obj_get}`.
    Slot(ObjectiveType),
    /// Category path of an objective slot: `{obj_get.path}`.
    SlotPath(ObjectiveType),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

impl Template {
    /// Parse a template string into a sequence of segments.
    ///
    /// Syntax:
    /// - `{slot}` → `Slot`, slot names in lower case (`objective`, `loc_objective`, ...)
    /// - `{slot.path}` → `SlotPath`
    /// - `{{` / `}}` → literal braces
    /// - Everything else → `Literal`
    pub fn parse(input: &str) -> Result<Template, DescriptionError> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            match chars[i] {
                '{' if i + 1 < len && chars[i + 1] == '{' => {
                    literal_buf.push('{');
                    i += 2;
                }
                '{' => {
                    if !literal_buf.is_empty() {
                        segments.push(TemplateSegment::Literal(std::mem::take(&mut literal_buf)));
                    }

                    let start = i + 1;
                    let mut end = start;
                    while end < len && chars[end] != '}' {
                        if chars[end] == '{' {
                            return Err(DescriptionError::TemplateParse(
                                "nested braces are not allowed".to_string(),
                            ));
                        }
                        end += 1;
                    }
                    if end == len {
                        return Err(DescriptionError::TemplateParse("unclosed brace".to_string()));
                    }

                    let content: String = chars[start..end].iter().collect();
                    if content.is_empty() {
                        return Err(DescriptionError::TemplateParse("empty braces".to_string()));
                    }
                    segments.push(Self::parse_segment(&content)?);
                    i = end + 1;
                }
                '}' if i + 1 < len && chars[i + 1] == '}' => {
                    literal_buf.push('}');
                    i += 2;
                }
                '}' => {
                    return Err(DescriptionError::TemplateParse(
                        "unmatched closing brace".to_string(),
                    ));
                }
                c => {
                    literal_buf.push(c);
                    i += 1;
                }
            }
        }

        if !literal_buf.is_empty() {
            segments.push(TemplateSegment::Literal(literal_buf));
        }

        Ok(Template { segments })
    }

    fn parse_segment(content: &str) -> Result<TemplateSegment, DescriptionError> {
        let (name, path) = match content.strip_suffix(".path") {
            Some(name) => (name, true),
            None => (content, false),
        };
        let slot = ObjectiveType::from_name(name).ok_or_else(|| {
            DescriptionError::TemplateParse(format!("unknown slot '{}'", name))
        })?;
        Ok(if path {
            TemplateSegment::SlotPath(slot)
        } else {
            TemplateSegment::Slot(slot)
        })
    }

    pub fn render(&self, action: &Action) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => out.push_str(text),
                TemplateSegment::Slot(slot) => out.push_str(&action.objective(*slot).value),
                TemplateSegment::SlotPath(slot) => out.push_str(&action.objective(*slot).path),
            }
        }
        out
    }
}

/// Description templates keyed by verb.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionSet {
    pub templates: BTreeMap<ActionType, Template>,
}

impl DescriptionSet {
    /// The set shipped with the crate.
    pub fn builtin() -> Result<DescriptionSet, DescriptionError> {
        Self::parse_ron(BUILTIN)
    }

    pub fn load_from_ron(path: &Path) -> Result<DescriptionSet, DescriptionError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a `{ "VERB": "template", ... }` map.
    pub fn parse_ron(input: &str) -> Result<DescriptionSet, DescriptionError> {
        let raw: BTreeMap<String, String> = ron::from_str(input)?;
        let mut templates = BTreeMap::new();
        for (verb, text) in raw {
            let verb = ActionType::from_name(&verb).ok_or_else(|| {
                DescriptionError::TemplateParse(format!("unknown action type '{}'", verb))
            })?;
            templates.insert(verb, Template::parse(&text)?);
        }
        Ok(DescriptionSet { templates })
    }

    /// Templates from `other` replace those for the same verb.
    pub fn merge(&mut self, other: DescriptionSet) {
        self.templates.extend(other.templates);
    }

    pub fn get(&self, verb: ActionType) -> Option<&Template> {
        self.templates.get(&verb)
    }

    /// Formatted description, or the bare form when no template exists.
    pub fn describe(&self, action: &Action) -> String {
        match self.templates.get(&action.action_type()) {
            Some(template) => template.render(action),
            None => action.to_string(),
        }
    }
}
