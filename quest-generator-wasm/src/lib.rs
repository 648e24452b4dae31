//! WASM bindings for quest-generator — powers the interactive web demo.

use wasm_bindgen::prelude::*;

use quest_generator::core::category::CategoryTree;
use quest_generator::core::describe::DescriptionSet;
use quest_generator::core::export::{to_text, to_xml_string};
use quest_generator::core::generator::QuestGenerator;
use quest_generator::core::quest::{Action, Quest};
use quest_generator::schema::action_type::ActionType;
use quest_generator::schema::event::GameEvent;
use quest_generator::schema::motivation::Motivation;
use quest_generator::schema::objective::ObjectiveValue;

// ---------------------------------------------------------------------------
// Embedded content — compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const CATEGORIES: &str = include_str!("../../data/categories.xml");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Deserialize)]
struct EventInput {
    verb: String,
    values: Vec<ObjectiveValue>,
}

#[derive(serde::Serialize)]
struct ActionInfo {
    path: String,
    verb: String,
    description: String,
    done: bool,
    /// Values of the event that completes this action, in slot order.
    event: Vec<ObjectiveValue>,
}

#[derive(serde::Serialize)]
struct Progress {
    done: bool,
    total: usize,
    completed: usize,
    current: Option<ActionInfo>,
}

#[wasm_bindgen]
pub struct QuestDemo {
    generator: QuestGenerator,
    quest: Option<Quest>,
}

#[wasm_bindgen]
impl QuestDemo {
    /// Create a demo over the bundled categories and descriptions.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<QuestDemo, JsError> {
        let categories = CategoryTree::parse_xml(data::CATEGORIES)
            .map_err(|e| JsError::new(&format!("Category parse error: {e}")))?;
        let descriptions = DescriptionSet::builtin()
            .map_err(|e| JsError::new(&format!("Description parse error: {e}")))?;

        let generator = QuestGenerator::builder()
            .seed(seed)
            .with_categories(categories)
            .with_descriptions(descriptions)
            .build()
            .map_err(|e| JsError::new(&format!("Generator build error: {e}")))?;

        Ok(QuestDemo {
            generator,
            quest: None,
        })
    }

    /// Generate a quest for a motivation name (e.g. "comfort") and make it
    /// the current one. Returns its text outline.
    pub fn generate(&mut self, motivation: &str, depth: u32) -> Result<String, JsError> {
        let motivation = Motivation::from_name(motivation)
            .ok_or_else(|| JsError::new(&format!("Unknown motivation: {motivation}")))?;
        let quest = self
            .generator
            .create_by_motivation(motivation, depth)
            .map_err(|e| JsError::new(&format!("Generation error: {e}")))?;
        Ok(self.replace(quest))
    }

    /// Generate a quest from any strategy.
    pub fn generate_random(&mut self, depth: u32) -> Result<String, JsError> {
        let quest = self
            .generator
            .create_random_quest(depth)
            .map_err(|e| JsError::new(&format!("Generation error: {e}")))?;
        Ok(self.replace(quest))
    }

    /// Send a gameplay event to the current quest. Returns whether it
    /// completed an action. The event must carry one value per slot of its
    /// verb.
    ///
    /// Expected JSON shape:
    /// ```json
    /// {
    ///   "verb": "GOTO",
    ///   "values": [{ "value": "Smithy", "path": "area/place/job" }]
    /// }
    /// ```
    pub fn event(&mut self, event_json: &str) -> Result<bool, JsError> {
        let input: EventInput = serde_json::from_str(event_json)
            .map_err(|e| JsError::new(&format!("Invalid event JSON: {e}")))?;
        let verb = ActionType::from_name(&input.verb)
            .ok_or_else(|| JsError::new(&format!("Unknown verb: {}", input.verb)))?;
        let event = GameEvent::with_values(verb, input.values).ok_or_else(|| {
            JsError::new(&format!(
                "{} takes {} value(s)",
                verb,
                verb.event_slots().len()
            ))
        })?;
        let quest = self
            .quest
            .as_mut()
            .ok_or_else(|| JsError::new("No quest generated yet"))?;
        Ok(quest.dispatch(&event))
    }

    /// Complete the next doable action. Returns false once the quest is done.
    pub fn step(&mut self) -> bool {
        let Some(quest) = self.quest.as_mut() else {
            return false;
        };
        let Some(action) = quest.current_action() else {
            return false;
        };
        let event = GameEvent::for_action(action);
        quest.dispatch(&event)
    }

    /// JSON progress summary of the current quest.
    pub fn progress(&self) -> Result<String, JsError> {
        let quest = self
            .quest
            .as_ref()
            .ok_or_else(|| JsError::new("No quest generated yet"))?;
        let leaves = quest.leaves();
        let progress = Progress {
            done: quest.is_done(),
            total: leaves.len(),
            completed: leaves.iter().filter(|a| a.is_done()).count(),
            current: quest.current_action().map(|a| self.action_info(a)),
        };
        serde_json::to_string(&progress)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Indented text outline of the current quest.
    pub fn quest_text(&self) -> String {
        self.quest
            .as_ref()
            .map(|q| to_text(q, Some(self.generator.descriptions())))
            .unwrap_or_default()
    }

    pub fn quest_xml(&self) -> Result<String, JsError> {
        match self.quest.as_ref() {
            Some(quest) => to_xml_string(quest)
                .map_err(|e| JsError::new(&format!("Export error: {e}"))),
            None => Ok(String::new()),
        }
    }

    /// Full tree of the current quest as JSON.
    pub fn quest_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.quest)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Restart the quest sequence from a new seed.
    pub fn reset(&mut self, seed: u64) {
        self.generator.reseed(seed);
        self.quest = None;
    }

    /// Return JSON array of motivation names.
    pub fn motivations() -> String {
        let names: Vec<String> = Motivation::ALL
            .iter()
            .map(|m| m.name().to_lowercase())
            .collect();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }

    /// Return JSON array of verbs that carry gameplay events.
    pub fn verbs() -> String {
        let names: Vec<&str> = ActionType::ALL
            .iter()
            .filter(|v| !v.event_slots().is_empty())
            .map(|v| v.name())
            .collect();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }
}

// Private helpers
impl QuestDemo {
    fn replace(&mut self, quest: Quest) -> String {
        let text = to_text(&quest, Some(self.generator.descriptions()));
        self.quest = Some(quest);
        text
    }

    fn action_info(&self, action: &Action) -> ActionInfo {
        ActionInfo {
            path: action.path().to_string(),
            verb: action.action_type().name().to_string(),
            description: self.generator.describe(action),
            done: action.is_done(),
            event: GameEvent::for_action(action)
                .payload
                .into_iter()
                .map(|(_, value)| value)
                .collect(),
        }
    }
}
