/// Quest export: traversal hook, XML writer and reader, indented text.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::convert::Infallible;
use std::io::Write;
use thiserror::Error;

use crate::core::config::OrderingPolicy;
use crate::core::describe::DescriptionSet;
use crate::core::quest::{Action, Quest, QuestError};
use crate::schema::action_type::ActionType;
use crate::schema::objective::{ObjectiveType, ObjectiveValue, Objectives};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed quest document: {0}")]
    Format(String),
}

/// Read-only traversal of a quest tree. Actions are visited in construction
/// order and a child quest is visited before its action is closed.
pub trait QuestVisitor {
    type Error;

    fn enter_quest(&mut self, _quest: &Quest) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_action(&mut self, _action: &Action) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_action(&mut self, _action: &Action) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_quest(&mut self, _quest: &Quest) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Quest {
    pub fn walk<V: QuestVisitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.enter_quest(self)?;
        for action in self.actions() {
            visitor.enter_action(action)?;
            if let Some(child) = action.subquest() {
                child.walk(visitor)?;
            }
            visitor.exit_action(action)?;
        }
        visitor.exit_quest(self)
    }
}

const QUEST: &str = "quest";
const ACTION: &str = "action";
const OBJECTIVES: &str = "objectives";
const OBJECTIVE: &str = "objective";

struct XmlExporter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> QuestVisitor for XmlExporter<W> {
    type Error = ExportError;

    fn enter_quest(&mut self, _quest: &Quest) -> Result<(), ExportError> {
        self.writer.write_event(Event::Start(BytesStart::new(QUEST)))?;
        Ok(())
    }

    fn enter_action(&mut self, action: &Action) -> Result<(), ExportError> {
        let mut start = BytesStart::new(ACTION);
        start.push_attribute(("type", action.action_type().name()));
        self.writer.write_event(Event::Start(start))?;

        self.writer.write_event(Event::Start(BytesStart::new(OBJECTIVES)))?;
        for (slot, value) in action.objectives().iter() {
            let mut objective = BytesStart::new(OBJECTIVE);
            objective.push_attribute(("type", slot.name()));
            objective.push_attribute(("value", value.value.as_str()));
            objective.push_attribute(("path", value.path.as_str()));
            self.writer.write_event(Event::Empty(objective))?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(OBJECTIVES)))?;
        Ok(())
    }

    fn exit_action(&mut self, _action: &Action) -> Result<(), ExportError> {
        self.writer.write_event(Event::End(BytesEnd::new(ACTION)))?;
        Ok(())
    }

    fn exit_quest(&mut self, _quest: &Quest) -> Result<(), ExportError> {
        self.writer.write_event(Event::End(BytesEnd::new(QUEST)))?;
        Ok(())
    }
}

/// Serialize `quest` as an indented XML document.
pub fn write_xml<W: Write>(quest: &Quest, out: W) -> Result<(), ExportError> {
    let mut exporter = XmlExporter {
        writer: Writer::new_with_indent(out, b' ', 2),
    };
    quest.walk(&mut exporter)?;
    exporter.writer.get_mut().flush()?;
    Ok(())
}

pub fn to_xml_string(quest: &Quest) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_xml(quest, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ExportError::Format(e.to_string()))
}

/// Action under construction while reading.
struct PendingAction {
    action_type: ActionType,
    objectives: Objectives,
    subquest: Option<Quest>,
}

/// Rebuild a quest tree from its XML export. Every action comes back
/// undone and quests use sequential ordering.
pub fn read_xml(input: &str) -> Result<Quest, ExportError> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(true);

    let mut quests: Vec<Vec<Action>> = Vec::new();
    let mut pending: Vec<PendingAction> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"quest" => {
                    if root.is_some() {
                        return Err(ExportError::Format("content after the root quest".into()));
                    }
                    quests.push(Vec::new());
                }
                b"action" => pending.push(PendingAction {
                    action_type: action_type_of(&e)?,
                    objectives: Objectives::new(),
                    subquest: None,
                }),
                b"objectives" => {}
                b"objective" => insert_objective(&e, pending.last_mut())?,
                other => return Err(unexpected(other)),
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"action" => {
                    let action = Action::leaf(action_type_of(&e)?, Objectives::new());
                    push_action(&mut quests, action)?;
                }
                b"objective" => insert_objective(&e, pending.last_mut())?,
                b"objectives" => {}
                b"quest" => return Err(quest_error(QuestError::EmptyQuest)),
                other => return Err(unexpected(other)),
            },
            Event::End(e) => match e.name().as_ref() {
                b"quest" => {
                    let actions = quests
                        .pop()
                        .ok_or_else(|| ExportError::Format("unbalanced </quest>".into()))?;
                    let quest =
                        Quest::new(actions, OrderingPolicy::Sequential).map_err(quest_error)?;
                    match pending.last_mut() {
                        Some(action) => action.subquest = Some(quest),
                        None if quests.is_empty() => root = Some(quest),
                        None => {
                            return Err(ExportError::Format(
                                "<quest> nested outside an <action>".into(),
                            ))
                        }
                    }
                }
                b"action" => {
                    let done = pending
                        .pop()
                        .ok_or_else(|| ExportError::Format("unbalanced </action>".into()))?;
                    let action = match done.subquest {
                        Some(quest) => Action::composite(done.action_type, done.objectives, quest),
                        None => Action::leaf(done.action_type, done.objectives),
                    };
                    push_action(&mut quests, action)?;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or_else(|| ExportError::Format("no <quest> element".into()))
}

fn push_action(quests: &mut [Vec<Action>], action: Action) -> Result<(), ExportError> {
    quests
        .last_mut()
        .ok_or_else(|| ExportError::Format("<action> outside of a <quest>".into()))?
        .push(action);
    Ok(())
}

fn quest_error(e: QuestError) -> ExportError {
    ExportError::Format(e.to_string())
}

fn unexpected(name: &[u8]) -> ExportError {
    ExportError::Format(format!("unexpected <{}>", String::from_utf8_lossy(name)))
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, ExportError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required(e: &BytesStart<'_>, key: &str) -> Result<String, ExportError> {
    attribute(e, key)?.ok_or_else(|| {
        ExportError::Format(format!(
            "<{}> without '{}'",
            String::from_utf8_lossy(e.name().as_ref()),
            key
        ))
    })
}

fn action_type_of(e: &BytesStart<'_>) -> Result<ActionType, ExportError> {
    let name = required(e, "type")?;
    ActionType::from_name(&name).ok_or_else(|| ExportError::Format(format!("unknown action type '{}'", name)))
}

fn insert_objective(
    e: &BytesStart<'_>,
    action: Option<&mut PendingAction>,
) -> Result<(), ExportError> {
    let action =
        action.ok_or_else(|| ExportError::Format("<objective> outside of an <action>".into()))?;
    let slot_name = required(e, "type")?;
    let slot = ObjectiveType::from_name(&slot_name)
        .ok_or_else(|| ExportError::Format(format!("unknown objective type '{}'", slot_name)))?;
    let value = ObjectiveValue::new(required(e, "value")?, attribute(e, "path")?.unwrap_or_default());
    action.objectives.insert(slot, value);
    Ok(())
}

struct TextExporter<'a> {
    descriptions: Option<&'a DescriptionSet>,
    lines: Vec<String>,
}

impl QuestVisitor for TextExporter<'_> {
    type Error = Infallible;

    fn enter_action(&mut self, action: &Action) -> Result<(), Infallible> {
        let text = match self.descriptions {
            Some(set) => set.describe(action),
            None => action.to_string(),
        };
        self.lines
            .push(format!("{}{}", "\t".repeat(action.path().level()), text));
        Ok(())
    }
}

/// One line per action, indented one tab per nesting level.
pub fn to_text(quest: &Quest, descriptions: Option<&DescriptionSet>) -> String {
    let mut exporter = TextExporter {
        descriptions,
        lines: Vec::new(),
    };
    match quest.walk(&mut exporter) {
        Ok(()) => exporter.lines.join("\n"),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Quest {
        let child = Quest::new(
            vec![Action::leaf(
                ActionType::Explore,
                Objectives::from([(
                    ObjectiveType::Objective,
                    ObjectiveValue::new("Wolf", "pnj/beast/pests"),
                )]),
            )],
            OrderingPolicy::Sequential,
        )
        .unwrap();
        Quest::new(
            vec![
                Action::composite(
                    ActionType::Goto,
                    Objectives::from([
                        (ObjectiveType::Objective, ObjectiveValue::new("Wolf", "pnj/beast/pests")),
                        (ObjectiveType::Class, ObjectiveValue::new("kill_pests", "")),
                    ]),
                    child,
                ),
                Action::leaf(
                    ActionType::Report,
                    Objectives::from([(
                        ObjectiveType::Objective,
                        ObjectiveValue::new("Mira & co", "pnj/being"),
                    )]),
                ),
            ],
            OrderingPolicy::Sequential,
        )
        .unwrap()
    }

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl QuestVisitor for Trace {
        type Error = Infallible;

        fn enter_quest(&mut self, _quest: &Quest) -> Result<(), Infallible> {
            self.0.push("<q".into());
            Ok(())
        }
        fn enter_action(&mut self, action: &Action) -> Result<(), Infallible> {
            self.0.push(format!("<{}", action.action_type()));
            Ok(())
        }
        fn exit_action(&mut self, action: &Action) -> Result<(), Infallible> {
            self.0.push(format!("{}>", action.action_type()));
            Ok(())
        }
        fn exit_quest(&mut self, _quest: &Quest) -> Result<(), Infallible> {
            self.0.push("q>".into());
            Ok(())
        }
    }

    #[test]
    fn walk_visits_child_before_closing_parent() {
        let mut trace = Trace::default();
        sample().walk(&mut trace).unwrap();
        assert_eq!(
            trace.0,
            vec!["<q", "<GOTO", "<q", "<EXPLORE", "EXPLORE>", "q>", "GOTO>", "<REPORT", "REPORT>", "q>"]
        );
    }

    #[test]
    fn xml_layout() {
        let xml = to_xml_string(&sample()).unwrap();
        assert!(xml.starts_with("<quest>"));
        assert!(xml.contains(r#"<action type="GOTO">"#));
        assert!(xml.contains(r#"<objective type="OBJECTIVE" value="Wolf" path="pnj/beast/pests"/>"#));
        assert!(xml.contains("Mira &amp; co"));
        let goto = xml.find(r#"type="GOTO""#).unwrap();
        let explore = xml.find(r#"type="EXPLORE""#).unwrap();
        let report = xml.find(r#"type="REPORT""#).unwrap();
        assert!(goto < explore && explore < report);
    }

    #[test]
    fn xml_round_trip() {
        let quest = sample();
        let back = read_xml(&to_xml_string(&quest).unwrap()).unwrap();
        assert_eq!(back.len(), 2);
        let goto = &back.actions()[0];
        assert_eq!(goto.objectives(), quest.actions()[0].objectives());
        assert_eq!(
            goto.subquest().unwrap().actions()[0].action_type(),
            ActionType::Explore
        );
        assert_eq!(back.actions()[1].objective(ObjectiveType::Objective).value, "Mira & co");
        assert_eq!(back.actions()[1].path().to_string(), "1");
    }

    #[test]
    fn read_rejects_malformed_documents() {
        assert!(read_xml("<quest></quest>").is_err());
        assert!(read_xml(r#"<quest><action type="FLY"></action></quest>"#).is_err());
        assert!(read_xml(r#"<quest><action type="GOTO"><objectives><objective value="x"/></objectives></action></quest>"#).is_err());
        assert!(read_xml("<list/>").is_err());
        assert!(read_xml("").is_err());
    }

    #[test]
    fn quest_directly_inside_quest_is_rejected() {
        let xml = r#"<quest><action type="GOTO"/><quest><action type="GET"/></quest></quest>"#;
        assert!(matches!(read_xml(xml), Err(ExportError::Format(_))));
    }

    #[test]
    fn text_is_indented_per_level() {
        let text = to_text(&sample(), None);
        assert_eq!(
            text,
            "GOTO OBJECTIVE=Wolf (pnj/beast/pests)\n\
             \tEXPLORE OBJECTIVE=Wolf (pnj/beast/pests)\n\
             REPORT OBJECTIVE=Mira & co (pnj/being)"
        );
    }

    #[test]
    fn text_uses_descriptions() {
        let set = DescriptionSet::parse_ron(r#"{ "REPORT": "Report to {objective}." }"#).unwrap();
        let text = to_text(&sample(), Some(&set));
        assert!(text.ends_with("Report to Mira & co."));
        assert!(text.starts_with("GOTO OBJECTIVE=Wolf"));
    }
}
