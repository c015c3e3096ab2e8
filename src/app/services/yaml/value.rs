use std::collections::HashMap;

use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

use crate::app::infrastructure::error::Result;

/// Resolved type of a scalar, used for key ordering and null placeholders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarKind {
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    String,
}

/// A scalar as written in the file plus its resolved type.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub text: String,
    pub kind: ScalarKind,
}

impl Scalar {
    pub fn new(text: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(text, ScalarKind::String)
    }

    /// Resolve a plain (unquoted, untagged) scalar the way a YAML 1.2 core
    /// schema loader would. Integers wider than 64 bits become floats.
    pub fn plain(text: &str) -> Self {
        Self::new(text, resolve_plain(text))
    }
}

fn resolve_plain(text: &str) -> ScalarKind {
    // Document markers would parse as an empty document
    if text.starts_with("---") || text.starts_with("...") {
        return ScalarKind::String;
    }
    match serde_yaml::from_str::<serde_yaml::Value>(text) {
        Ok(serde_yaml::Value::Null) => ScalarKind::Null,
        Ok(serde_yaml::Value::Bool(b)) => ScalarKind::Bool(b),
        Ok(serde_yaml::Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                ScalarKind::Int(i as i128)
            } else if let Some(u) = n.as_u64() {
                ScalarKind::Int(u as i128)
            } else {
                n.as_f64().map_or(ScalarKind::String, ScalarKind::Float)
            }
        }
        Ok(_) => ScalarKind::String,
        Err(_) => match text.parse::<f64>() {
            Ok(f) if f.is_finite() => ScalarKind::Float(f),
            _ => ScalarKind::String,
        },
    }
}

/// Parsed YAML node. Tags are dropped and aliases expanded.
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    Scalar(Scalar),
    Sequence(Vec<YamlValue>),
    /// Entries in document order.
    Mapping(Vec<(YamlValue, YamlValue)>),
}

impl YamlValue {
    pub fn string(text: impl Into<String>) -> Self {
        Self::Scalar(Scalar::string(text))
    }

    pub fn plain(text: &str) -> Self {
        Self::Scalar(Scalar::plain(text))
    }

    pub fn kind(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(scalar) => Some(scalar.kind),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind() == Some(ScalarKind::Null)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// True for sequences and mappings with at least one element.
    pub fn is_nonempty_collection(&self) -> bool {
        match self {
            Self::Sequence(items) => !items.is_empty(),
            Self::Mapping(entries) => !entries.is_empty(),
            Self::Scalar(_) => false,
        }
    }

    /// Single-line text of a node. Collections use YAML flow style.
    pub fn flow_text(&self) -> String {
        match self {
            Self::Scalar(scalar) => scalar.text.clone(),
            Self::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.flow_text()).collect();
                format!("[{}]", parts.join(", "))
            }
            Self::Mapping(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.flow_text(), v.flow_text()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
        }
    }
}

/// Parse every document of a stream. A stream with no documents (empty, or
/// only comments) yields an empty list.
pub fn load_documents(text: &str) -> Result<Vec<YamlValue>> {
    let mut builder = TreeBuilder::default();
    Parser::new_from_str(text).load(&mut builder, true)?;
    Ok(builder.documents)
}

enum Frame {
    Sequence(Vec<YamlValue>, usize),
    Mapping(Vec<(YamlValue, YamlValue)>, Option<YamlValue>, usize),
}

#[derive(Default)]
struct TreeBuilder {
    documents: Vec<YamlValue>,
    stack: Vec<Frame>,
    anchors: HashMap<usize, YamlValue>,
}

impl TreeBuilder {
    fn insert(&mut self, node: YamlValue, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
        match self.stack.last_mut() {
            None => self.documents.push(node),
            Some(Frame::Sequence(items, _)) => items.push(node),
            Some(Frame::Mapping(entries, pending, _)) => match pending.take() {
                None => *pending = Some(node),
                Some(key) => entries.push((key, node)),
            },
        }
    }
}

impl EventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event) {
        match ev {
            Event::Scalar(text, style, anchor, tag) => {
                // Quoted, block and `!!str` scalars are always strings
                let is_str_tag = tag.as_ref().is_some_and(|t| t.suffix == "str");
                let node = if matches!(style, TScalarStyle::Plain) && !is_str_tag {
                    YamlValue::plain(&text)
                } else {
                    YamlValue::string(text)
                };
                self.insert(node, anchor);
            }
            Event::SequenceStart(anchor, _) => self.stack.push(Frame::Sequence(Vec::new(), anchor)),
            Event::MappingStart(anchor, _) => {
                self.stack.push(Frame::Mapping(Vec::new(), None, anchor))
            }
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence(items, anchor)) => {
                    self.insert(YamlValue::Sequence(items), anchor)
                }
                Some(Frame::Mapping(entries, _, anchor)) => {
                    self.insert(YamlValue::Mapping(entries), anchor)
                }
                None => {}
            },
            Event::Alias(id) => {
                let node = self
                    .anchors
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| YamlValue::Scalar(Scalar::new("~", ScalarKind::Null)));
                self.insert(node, 0);
            }
            _ => {}
        }
    }
}
