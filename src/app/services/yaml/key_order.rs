//! Mapping key ordering.
//!
//! Keys are sorted only when they share a scalar type. The type is picked
//! in this order: strings (case-insensitive), integers, numbers (integers
//! and floats compared as floats), booleans. Any other mix keeps the
//! document order.

use std::cmp::Ordering;

use super::value::{ScalarKind, YamlValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    String,
    Int,
    Float,
    Bool,
}

pub fn infer_key_class<'a>(keys: impl Iterator<Item = &'a YamlValue> + Clone) -> Option<KeyClass> {
    let mut keys = keys.peekable();
    keys.peek()?;
    let all = |pred: fn(&YamlValue) -> bool| keys.clone().all(pred);

    if all(|k| matches!(k.kind(), Some(ScalarKind::String))) {
        Some(KeyClass::String)
    } else if all(|k| matches!(k.kind(), Some(ScalarKind::Int(_)))) {
        Some(KeyClass::Int)
    } else if all(|k| matches!(k.kind(), Some(ScalarKind::Int(_) | ScalarKind::Float(_)))) {
        Some(KeyClass::Float)
    } else if all(|k| matches!(k.kind(), Some(ScalarKind::Bool(_)))) {
        Some(KeyClass::Bool)
    } else {
        None
    }
}

fn as_float(kind: Option<ScalarKind>) -> f64 {
    match kind {
        Some(ScalarKind::Int(i)) => i as f64,
        Some(ScalarKind::Float(f)) => f,
        _ => f64::NAN,
    }
}

fn compare(class: KeyClass, a: &YamlValue, b: &YamlValue) -> Ordering {
    match (class, a.kind(), b.kind()) {
        (KeyClass::String, _, _) => a.flow_text().to_lowercase().cmp(&b.flow_text().to_lowercase()),
        (KeyClass::Int, Some(ScalarKind::Int(x)), Some(ScalarKind::Int(y))) => x.cmp(&y),
        (KeyClass::Float, x, y) => as_float(x).total_cmp(&as_float(y)),
        (KeyClass::Bool, Some(ScalarKind::Bool(x)), Some(ScalarKind::Bool(y))) => x.cmp(&y),
        _ => Ordering::Equal,
    }
}

/// Entries in display order. The sort is stable, so keys that compare equal
/// (e.g. `Name` and `name`) stay in document order.
pub fn sorted_entries(entries: &[(YamlValue, YamlValue)]) -> Vec<&(YamlValue, YamlValue)> {
    let mut ordered: Vec<&(YamlValue, YamlValue)> = entries.iter().collect();
    if let Some(class) = infer_key_class(entries.iter().map(|(k, _)| k)) {
        ordered.sort_by(|(a, _), (b, _)| compare(class, a, b));
    }
    ordered
}
