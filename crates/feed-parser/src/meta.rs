//! Event identifiers and storm names from listing and detail documents.

use std::collections::VecDeque;

use serde_json::Value;

use crate::keys::{lookup, EVENT_ID_KEYS, NAME_KEYS, NAME_LANGUAGE_KEYS};

/// Collect event ids from a listing, in document order without repeats.
///
/// An object carrying an id is not searched further, so nested ids of
/// sub-objects do not leak into the listing.
pub fn extract_event_ids(document: &Value) -> Vec<String> {
    extract_event_entries(document)
        .into_iter()
        .map(|(id, _)| id)
        .collect()
}

/// Like [`extract_event_ids`], paired with the object each id was read from.
pub fn extract_event_entries(document: &Value) -> Vec<(String, &Value)> {
    let mut entries = Vec::new();
    collect_event_entries(document, &mut entries);
    entries
}

fn collect_event_entries<'a>(value: &'a Value, entries: &mut Vec<(String, &'a Value)>) {
    match value {
        Value::Object(map) => {
            if let Some(id) = lookup(map, EVENT_ID_KEYS).and_then(|(_, v)| scalar_text(v)) {
                if !entries.iter().any(|(seen, _)| *seen == id) {
                    entries.push((id, value));
                }
                return;
            }
            for child in map.values() {
                collect_event_entries(child, entries);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_event_entries(item, entries);
            }
        }
        _ => {}
    }
}

/// Find the storm name closest to the document root.
///
/// Name values may be plain strings or language objects such as
/// `{"en": "BUALOI", "ja": "ブアローイ"}`, where English is preferred.
pub fn extract_name(document: &Value) -> Option<String> {
    let mut queue = VecDeque::from([document]);

    while let Some(value) = queue.pop_front() {
        match value {
            Value::Object(map) => {
                if let Some(name) = lookup(map, NAME_KEYS).and_then(|(_, v)| name_text(v)) {
                    return Some(name);
                }
                queue.extend(map.values());
            }
            Value::Array(items) => queue.extend(items),
            _ => {}
        }
    }
    None
}

fn name_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Object(map) => NAME_LANGUAGE_KEYS
            .iter()
            .find_map(|lang| lookup(map, &[*lang]).and_then(|(_, v)| v.as_str()).and_then(non_empty)),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
