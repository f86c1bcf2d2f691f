//! Element-wise decoding of collection payloads.
//!
//! A payload must be a JSON array, but one bad element never spoils the rest.
//! Elements that fail to decode become position-less records of their
//! collection, so the pipeline drops them and counts them as malformed.

use log::debug;
use regionmap_core::{
    BusinessRecord, EventRecord, PostRecord, SourceKind, SourceRecord, Visibility,
};
use serde_json::Value;

/// Decode an array of untagged records belonging to `kind`.
pub(crate) fn decode_untagged(kind: SourceKind, values: Vec<Value>) -> Vec<SourceRecord> {
    values
        .into_iter()
        .map(|value| decode_as(kind, &value))
        .collect()
}

/// Decode an array of `kind`-tagged records, keeping those of `kind`.
///
/// Elements without a recognisable tag cannot be attributed to a collection
/// and are skipped.
pub(crate) fn decode_tagged(kind: SourceKind, values: Vec<Value>) -> Vec<SourceRecord> {
    values
        .into_iter()
        .filter(|value| match element_kind(value) {
            Some(tagged) => tagged == kind,
            None => {
                debug!("skipping record without a recognised kind tag");
                false
            }
        })
        .map(|value| decode_as(kind, &value))
        .collect()
}

fn element_kind(value: &Value) -> Option<SourceKind> {
    value
        .get("kind")
        .cloned()
        .and_then(|tag| serde_json::from_value(tag).ok())
}

fn decode_as(kind: SourceKind, value: &Value) -> SourceRecord {
    let decoded = match kind {
        SourceKind::Post => serde_json::from_value(value.clone()).map(SourceRecord::Post),
        SourceKind::Business => serde_json::from_value(value.clone()).map(SourceRecord::Business),
        SourceKind::Event => serde_json::from_value(value.clone()).map(SourceRecord::Event),
    };
    decoded.unwrap_or_else(|error| {
        let record = unplaced(kind, value);
        debug!("{kind} {} could not be decoded: {error}", record.id());
        record
    })
}

/// Keep identity and access tier of an undecodable element, drop the rest.
fn unplaced(kind: SourceKind, value: &Value) -> SourceRecord {
    let id = match value.get("id") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    };
    let visibility = value
        .get("visibility")
        .cloned()
        .and_then(|tier| serde_json::from_value::<Visibility>(tier).ok())
        .unwrap_or_default();
    match kind {
        SourceKind::Post => SourceRecord::Post(PostRecord {
            id,
            visibility,
            ..PostRecord::default()
        }),
        SourceKind::Business => SourceRecord::Business(BusinessRecord {
            id,
            visibility,
            ..BusinessRecord::default()
        }),
        SourceKind::Event => SourceRecord::Event(EventRecord {
            id,
            visibility,
            ..EventRecord::default()
        }),
    }
}
