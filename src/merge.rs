//! Appending frames that share a schema
//!
//! Reassembling a response from cached and fresh frames concatenates the rows of
//! frames with the same shape: same ref id, name, field count, and per-field name,
//! type and labels. Anything else is kept as a separate frame.

use std::collections::HashMap;

use crate::types::frame::DataFrame;

/// Shape of a frame, used to decide whether two frames can be appended
///
/// `refId/fieldCount/name` followed by `|fieldName:type{labels}` per field, e.g.
/// `A/2/Turbine|time:time|value:number{asset="t1"}`. A missing ref id or name is
/// encoded as an empty string.
pub fn schema_key(frame: &DataFrame) -> String {
    let mut key = format!(
        "{}/{}/{}",
        frame.ref_id.as_deref().unwrap_or_default(),
        frame.fields.len(),
        frame.name.as_deref().unwrap_or_default()
    );

    for field in &frame.fields {
        key.push('|');
        key.push_str(&field.name);
        key.push(':');
        key.push_str(field.field_type().as_str());

        if !field.labels.is_empty() {
            let labels: Vec<String> = field
                .labels
                .iter()
                .map(|(name, value)| format!("{name}=\"{value}\""))
                .collect();
            key.push('{');
            key.push_str(&labels.join(", "));
            key.push('}');
        }
    }

    key
}

/// Append the rows of `next` onto matching frames of `prev`
///
/// - Frames with zero rows are dropped from both inputs.
/// - A frame of `next` whose [`schema_key`] matches a frame of `prev` has its rows
///   appended to that frame, in order.
/// - Other frames of `next` are added to the output after the frames of `prev`, and
///   are not themselves appended to.
///
/// Frame order in the output follows `prev`, then the unmatched frames of `next`.
pub fn append_matching_frames(prev: Vec<DataFrame>, next: Vec<DataFrame>) -> Vec<DataFrame> {
    let mut out: Vec<DataFrame> = Vec::with_capacity(prev.len() + next.len());
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for frame in prev.into_iter().filter(|f| !f.is_empty()) {
        // A later frame with the same shape takes over the key
        by_key.insert(schema_key(&frame), out.len());
        out.push(frame);
    }

    for frame in next.into_iter().filter(|f| !f.is_empty()) {
        match by_key.get(&schema_key(&frame)) {
            Some(&index) => {
                let target = &mut out[index];
                for (field, more) in target.fields.iter_mut().zip(&frame.fields) {
                    // Same schema key implies same field types
                    field.values.append(&more.values);
                }
            }
            None => out.push(frame),
        }
    }

    out
}
