//! Generic/simple JSON reader.
//!
//! Fallback for JSON files that are not COCO-shaped: either a top-level
//! array of box records, or an object exposing one of `boxes`,
//! `annotations`, `objects` (first key holding a non-empty array wins).
//! Produces no image grouping; all boxes land in the implicit ungrouped
//! bucket.

use serde_json::Value;

use super::value::{coerce_f64, coerce_string, field, record_id};
use crate::model::{AnnotationBox, AnnotationFormat, ParseResult};

/// Precedence order for the container keys on object documents.
const CONTAINER_KEYS: [&str; 3] = ["boxes", "annotations", "objects"];

/// Label precedence for box records.
const LABEL_FIELDS: [&str; 3] = ["label", "category", "text"];

/// Parses an already-decoded generic JSON document.
pub fn parse(parsed: &Value) -> ParseResult {
    let items: &[Value] = match parsed {
        Value::Array(items) => items,
        Value::Object(_) => CONTAINER_KEYS
            .iter()
            .find_map(|key| {
                field(parsed, key)
                    .and_then(Value::as_array)
                    .filter(|items| !items.is_empty())
            })
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };

    let boxes = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| normalize(item, index))
        .collect();

    ParseResult::new(AnnotationFormat::Generic, boxes)
}

/// One record. Recognized via a `bbox` array of >= 4 numeric-coercible
/// entries, or via explicit numeric `x`/`y`/`width`/`height` fields;
/// anything else is dropped.
fn normalize(item: &Value, index: usize) -> Option<AnnotationBox> {
    if !item.is_object() {
        return None;
    }

    let geometry = bbox_geometry(item).or_else(|| explicit_geometry(item))?;
    let [x, y, width, height] = geometry;

    let mut bx = AnnotationBox::new(record_id(item, index), x, y, width, height);
    bx.label = LABEL_FIELDS
        .iter()
        .find_map(|key| field(item, key).and_then(coerce_string));
    Some(bx)
}

fn bbox_geometry(item: &Value) -> Option<[f64; 4]> {
    let entries = field(item, "bbox")?.as_array()?;
    if entries.len() < 4 {
        return None;
    }

    let mut out = [0.0; 4];
    for (slot, entry) in out.iter_mut().zip(entries.iter()) {
        *slot = coerce_f64(entry)?;
    }
    Some(out)
}

fn explicit_geometry(item: &Value) -> Option<[f64; 4]> {
    let number = |key: &str| field(item, key).and_then(Value::as_f64);
    Some([
        number("x")?,
        number("y")?,
        number("width")?,
        number("height")?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_array_with_bbox_records() {
        let result = parse(&json!([{"bbox": [1, 2, 3, 4], "label": "x"}]));
        assert_eq!(result.format, AnnotationFormat::Generic);
        assert_eq!(result.boxes.len(), 1);

        let bx = &result.boxes[0];
        assert_eq!((bx.x, bx.y, bx.width, bx.height), (1.0, 2.0, 3.0, 4.0));
        assert_eq!(bx.label.as_deref(), Some("x"));
        assert_eq!(bx.id, "1");
        assert_eq!(bx.image_id, None);
    }

    #[test]
    fn explicit_fields_require_real_numbers() {
        let ok = json!([{"x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0}]);
        assert_eq!(parse(&ok).boxes.len(), 1);

        // numeric strings do not satisfy the explicit-field path
        let strings = json!([{"x": "1", "y": "2", "width": "3", "height": "4"}]);
        assert!(parse(&strings).boxes.is_empty());
    }

    #[test]
    fn first_non_empty_container_key_wins() {
        let doc = json!({
            "boxes": [],
            "annotations": [{"bbox": [0, 0, 1, 1]}],
            "objects": [{"bbox": [9, 9, 9, 9]}, {"bbox": [8, 8, 8, 8]}]
        });
        let result = parse(&doc);
        assert_eq!(result.boxes.len(), 1);
        assert_eq!(result.boxes[0].width, 1.0);
    }

    #[test]
    fn label_precedence_is_label_category_text() {
        let doc = json!([
            {"bbox": [0, 0, 1, 1], "category": "c", "text": "t"},
            {"bbox": [0, 0, 1, 1], "text": "t"}
        ]);
        let result = parse(&doc);
        assert_eq!(result.boxes[0].label.as_deref(), Some("c"));
        assert_eq!(result.boxes[1].label.as_deref(), Some("t"));
    }

    #[test]
    fn unrecognized_records_are_dropped() {
        let doc = json!([
            42,
            {"bbox": [1, 2, 3]},
            {"bbox": [1, 2, 3, "oops"]},
            {"name": "b7", "bbox": [0, 0, 2, 2]}
        ]);
        let result = parse(&doc);
        assert_eq!(result.boxes.len(), 1);
        assert_eq!(result.boxes[0].id, "b7");
    }

    #[test]
    fn scalar_document_yields_nothing() {
        assert!(parse(&json!("nope")).boxes.is_empty());
        assert!(parse(&json!({"unrelated": 1})).boxes.is_empty());
    }
}
