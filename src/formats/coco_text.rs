//! COCO-Text JSON reader.
//!
//! Structurally identical to COCO, but each annotation carries recognized
//! text instead of a category reference. The label comes from the first
//! present of `transcription`, `utf8_string`, `text`, `label`, coerced to a
//! string; an empty transcription leaves the label unset.

use serde_json::Value;

use super::coco::image_entries;
use super::value::{annotation_id, bbox_xywh, coerce_string, coerce_u64, field};
use crate::model::{AnnotationBox, AnnotationFormat, ImageId, ParseResult};

/// Precedence order for the transcription-style label fields.
const LABEL_FIELDS: [&str; 4] = ["transcription", "utf8_string", "text", "label"];

/// Parses an already-decoded COCO-Text document.
pub fn parse(parsed: &Value) -> ParseResult {
    let annotations = field(parsed, "annotations")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let boxes = annotations
        .iter()
        .enumerate()
        .map(|(index, ann)| {
            let [x, y, w, h] = bbox_xywh(ann);
            let mut bx = AnnotationBox::new(annotation_id(ann, index), x, y, w, h);
            bx.label = transcription(ann);
            bx.image_id = field(ann, "image_id").and_then(coerce_u64).map(ImageId::new);
            bx
        })
        .collect();

    ParseResult::new(AnnotationFormat::CocoText, boxes).with_images(image_entries(parsed))
}

fn transcription(ann: &Value) -> Option<String> {
    LABEL_FIELDS
        .iter()
        .find_map(|key| field(ann, key).and_then(coerce_string))
        .filter(|text| !text.is_empty())
}
