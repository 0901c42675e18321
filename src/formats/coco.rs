//! COCO JSON reader.
//!
//! COCO bounding boxes use `[x, y, width, height]` with `(x, y)` as the
//! top-left corner in absolute pixel coordinates, which is also the
//! canonical geometry here, so no coordinate conversion is needed.
//!
//! The reader is tolerant: a missing or malformed `bbox` defaults to
//! `[0, 0, 0, 0]`, a missing annotation `id` falls back to the 1-based
//! index, and category entries without an `id` are ignored.

use std::collections::BTreeMap;

use serde_json::Value;

use super::value::{annotation_id, bbox_xywh, coerce_string, coerce_u64, field};
use crate::model::{AnnotationBox, AnnotationFormat, AnnotationImage, ImageId, ParseResult};

/// Parses an already-decoded COCO document.
pub fn parse(parsed: &Value) -> ParseResult {
    let categories = category_names(parsed);
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

            bx.label = field(ann, "category_id")
                .and_then(coerce_u64)
                .and_then(|id| categories.get(&id).cloned())
                .or_else(|| field(ann, "label").and_then(coerce_string));

            bx.image_id = field(ann, "image_id").and_then(coerce_u64).map(ImageId::new);
            bx
        })
        .collect();

    ParseResult::new(AnnotationFormat::Coco, boxes).with_images(image_entries(parsed))
}

/// Category-id -> name lookup built from the top-level `categories` array.
///
/// Entries without an `id` are ignored; a missing `name` falls back to the
/// stringified category id.
fn category_names(parsed: &Value) -> BTreeMap<u64, String> {
    let mut names = BTreeMap::new();
    let Some(categories) = field(parsed, "categories").and_then(Value::as_array) else {
        return names;
    };

    for cat in categories {
        let Some(id) = field(cat, "id").and_then(coerce_u64) else {
            continue;
        };
        let name = field(cat, "name")
            .and_then(coerce_string)
            .unwrap_or_else(|| id.to_string());
        names.insert(id, name);
    }
    names
}

/// The top-level `images` array, passed through tolerantly.
///
/// Shared with the COCO-Text reader, which carries the identical image
/// list structure.
pub(crate) fn image_entries(parsed: &Value) -> Vec<AnnotationImage> {
    let Some(images) = field(parsed, "images").and_then(Value::as_array) else {
        return Vec::new();
    };

    images
        .iter()
        .filter_map(|img| {
            let id = field(img, "id").and_then(coerce_u64)?;
            let file_name = field(img, "file_name")
                .and_then(coerce_string)
                .unwrap_or_else(|| "image.jpg".to_string());

            let mut entry = AnnotationImage::new(id, file_name);
            entry.width = field(img, "width").and_then(coerce_u64).map(|w| w as u32);
            entry.height = field(img, "height").and_then(coerce_u64).map(|h| h as u32);
            Some(entry)
        })
        .collect()
}
