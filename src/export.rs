//! Canonical export document writer.
//!
//! The editor's output is re-exported as one COCO-Text-style JSON
//! document: a single synthetic image (id 1) plus one annotation per box
//! carrying `bbox = [x, y, w, h]` and the label under `transcription`
//! (empty string when unset). Export is a no-op when there is no loaded
//! image or the active box set is empty.

use serde::Serialize;

use crate::model::AnnotationBox;

/// Synthetic image id of the export document.
const EXPORT_IMAGE_ID: u64 = 1;

#[derive(Debug, Serialize)]
struct ExportDocument {
    images: Vec<ExportImage>,
    annotations: Vec<ExportAnnotation>,
}

#[derive(Debug, Serialize)]
struct ExportImage {
    id: u64,
    file_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ExportAnnotation {
    id: u64,
    image_id: u64,

    /// `[x, y, width, height]` in natural pixels.
    bbox: [f64; 4],

    transcription: String,
}

/// Serializes the active box set against the loaded image.
///
/// Returns `None` (the caller must not produce a document) when
/// `image_name` is absent or `boxes` is empty. Dimensions of 0 are treated
/// as unknown and omitted.
pub fn export_coco_text(
    boxes: &[AnnotationBox],
    image_name: Option<&str>,
    natural_size: Option<(u32, u32)>,
) -> Option<String> {
    let image_name = image_name?;
    if boxes.is_empty() {
        return None;
    }

    let (width, height) = match natural_size {
        Some((w, h)) => (
            (w > 0).then_some(w),
            (h > 0).then_some(h),
        ),
        None => (None, None),
    };

    let document = ExportDocument {
        images: vec![ExportImage {
            id: EXPORT_IMAGE_ID,
            file_name: image_name.to_string(),
            width,
            height,
        }],
        annotations: boxes
            .iter()
            .enumerate()
            .map(|(index, bx)| ExportAnnotation {
                id: (index + 1) as u64,
                image_id: EXPORT_IMAGE_ID,
                bbox: [bx.x, bx.y, bx.width, bx.height],
                transcription: bx.label.clone().unwrap_or_default(),
            })
            .collect(),
    };

    // serialization of this shape cannot fail
    serde_json::to_string_pretty(&document).ok()
}

/// Suggested output file name: the image stem plus `_coco-text.json`.
pub fn export_file_name(image_name: &str) -> String {
    let stem = image_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(image_name);
    format!("{stem}_coco-text.json")
}
