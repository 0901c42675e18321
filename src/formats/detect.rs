//! Format detection.
//!
//! Detection is a pure function from (file extension, peeked content) to a
//! format tag. Extensions pick the parser family; for `.json` documents the
//! parsed value is peeked to distinguish COCO, COCO-Text and the generic
//! fallback.

use serde_json::Value;

use crate::model::AnnotationFormat;

/// Fields whose presence on any annotation entry marks a COCO-Text file.
const TEXT_FIELDS: [&str; 3] = ["transcription", "utf8_string", "text"];

/// Lower-cased extension of a file name, without the dot.
pub fn extension_of(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (_, ext) = base.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Dispatches a file to its format family by extension.
///
/// Returns `None` for unsupported extensions (including `.csv`, which the
/// file surface accepts but no parser handles). The JSON family still needs
/// [`detect_json_variant`] once the document is parsed.
pub fn detect(file_name: &str) -> Option<AnnotationFormat> {
    match extension_of(file_name)?.as_str() {
        "json" => Some(AnnotationFormat::Generic),
        "xml" => Some(AnnotationFormat::Voc),
        "txt" => Some(AnnotationFormat::Yolo),
        _ => None,
    }
}

/// Picks the concrete JSON parser for an already-parsed document.
///
/// An object carrying an `annotations` key is COCO-family; it is COCO-Text
/// when any annotation entry carries a transcription-style field. Anything
/// else falls back to the generic parser.
pub fn detect_json_variant(parsed: &Value) -> AnnotationFormat {
    let Some(annotations) = parsed.get("annotations") else {
        return AnnotationFormat::Generic;
    };

    let has_text_fields = annotations
        .as_array()
        .map(|entries| {
            entries.iter().any(|ann| {
                ann.is_object() && TEXT_FIELDS.iter().any(|key| ann.get(key).is_some())
            })
        })
        .unwrap_or(false);

    if has_text_fields {
        AnnotationFormat::CocoText
    } else {
        AnnotationFormat::Coco
    }
}
