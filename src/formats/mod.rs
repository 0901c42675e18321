//! Format detection and per-format readers.
//!
//! Each reader converts raw file text into a canonical [`ParseResult`].
//! Dispatch goes by file extension, with a content peek distinguishing the
//! JSON family (COCO vs COCO-Text vs generic). Syntax errors in JSON/XML
//! are fatal; field-level anomalies are tolerated by dropping the record
//! or defaulting the field.

pub mod coco;
pub mod coco_text;
pub mod detect;
pub mod simple;
mod value;
pub mod voc;
pub mod yolo;

use serde_json::Value;

use crate::error::BoxscopeError;
use crate::model::{AnnotationFormat, ParseResult};

/// Side inputs some parsers need from the surrounding session.
///
/// YOLO geometry is normalized to the loaded image, so its natural pixel
/// dimensions (and name, for the synthetic image entry) come from here
/// rather than from the file.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParseContext<'a> {
    pub natural_size: Option<(u32, u32)>,
    pub image_name: Option<&'a str>,
}

/// Parses one annotation file.
///
/// Returns `Ok(None)` for unsupported extensions (the caller resets to an
/// empty, unselected state), `Err` for structural JSON/XML syntax errors,
/// and `Ok(Some(..))` otherwise, possibly with a degraded-parse warning.
pub fn parse_file(
    file_name: &str,
    raw_text: &str,
    ctx: ParseContext<'_>,
) -> Result<Option<ParseResult>, BoxscopeError> {
    let Some(family) = detect::detect(file_name) else {
        return Ok(None);
    };

    let result = match family {
        AnnotationFormat::Voc => voc::parse(file_name, raw_text)?,
        AnnotationFormat::Yolo => yolo::parse(raw_text, ctx.natural_size, ctx.image_name),
        _ => {
            let parsed: Value =
                serde_json::from_str(raw_text).map_err(|source| BoxscopeError::JsonParse {
                    name: file_name.to_string(),
                    source,
                })?;

            match detect::detect_json_variant(&parsed) {
                AnnotationFormat::CocoText => coco_text::parse(&parsed),
                AnnotationFormat::Coco => coco::parse(&parsed),
                _ => simple::parse(&parsed),
            }
        }
    };

    Ok(Some(result))
}
