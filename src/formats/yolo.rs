//! YOLO label text reader.
//!
//! YOLO lines are `class cx cy w h` with center-based coordinates
//! normalized to the image dimensions, so the natural pixel size of the
//! currently loaded image is a required side input. When it is unknown the
//! reader degrades to an empty result carrying a warning instead of
//! failing; downstream surfaces the warning, never an error.

use crate::model::{AnnotationBox, AnnotationFormat, AnnotationImage, ParseResult};

/// All boxes of a label file attach to this synthetic image id.
const YOLO_IMAGE_ID: u64 = 1;

/// Warning for the degraded no-dimensions parse.
pub const DIMENSIONS_UNKNOWN_WARNING: &str =
    "image dimensions unknown; YOLO boxes cannot be computed";

/// Parses YOLO label text against the loaded image's natural dimensions.
///
/// `fallback_image_name` names the synthetic image entry when known.
pub fn parse(
    raw_text: &str,
    natural_size: Option<(u32, u32)>,
    fallback_image_name: Option<&str>,
) -> ParseResult {
    let Some((natural_width, natural_height)) = natural_size.filter(|&(w, h)| w > 0 && h > 0)
    else {
        return ParseResult::new(AnnotationFormat::Yolo, Vec::new())
            .with_warning(DIMENSIONS_UNKNOWN_WARNING);
    };

    let (nw, nh) = (natural_width as f64, natural_height as f64);
    let boxes = raw_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .filter_map(|(index, line)| parse_line(line, index, nw, nh))
        .collect();

    let file_name = fallback_image_name.unwrap_or("image.jpg");
    let image = AnnotationImage::new(YOLO_IMAGE_ID, file_name);
    ParseResult::new(AnnotationFormat::Yolo, boxes).with_images(vec![image])
}

/// One label line. Lines with fewer than 5 fields or non-numeric geometry
/// are dropped; extra trailing fields are ignored.
fn parse_line(line: &str, index: usize, nw: f64, nh: f64) -> Option<AnnotationBox> {
    let mut parts = line.split_whitespace();
    let class_token = parts.next()?;
    let x_center = parts.next()?.parse::<f64>().ok()?;
    let y_center = parts.next()?.parse::<f64>().ok()?;
    let width = parts.next()?.parse::<f64>().ok()?;
    let height = parts.next()?.parse::<f64>().ok()?;

    let abs_width = width * nw;
    let abs_height = height * nh;
    let abs_x = x_center * nw - abs_width / 2.0;
    let abs_y = y_center * nh - abs_height / 2.0;

    let mut bx = AnnotationBox::new(
        (index + 1).to_string(),
        abs_x,
        abs_y,
        abs_width,
        abs_height,
    )
    .with_image_id(YOLO_IMAGE_ID);

    // label only when the class id is a finite number
    if let Ok(class_id) = class_token.parse::<f64>() {
        if class_id.is_finite() {
            bx.label = Some(format!("class_{class_id}"));
        }
    }
    Some(bx)
}

/// Fuzzing entry point for single-line parsing.
#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_parse_line(line: &str) -> Option<AnnotationBox> {
    parse_line(line, 0, 100.0, 100.0)
}
