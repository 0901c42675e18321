//! Canonical box, image and parse-result types.
//!
//! All format-specific parsers converge to these types. Box geometry is
//! always stored in the *natural* pixel space of the source image, never in
//! zoomed/display space, which decouples stored geometry from transient
//! viewport state.
//!
//! Construction is deliberately permissive: malformed inputs may produce
//! zero-sized or out-of-bounds boxes, which downstream code tolerates
//! rather than panics over.

use serde::{Deserialize, Serialize};

use super::ids::ImageId;

/// An axis-aligned rectangle in natural image-pixel units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationBox {
    /// Unique within the owning image's box group.
    pub id: String,

    /// Left edge in natural pixels.
    pub x: f64,

    /// Top edge in natural pixels.
    pub y: f64,

    /// Width in natural pixels (>= 0 for well-formed input).
    pub width: f64,

    /// Height in natural pixels (>= 0 for well-formed input).
    pub height: f64,

    /// Optional class name or transcription.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Owning image, when the source format groups boxes by image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<ImageId>,
}

impl AnnotationBox {
    /// Creates a box with the minimum required fields.
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            label: None,
            image_id: None,
        }
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the owning image.
    pub fn with_image_id(mut self, image_id: impl Into<ImageId>) -> Self {
        self.image_id = Some(image_id.into());
        self
    }

    /// Right edge in natural pixels.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge in natural pixels.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// One image an annotation document refers to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationImage {
    pub id: ImageId,

    /// May be a relative path; matching against a loaded image uses the
    /// base filename only.
    pub file_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl AnnotationImage {
    /// Creates an image entry without known dimensions.
    pub fn new(id: impl Into<ImageId>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            width: None,
            height: None,
        }
    }

    /// Sets the pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// The closed set of interchange formats a file can dispatch to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationFormat {
    Coco,
    CocoText,
    Voc,
    Yolo,
    Generic,
}

impl AnnotationFormat {
    /// Human-readable format tag, surfaced in reports and the UI panel.
    pub fn label(&self) -> &'static str {
        match self {
            AnnotationFormat::Coco => "COCO",
            AnnotationFormat::CocoText => "COCO-Text",
            AnnotationFormat::Voc => "Pascal VOC",
            AnnotationFormat::Yolo => "YOLO",
            AnnotationFormat::Generic => "simple JSON",
        }
    }
}

impl std::fmt::Display for AnnotationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The outcome of one successful parser invocation.
///
/// `warning` signals a degraded-but-non-fatal parse, e.g. YOLO geometry
/// that could not be computed because the image dimensions were unknown.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParseResult {
    pub boxes: Vec<AnnotationBox>,
    pub format: AnnotationFormat,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<AnnotationImage>,
}

impl ParseResult {
    /// Creates a result with boxes only (no image grouping, no warning).
    pub fn new(format: AnnotationFormat, boxes: Vec<AnnotationBox>) -> Self {
        Self {
            boxes,
            format,
            warning: None,
            images: Vec::new(),
        }
    }

    /// Attaches the document's image list.
    pub fn with_images(mut self, images: Vec<AnnotationImage>) -> Self {
        self.images = images;
        self
    }

    /// Attaches a degraded-parse warning.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }
}
