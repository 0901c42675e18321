//! Canonical model for boxscope.
//!
//! This module defines the format-agnostic representation all parsers
//! converge to and the editor/exporter read from. It plays the role of the
//! "hub" in the format normalization: N input formats, one model, one
//! export surface.
//!
//! # Design Principles
//!
//! 1. **Natural pixel space**: box geometry is stored in the source image's
//!    intrinsic resolution, never in zoomed/display space.
//!
//! 2. **Permissive construction**: parsers may produce degenerate geometry
//!    (zero-sized boxes, out-of-bounds coordinates); tolerance lives in the
//!    parsers, enforcement does not live in the types.
//!
//! 3. **Wholesale replacement**: a successful parse replaces the previous
//!    box set and image list entirely; nothing is patched incrementally.

mod boxes;
mod ids;

pub use boxes::{AnnotationBox, AnnotationFormat, AnnotationImage, ParseResult};
pub use ids::ImageId;
