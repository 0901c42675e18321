//! Coordinate transform between natural image pixels and screen pixels.
//!
//! Box geometry is stored and edited in natural-pixel space only. Zoom is
//! a pure visual transform on the containing frame; the overlay is sized
//! to the display box and scaled viewBox-style so overlay coordinates
//! equal natural coordinates at any zoom. Pointer positions are mapped
//! back by dividing the offset within the zoomed frame's bounding
//! rectangle by the rectangle size, which makes the pointer math
//! zoom-invariant by construction.

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.2;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 5.0;

/// A point in natural image-pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NaturalPoint {
    pub x: f64,
    pub y: f64,
}

impl NaturalPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The on-screen bounding rectangle of the (zoomed) image frame, as
/// measured at event time. It already reflects the current zoom.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl FrameRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Injected viewport measurements: intrinsic image size, on-screen size of
/// the image element before zoom, and the zoom factor.
///
/// Recomputed on every relevant event so transform math stays a pure
/// function of this value, independent of any rendering surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    pub natural_width: f64,
    pub natural_height: f64,
    pub display_width: f64,
    pub display_height: f64,
    zoom: f64,
}

impl Default for ViewportMetrics {
    fn default() -> Self {
        Self {
            natural_width: 0.0,
            natural_height: 0.0,
            display_width: 0.0,
            display_height: 0.0,
            zoom: 1.0,
        }
    }
}

impl ViewportMetrics {
    pub fn new(natural: (f64, f64), display: (f64, f64)) -> Self {
        Self {
            natural_width: natural.0,
            natural_height: natural.1,
            display_width: display.0,
            display_height: display.1,
            zoom: 1.0,
        }
    }

    /// Current zoom factor, always within [[`MIN_ZOOM`], [`MAX_ZOOM`]].
    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom, clamped to the bounds.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Reset to 1, applied whenever a new image is loaded.
    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// The frame rectangle the zoomed image occupies, anchored at the
    /// given screen origin. What a DOM `getBoundingClientRect` would
    /// report for the frame.
    pub fn zoomed_frame(&self, left: f64, top: f64) -> FrameRect {
        FrameRect::new(
            left,
            top,
            self.display_width * self.zoom,
            self.display_height * self.zoom,
        )
    }

    /// The natural-space viewBox for the overlay, or `None` while the
    /// image has not decoded yet.
    pub fn overlay_view_box(&self) -> Option<(f64, f64)> {
        (self.natural_width > 0.0 && self.natural_height > 0.0)
            .then_some((self.natural_width, self.natural_height))
    }

    /// Maps a screen pointer position into natural space via the frame's
    /// current bounding rectangle.
    ///
    /// A zero-sized frame or an undecoded image yields `None`; callers
    /// treat that as a no-op, never an error.
    pub fn screen_to_natural(
        &self,
        frame: &FrameRect,
        screen_x: f64,
        screen_y: f64,
    ) -> Option<NaturalPoint> {
        if frame.width <= 0.0 || frame.height <= 0.0 {
            return None;
        }
        if self.natural_width <= 0.0 || self.natural_height <= 0.0 {
            return None;
        }

        let fx = (screen_x - frame.left) / frame.width;
        let fy = (screen_y - frame.top) / frame.height;
        Some(NaturalPoint::new(
            fx * self.natural_width,
            fy * self.natural_height,
        ))
    }
}
