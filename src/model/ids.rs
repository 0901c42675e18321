//! Newtype ID for type-safe identification of annotation images.
//!
//! Using a newtype prevents accidentally treating arbitrary integers
//! (annotation indices, class ids) as image ids.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique identifier for an image within an annotation document.
///
/// Boxes that carry no image id are bucketed under [`ImageId::UNGROUPED`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u64);

impl ImageId {
    /// Sentinel bucket for boxes that carry no owning-image id.
    pub const UNGROUPED: ImageId = ImageId(0);

    /// Creates a new ImageId.
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ImageId {
    fn from(id: u64) -> Self {
        ImageId::new(id)
    }
}

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.0)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality() {
        assert_eq!(ImageId(1), ImageId(1));
        assert_ne!(ImageId(1), ImageId(2));
    }

    #[test]
    fn test_ungrouped_sentinel_is_zero() {
        assert_eq!(ImageId::UNGROUPED.as_u64(), 0);
    }

    #[test]
    fn test_id_ordering() {
        assert!(ImageId(1) < ImageId(2));
    }
}
