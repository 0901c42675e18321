//! Partitioning of canonical boxes by owning image.
//!
//! The grouping map is rebuilt wholesale every time an annotation file is
//! parsed and never patched incrementally; stale buckets cannot survive a
//! format switch.

use std::collections::BTreeMap;

use crate::model::{AnnotationBox, ImageId};

/// Mapping from owning-image id to that image's ordered box set.
pub type GroupingMap = BTreeMap<ImageId, Vec<AnnotationBox>>;

/// Buckets boxes by `image_id`, with boxes lacking one landing under
/// [`ImageId::UNGROUPED`]. Order within a bucket follows document order.
pub fn group_boxes(boxes: &[AnnotationBox]) -> GroupingMap {
    let mut grouped = GroupingMap::new();
    for bx in boxes {
        let key = bx.image_id.unwrap_or(ImageId::UNGROUPED);
        grouped.entry(key).or_default().push(bx.clone());
    }
    grouped
}

/// Box count for one image, 0 when the bucket does not exist.
pub fn box_count(grouped: &GroupingMap, image_id: ImageId) -> usize {
    grouped.get(&image_id).map(Vec::len).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(id: &str, image: Option<u64>) -> AnnotationBox {
        let mut b = AnnotationBox::new(id, 0.0, 0.0, 1.0, 1.0);
        b.image_id = image.map(ImageId::new);
        b
    }

    #[test]
    fn buckets_by_image_id_preserving_order() {
        let boxes = [bx("a", Some(2)), bx("b", Some(1)), bx("c", Some(2))];
        let grouped = group_boxes(&boxes);

        assert_eq!(grouped.len(), 2);
        let ids: Vec<_> = grouped[&ImageId(2)].iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn missing_image_id_lands_in_sentinel_bucket() {
        let grouped = group_boxes(&[bx("a", None), bx("b", Some(3))]);
        assert_eq!(box_count(&grouped, ImageId::UNGROUPED), 1);
        assert_eq!(box_count(&grouped, ImageId(3)), 1);
        assert_eq!(box_count(&grouped, ImageId(9)), 0);
    }

    #[test]
    fn rebuild_replaces_previous_buckets() {
        let first = group_boxes(&[bx("a", Some(1))]);
        let second = group_boxes(&[bx("z", Some(5))]);
        assert!(first.contains_key(&ImageId(1)));
        assert!(!second.contains_key(&ImageId(1)));
    }
}
