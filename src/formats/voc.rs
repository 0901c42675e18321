//! Pascal VOC XML reader.
//!
//! A VOC file describes exactly one image, so the result carries a single
//! image entry with id fixed at 1. An XML syntax error is a hard failure;
//! everything below the document level is tolerated (`<object>` elements
//! without a `<bndbox>` are dropped, missing coordinates default to 0).

use roxmltree::{Document, Node};

use crate::error::BoxscopeError;
use crate::model::{AnnotationBox, AnnotationFormat, AnnotationImage, ParseResult};

/// All boxes of a VOC file attach to this synthetic image id.
const VOC_IMAGE_ID: u64 = 1;

/// Parses a Pascal VOC XML document from text.
pub fn parse(name: &str, raw_text: &str) -> Result<ParseResult, BoxscopeError> {
    let document = Document::parse(raw_text).map_err(|source| BoxscopeError::XmlParse {
        name: name.to_string(),
        message: source.to_string(),
    })?;

    let root = document.root();
    let file_name = descendant_text(root, "filename").unwrap_or_else(|| "image.jpg".to_string());
    let width = descendant_text(root, "width")
        .and_then(|raw| parse_dimension(&raw))
        .unwrap_or(0);
    let height = descendant_text(root, "height")
        .and_then(|raw| parse_dimension(&raw))
        .unwrap_or(0);

    let boxes = root
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
        .filter_map(parse_object)
        .enumerate()
        .map(|(index, (name, bbox))| {
            let [x, y, w, h] = bbox;
            let mut bx =
                AnnotationBox::new((index + 1).to_string(), x, y, w, h).with_image_id(VOC_IMAGE_ID);
            bx.label = name;
            bx
        })
        .collect();

    let image = AnnotationImage::new(VOC_IMAGE_ID, file_name).with_dimensions(width, height);
    Ok(ParseResult::new(AnnotationFormat::Voc, boxes).with_images(vec![image]))
}

/// One `<object>`: its optional `<name>` plus `[x, y, w, h]` geometry.
///
/// Returns `None` when the object has no `<bndbox>`. The `max(0, ..)`
/// guard tolerates inverted min/max pairs without producing negative
/// geometry.
fn parse_object(object: Node<'_, '_>) -> Option<(Option<String>, [f64; 4])> {
    let bndbox = child_element(object, "bndbox")?;

    let xmin = coordinate(bndbox, "xmin");
    let ymin = coordinate(bndbox, "ymin");
    let xmax = coordinate(bndbox, "xmax");
    let ymax = coordinate(bndbox, "ymax");

    let name = descendant_text(object, "name").filter(|n| !n.is_empty());
    let geometry = [
        xmin,
        ymin,
        (xmax - xmin).max(0.0),
        (ymax - ymin).max(0.0),
    ];
    Some((name, geometry))
}

fn coordinate(bndbox: Node<'_, '_>, tag: &str) -> f64 {
    descendant_text(bndbox, tag)
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn parse_dimension(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|v| v.max(0.0) as u32))
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

/// Text of the first descendant element with the given tag, in document
/// order (matching how the original consumer located `<filename>`,
/// `<width>` and `<height>` anywhere below the root).
fn descendant_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    node.descendants()
        .find(|d| d.is_element() && d.tag_name().name() == tag)
        .and_then(|d| d.text())
        .map(|text| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageId;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<annotation>
  <filename>img1.jpg</filename>
  <size>
    <width>640</width>
    <height>480</height>
  </size>
  <object>
    <name>cat</name>
    <bndbox>
      <xmin>10</xmin>
      <ymin>20</ymin>
      <xmax>30</xmax>
      <ymax>40</ymax>
    </bndbox>
  </object>
  <object>
    <name>no-bndbox</name>
  </object>
</annotation>"#;

    #[test]
    fn parses_single_image_and_objects() {
        let result = parse("sample.xml", SAMPLE).expect("parse xml");
        assert_eq!(result.format, AnnotationFormat::Voc);
        assert_eq!(result.images.len(), 1);

        let image = &result.images[0];
        assert_eq!(image.id, ImageId(1));
        assert_eq!(image.file_name, "img1.jpg");
        assert_eq!(image.width, Some(640));
        assert_eq!(image.height, Some(480));

        // object without a bndbox is dropped
        assert_eq!(result.boxes.len(), 1);
        let bx = &result.boxes[0];
        assert_eq!(bx.label.as_deref(), Some("cat"));
        assert_eq!((bx.x, bx.y, bx.width, bx.height), (10.0, 20.0, 20.0, 20.0));
        assert_eq!(bx.image_id, Some(ImageId(1)));
    }

    #[test]
    fn inverted_min_max_clamps_to_zero_size() {
        let xml = r#"<annotation>
  <object>
    <bndbox><xmin>50</xmin><ymin>10</ymin><xmax>40</xmax><ymax>5</ymax></bndbox>
  </object>
</annotation>"#;
        let result = parse("inv.xml", xml).expect("parse xml");
        assert_eq!(result.boxes[0].width, 0.0);
        assert_eq!(result.boxes[0].height, 0.0);
    }

    #[test]
    fn missing_header_fields_default() {
        let xml = "<annotation><object><bndbox><xmin>1</xmin><ymin>1</ymin><xmax>2</xmax><ymax>2</ymax></bndbox></object></annotation>";
        let result = parse("min.xml", xml).expect("parse xml");
        assert_eq!(result.images[0].file_name, "image.jpg");
        assert_eq!(result.images[0].width, Some(0));
        assert_eq!(result.boxes[0].label, None);
    }

    #[test]
    fn malformed_xml_is_a_hard_failure() {
        let err = parse("bad.xml", "<annotation><object>").unwrap_err();
        assert!(matches!(err, BoxscopeError::XmlParse { .. }));
    }
}
