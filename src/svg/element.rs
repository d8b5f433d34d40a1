// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgnode::{ElementId, Node};

use crate::element::{RenderingHint, ShapeElement, StyleSource};

impl StyleSource for Node<'_, '_> {
    #[inline]
    fn cascaded_value(&self, name: &str) -> Option<&str> {
        self.find_attribute(name)
    }

    #[inline]
    fn literal_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name)
    }
}

impl ShapeElement for Node<'_, '_> {
    fn rendering_hint(&self) -> RenderingHint {
        let tag_name = match self.tag_name() {
            Some(v) => v,
            None => return RenderingHint::None,
        };

        match tag_name {
            ElementId::Rect
            | ElementId::Circle
            | ElementId::Ellipse
            | ElementId::Line
            | ElementId::Polyline
            | ElementId::Polygon
            | ElementId::Path => RenderingHint::Shape,
            ElementId::ClipPath => RenderingHint::Clipping,
            ElementId::Mask => RenderingHint::Masking,
            ElementId::G
            | ElementId::Svg
            | ElementId::Use
            | ElementId::Switch
            | ElementId::A
            | ElementId::Symbol => RenderingHint::Containing,
            ElementId::Marker => RenderingHint::Marker,
            ElementId::Image => RenderingHint::Image,
            ElementId::Text => RenderingHint::Text,
            _ => RenderingHint::None,
        }
    }

    #[inline]
    fn element_id(&self) -> &str {
        Node::element_id(self)
    }

    #[inline]
    fn class_name(&self) -> Option<&str> {
        self.attribute("class")
    }

    fn parent_name(&self) -> Option<&str> {
        self.parent_element()
            .and_then(|n| n.tag_name())
            .map(|eid| eid.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgnode::Document;

    #[test]
    fn hints() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <clipPath id='c'><rect id='r' width='1' height='1'/></clipPath>
                <g id='g'/>
                <text id='t'>Text</text>
            </svg>",
        )
        .unwrap();
        let hint = |id: &str| doc.element_by_id(id).unwrap().rendering_hint();
        assert_eq!(hint("c"), RenderingHint::Clipping);
        assert_eq!(hint("r"), RenderingHint::Shape);
        assert_eq!(hint("g"), RenderingHint::Containing);
        assert_eq!(hint("t"), RenderingHint::Text);
        assert_eq!(doc.root_element().rendering_hint(), RenderingHint::Containing);
    }

    #[test]
    fn parent_name() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <clipPath id='c'><rect id='r' width='1' height='1'/></clipPath>
            </svg>",
        )
        .unwrap();
        let node = doc.element_by_id("r").unwrap();
        assert_eq!(node.parent_name(), Some("clipPath"));
        assert_eq!(doc.root_element().parent_name(), None);
    }

    #[test]
    fn cascaded_and_literal() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg' visibility='hidden'>
                <rect id='r' class='c1' width='1' height='1'/>
            </svg>",
        )
        .unwrap();
        let node = doc.element_by_id("r").unwrap();
        assert_eq!(node.cascaded_value("visibility"), Some("hidden"));
        assert_eq!(node.literal_attribute("visibility"), None);
        assert_eq!(node.class_name(), Some("c1"));
        assert_eq!(ShapeElement::element_id(&node), "r");
    }
}
