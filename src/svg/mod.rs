// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Shape renderer collaborators implemented over an `svgnode` tree.

use std::str::FromStr;

use svgnode::{FromValue, Node};
use tiny_skia_path::{NonZeroRect, Transform};

use crate::element::{
    ClipGeometry, ClipMaskResolver, GeometryBuilder, MarkerRenderer, MaskBrush, PaintResolver,
};
use crate::{Brush, Error, FillRule, Geometry, Options, Pen, RenderContext, UnitSpace};

mod clip;
mod element;
mod marker;
mod mask;
mod paint_server;
mod render;
mod shapes;
mod units;

pub(crate) use render::convert_doc;

/// A document-wide state shared by all collaborators.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SvgServices<'a> {
    pub(crate) opt: &'a Options,
    /// The root `viewBox`. Percentage lengths are resolved against it.
    pub(crate) view_box: NonZeroRect,
}

impl<'a> SvgServices<'a> {
    pub(crate) fn new(opt: &'a Options, view_box: NonZeroRect) -> Self {
        SvgServices { opt, view_box }
    }
}

impl<'a, 'input: 'a> FromValue<'a, 'input> for FillRule {
    fn parse(_: Node, _: &str, value: &str) -> Option<Self> {
        match value {
            "nonzero" => Some(FillRule::NonZero),
            "evenodd" => Some(FillRule::EvenOdd),
            _ => None,
        }
    }
}

impl<'a, 'input: 'a> FromValue<'a, 'input> for UnitSpace {
    fn parse(_: Node, _: &str, value: &str) -> Option<Self> {
        match value {
            "userSpaceOnUse" => Some(UnitSpace::UserSpace),
            "objectBoundingBox" => Some(UnitSpace::ObjectBoundingBox),
            _ => None,
        }
    }
}

/// Parses a transform attribute.
///
/// Returns `None` when the attribute is not set or cannot be parsed.
pub(crate) fn parse_transform(node: Node, name: &str) -> Option<Transform> {
    let ts: svgtypes::Transform = node.attribute(name)?;
    Some(Transform::from_row(
        ts.a as f32,
        ts.b as f32,
        ts.c as f32,
        ts.d as f32,
        ts.e as f32,
        ts.f as f32,
    ))
}

/// Checks that a transform attribute doesn't collapse the element.
///
/// A missing or malformed attribute is valid.
pub(crate) fn has_valid_transform(node: Node, name: &str) -> bool {
    // Do not use Node::attribute::<Transform>, because it logs malformed values.
    let attr: &str = match node.attribute(name) {
        Some(attr) => attr,
        None => return true,
    };

    let ts = match svgtypes::Transform::from_str(attr) {
        Ok(v) => v,
        Err(_) => return true,
    };

    let ts = Transform::from_row(
        ts.a as f32,
        ts.b as f32,
        ts.c as f32,
        ts.d as f32,
        ts.e as f32,
        ts.f as f32,
    );
    ts.is_valid()
}

pub(crate) fn convert_units(node: Node, name: &str, def: UnitSpace) -> UnitSpace {
    node.attribute(name).unwrap_or(def)
}

pub(crate) fn is_visible_element(node: Node) -> bool {
    node.attribute("display") != Some("none") && has_valid_transform(node, "transform")
}

fn is_inside_clip_path(node: Node) -> bool {
    node.ancestors()
        .any(|n| n.tag_name() == Some(svgnode::ElementId::ClipPath))
}

impl<'a, 'input: 'a> GeometryBuilder<Node<'a, 'input>> for SvgServices<'_> {
    fn build_geometry(&self, element: &Node<'a, 'input>, optimize: bool) -> Option<Geometry> {
        if !has_valid_transform(*element, "transform") {
            log::warn!(
                "'{}' has a degenerate transform. Skipped.",
                element.element_id()
            );
            return None;
        }

        let path = shapes::convert(*element, self)?;

        let rule_name = if is_inside_clip_path(*element) {
            "clip-rule"
        } else {
            "fill-rule"
        };
        let fill_rule = element.find_attribute(rule_name).unwrap_or_default();

        Some(Geometry::new(path, fill_rule, optimize))
    }
}

impl<'a, 'input: 'a> PaintResolver<Node<'a, 'input>> for SvgServices<'_> {
    fn resolve_fill(
        &self,
        element: &Node<'a, 'input>,
        ctx: &mut RenderContext,
    ) -> Result<Option<Brush>, Error> {
        paint_server::resolve_fill(*element, self, ctx)
    }

    fn resolve_stroke(
        &self,
        element: &Node<'a, 'input>,
        ctx: &mut RenderContext,
    ) -> Result<Option<Pen>, Error> {
        paint_server::resolve_stroke(*element, self, ctx)
    }
}

impl<'a, 'input: 'a> ClipMaskResolver<Node<'a, 'input>> for SvgServices<'_> {
    fn transform(&self, element: &Node<'a, 'input>) -> Option<Transform> {
        parse_transform(*element, "transform")
    }

    fn resolve_clip(
        &self,
        element: &Node<'a, 'input>,
        ctx: &mut RenderContext,
    ) -> Result<Option<ClipGeometry>, Error> {
        clip::resolve(*element, self, ctx)
    }

    fn resolve_mask(
        &self,
        element: &Node<'a, 'input>,
        ctx: &mut RenderContext,
    ) -> Result<Option<MaskBrush>, Error> {
        mask::resolve(*element, self, ctx)
    }
}

impl<'a, 'input: 'a> MarkerRenderer<Node<'a, 'input>> for SvgServices<'_> {
    fn render_markers(&self, element: &Node<'a, 'input>, ctx: &mut RenderContext) -> Result<(), Error> {
        marker::render(*element, ctx);
        Ok(())
    }
}
