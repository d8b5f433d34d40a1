// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgnode::{ElementId, Node};
use tiny_skia_path::{PathBuilder, Transform};

use super::{render, SvgServices};
use crate::element::ClipGeometry;
use crate::{Drawing, DrawingGroup, Error, FillRule, Geometry, RenderContext, UnitSpace};

/// Resolves the `clip-path` attribute of a shape.
pub(crate) fn resolve(
    node: Node,
    state: &SvgServices,
    ctx: &mut RenderContext,
) -> Result<Option<ClipGeometry>, Error> {
    match node.attribute::<&str>("clip-path") {
        None | Some("none") => return Ok(None),
        Some(_) => {}
    }

    if ctx.rendering_clip_region() {
        log::debug!(
            "Nested clip paths are not supported. '{}' is clipped by its parent only.",
            node.element_id()
        );
        return Ok(None);
    }

    // Logs a warning on a broken link.
    let link = match node.attribute::<Node>("clip-path") {
        Some(v) => v,
        None => return Ok(None),
    };

    if link.tag_name() != Some(ElementId::ClipPath) {
        log::warn!(
            "'{}' cannot be used as a clip path.",
            link.element_id()
        );
        return Ok(None);
    }

    if !super::has_valid_transform(link, "transform") {
        log::warn!("Clip path '{}' has an invalid transform. Skipped.", link.element_id());
        return Ok(None);
    }

    ctx.push_group(DrawingGroup::default());
    let prev = ctx.set_rendering_clip_region(true);
    let res = render::convert_children(link, state, ctx);
    ctx.set_rendering_clip_region(prev);
    let content = ctx.pop_group().unwrap_or_default();
    res?;

    let units = super::convert_units(link, "clipPathUnits", UnitSpace::UserSpace);
    let transform = super::parse_transform(link, "transform").unwrap_or_default();

    // A bounding box clip is mapped into the shape space first,
    // so its transform cannot be merged into the outline.
    let (outline_ts, transform) = match units {
        UnitSpace::UserSpace => (transform, None),
        UnitSpace::ObjectBoundingBox => {
            (Transform::default(), Some(transform).filter(|ts| !ts.is_identity()))
        }
    };

    let mut builder = PathBuilder::new();
    let mut rules = Vec::new();
    flatten(&content, outline_ts, &mut builder, &mut rules);

    let path = match builder.finish() {
        Some(v) => v,
        None => {
            log::warn!("Clip path '{}' is empty. Skipped.", link.element_id());
            return Ok(None);
        }
    };

    let fill_rule = if rules.iter().all(|r| *r == FillRule::EvenOdd) {
        FillRule::EvenOdd
    } else {
        FillRule::NonZero
    };

    Ok(Some(ClipGeometry {
        geometry: Geometry::new(path, fill_rule, ctx.optimize_path()),
        units,
        transform,
    }))
}

/// Merges all geometries of the group into a single path in the parent coordinates.
fn flatten(group: &DrawingGroup, ts: Transform, builder: &mut PathBuilder, rules: &mut Vec<FillRule>) {
    for child in &group.children {
        match child {
            Drawing::Geometry(ref d) => {
                let geometry_ts = match d.geometry.transform {
                    Some(ref t) => t.to_matrix().post_concat(ts),
                    None => ts,
                };

                let path = (*d.geometry.path).clone();
                if let Some(path) = path.transform(geometry_ts) {
                    builder.push_path(&path);
                    rules.push(d.geometry.fill_rule);
                }
            }
            Drawing::Group(ref g) => {
                let group_ts = match g.transform {
                    Some(ref t) => t.to_matrix().post_concat(ts),
                    None => ts,
                };

                flatten(g, group_ts, builder, rules);
            }
        }
    }
}
