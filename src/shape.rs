// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tiny_skia_path::{NonZeroRect, Transform};

use crate::element::{ClipGeometry, MaskBrush, RenderingHint, ShapeElement, ShapeServices};
use crate::{
    Brush, Drawing, DrawingGroup, DrawingTransform, Error, GeometryDrawing, RenderContext,
    Stretch, UnitSpace,
};

/// Renders a shape element into the current group of the context.
///
/// Produces at most one drawing: a geometry drawing, or a group with a clip
/// and/or an opacity mask that contains it.
///
/// Elements that should not be rendered are silently skipped.
/// An error is returned only when the mask content cannot be converted into a luminance mask.
pub fn render_shape<E, S>(element: &E, services: &S, ctx: &mut RenderContext) -> Result<(), Error>
where
    E: ShapeElement + ?Sized,
    S: ShapeServices<E> + ?Sized,
{
    if element.rendering_hint() != RenderingHint::Shape {
        return Ok(());
    }

    let parent_name = element.parent_name();

    // Clip path content is rendered only by the clip resolver.
    let is_clip_content = parent_name == Some("clipPath") && !ctx.rendering_clip_region();

    if element.cascaded_value("visibility") == Some("hidden")
        || element.cascaded_value("display") == Some("none")
    {
        log::debug!("'{}' is hidden. Skipped.", element.element_id());
        return Ok(());
    }

    if !is_clip_content {
        if let Some(drawing) = build_drawing(element, services, ctx)? {
            ctx.push_drawing(drawing);
        }
    }

    if parent_name != Some("marker") {
        services.render_markers(element, ctx)?;
    }

    Ok(())
}

fn build_drawing<E, S>(
    element: &E,
    services: &S,
    ctx: &mut RenderContext,
) -> Result<Option<Drawing>, Error>
where
    E: ShapeElement + ?Sized,
    S: ShapeServices<E> + ?Sized,
{
    let mut geometry = match services.build_geometry(element, ctx.optimize_path()) {
        Some(geometry) if !geometry.is_empty() => geometry,
        _ => return Ok(None),
    };

    let mut brush = services.resolve_fill(element, ctx)?;
    let mut pen = services.resolve_stroke(element, ctx)?;
    if brush.is_none() && pen.is_none() {
        return Ok(None);
    }

    let transform = services.transform(element).filter(|ts| !ts.is_identity());
    if let Some(ts) = transform {
        geometry.transform = Some(DrawingTransform::Matrix(ts));

        if let Some(ref mut brush) = brush {
            apply_shape_transform(brush, ts);
        }

        if let Some(ref mut pen) = pen {
            apply_shape_transform(&mut pen.brush, ts);
        }
    }

    let mut drawing = GeometryDrawing::new(geometry, brush, pen);

    let clip = services.resolve_clip(element, ctx)?;
    let mask = services.resolve_mask(element, ctx)?;
    if clip.is_none() && mask.is_none() {
        assign_name(element, &mut drawing, ctx);
        return Ok(Some(drawing.into()));
    }

    // The geometry transform is already set, so these are the transformed bounds.
    let bbox = drawing.bounds().and_then(|r| r.to_non_zero_rect());

    let mut group = DrawingGroup::default();

    if let Some(clip) = clip {
        match clip_geometry(clip, bbox, transform) {
            Some(geometry) => group.clip_geometry = Some(geometry),
            None => {
                log::warn!(
                    "Clip path on '{}' requires a bounding box. Skipped.",
                    element.element_id()
                );
                return Ok(None);
            }
        }
    }

    if let Some(mask) = mask {
        match mask_brush(mask, bbox, transform)? {
            Some(brush) => group.opacity_mask = Some(brush),
            None => {
                log::warn!(
                    "Mask on '{}' requires a bounding box. Skipped.",
                    element.element_id()
                );
                return Ok(None);
            }
        }
    }

    // Named only once it is known to be kept.
    assign_name(element, &mut drawing, ctx);
    group.push(drawing.into());
    Ok(Some(group.into()))
}

/// Places the shape transform after the brush one.
fn apply_shape_transform(brush: &mut Brush, ts: Transform) {
    let slot = brush.transform_mut();
    *slot = match slot.take() {
        Some(prev) if !prev.is_identity() => Some(prev.then(ts)),
        _ => Some(DrawingTransform::Matrix(ts)),
    };
}

fn clip_geometry(
    clip: ClipGeometry,
    bbox: Option<NonZeroRect>,
    transform: Option<Transform>,
) -> Option<crate::Geometry> {
    let mut geometry = clip.geometry;
    match clip.units {
        UnitSpace::ObjectBoundingBox => {
            let bbox = bbox?;
            let mut list = vec![
                Transform::from_scale(bbox.width(), bbox.height()),
                Transform::from_translate(bbox.x(), bbox.y()),
            ];
            list.extend(clip.transform);
            geometry.transform = Some(DrawingTransform::Chain(list));
        }
        UnitSpace::UserSpace => {
            if let Some(ts) = transform {
                geometry.transform = Some(DrawingTransform::Matrix(ts));
            }
        }
    }

    Some(geometry)
}

fn mask_brush(
    mask: MaskBrush,
    bbox: Option<NonZeroRect>,
    transform: Option<Transform>,
) -> Result<Option<Brush>, Error> {
    let mut brush = mask.brush;
    match mask.units {
        UnitSpace::ObjectBoundingBox => {
            let bbox = match bbox {
                Some(v) => v,
                None => return Ok(None),
            };

            brush.drawing.desaturate_top_level()?;

            if mask.content_units == UnitSpace::ObjectBoundingBox {
                brush.transform = Some(DrawingTransform::Matrix(Transform::from_bbox(bbox)));
            } else {
                brush.viewbox = Some(bbox.to_rect());
                brush.viewport = Some(bbox.to_rect());
                brush.viewbox_units = UnitSpace::UserSpace;
                brush.viewport_units = UnitSpace::UserSpace;
                brush.stretch = Stretch::Uniform;
            }
        }
        UnitSpace::UserSpace => {
            if let Some(ts) = transform {
                brush.transform = Some(DrawingTransform::Matrix(ts));
            }
        }
    }

    Ok(Some(Brush::Drawing(brush)))
}

fn assign_name<E>(element: &E, drawing: &mut GeometryDrawing, ctx: &mut RenderContext)
where
    E: ShapeElement + ?Sized,
{
    let id = element.element_id();
    if !id.trim().is_empty() && !ctx.is_registered_id(id) {
        drawing.name = Some(id.to_string());
        ctx.register_id(id);

        if ctx.include_runtime() {
            drawing.metadata.id = Some(id.to_string());
        }
    }

    if ctx.include_runtime() {
        if let Some(class) = element.class_name().filter(|c| !c.trim().is_empty()) {
            drawing.metadata.class = Some(class.to_string());
        }
    }
}
