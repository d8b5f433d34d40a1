// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgnode::{ElementId, Node};

use super::{render, SvgServices};
use crate::element::MaskBrush;
use crate::{DrawingBrush, DrawingGroup, Error, RenderContext, UnitSpace};

/// Resolves the `mask` attribute of a shape.
///
/// The mask region is not applied. Only the content is rendered.
pub(crate) fn resolve(
    node: Node,
    state: &SvgServices,
    ctx: &mut RenderContext,
) -> Result<Option<MaskBrush>, Error> {
    match node.attribute::<&str>("mask") {
        None | Some("none") => return Ok(None),
        Some(_) => {}
    }

    // `mask` cannot be set on `clipPath` children.
    if ctx.rendering_clip_region() {
        return Ok(None);
    }

    let link = match node.attribute::<Node>("mask") {
        Some(v) => v,
        None => return Ok(None),
    };

    if link.tag_name() != Some(ElementId::Mask) {
        log::warn!("'{}' cannot be used as a mask.", link.element_id());
        return Ok(None);
    }

    let units = super::convert_units(link, "maskUnits", UnitSpace::ObjectBoundingBox);
    let content_units = super::convert_units(link, "maskContentUnits", UnitSpace::UserSpace);

    ctx.push_group(DrawingGroup::default());
    let res = render::convert_children(link, state, ctx);
    let content = ctx.pop_group().unwrap_or_default();
    res?;

    Ok(Some(MaskBrush {
        brush: DrawingBrush::new(content),
        units,
        content_units,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Brush, Drawing, IdRegistry, Options};
    use svgnode::Document;
    use tiny_skia_path::NonZeroRect;

    #[test]
    fn content_and_units() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <mask id='m' maskContentUnits='objectBoundingBox'>
                    <rect width='1' height='1' fill='#0000ff'/>
                    <rect id='r2' width='0.5' height='0.5' fill='white'/>
                </mask>
                <rect id='s' width='10' height='10' mask='url(#m)'/>
            </svg>",
        )
        .unwrap();
        let opt = Options::default();
        let state = SvgServices::new(&opt, NonZeroRect::from_xywh(0.0, 0.0, 100.0, 100.0).unwrap());
        let mut ids = IdRegistry::new();
        let mut ctx = RenderContext::new(&opt, &mut ids);
        let node = doc.element_by_id("s").unwrap();
        let mask = resolve(node, &state, &mut ctx).unwrap().unwrap();
        assert_eq!(mask.units, UnitSpace::ObjectBoundingBox);
        assert_eq!(mask.content_units, UnitSpace::ObjectBoundingBox);
        assert_eq!(mask.brush.drawing.children.len(), 2);
        assert!(mask.brush.transform.is_none());
        match mask.brush.drawing.children[0] {
            Drawing::Geometry(ref d) => assert!(matches!(d.brush, Some(Brush::Solid(_)))),
            _ => panic!("expected a geometry"),
        }
        assert_eq!(ctx.depth(), 1);
        assert!(ctx.is_registered_id("r2"));
    }

    #[test]
    fn ignored_inside_clip_path() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <mask id='m'><rect width='1' height='1'/></mask>
                <rect id='s' width='10' height='10' mask='url(#m)'/>
            </svg>",
        )
        .unwrap();
        let opt = Options::default();
        let state = SvgServices::new(&opt, NonZeroRect::from_xywh(0.0, 0.0, 100.0, 100.0).unwrap());
        let mut ids = IdRegistry::new();
        let mut ctx = RenderContext::new(&opt, &mut ids);
        ctx.set_rendering_clip_region(true);
        let node = doc.element_by_id("s").unwrap();
        assert!(resolve(node, &state, &mut ctx).unwrap().is_none());
    }
}
