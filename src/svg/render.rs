// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgnode::{Document, ElementId, Node};
use svgtypes::{Length, LengthUnit as Unit};
use tiny_skia_path::{NonZeroRect, Size};

use super::{units, SvgServices};
use crate::element::{RenderingHint, ShapeElement};
use crate::*;

// Full list can be found here: https://www.w3.org/TR/SVG11/feature.html
static FEATURES: &[&str] = &[
    "http://www.w3.org/TR/SVG11/feature#SVGDOM-static",
    "http://www.w3.org/TR/SVG11/feature#SVG-static",
    "http://www.w3.org/TR/SVG11/feature#CoreAttribute",
    "http://www.w3.org/TR/SVG11/feature#Structure",
    "http://www.w3.org/TR/SVG11/feature#BasicStructure",
    "http://www.w3.org/TR/SVG11/feature#ConditionalProcessing",
    "http://www.w3.org/TR/SVG11/feature#Style",
    "http://www.w3.org/TR/SVG11/feature#Shape",
    "http://www.w3.org/TR/SVG11/feature#PaintAttribute",
    "http://www.w3.org/TR/SVG11/feature#BasicPaintAttribute",
    "http://www.w3.org/TR/SVG11/feature#OpacityAttribute",
    "http://www.w3.org/TR/SVG11/feature#GraphicsAttribute",
    "http://www.w3.org/TR/SVG11/feature#BasicGraphicsAttribute",
    "http://www.w3.org/TR/SVG11/feature#Gradient",
    "http://www.w3.org/TR/SVG11/feature#Pattern",
    "http://www.w3.org/TR/SVG11/feature#Clip",
    "http://www.w3.org/TR/SVG11/feature#BasicClip",
    "http://www.w3.org/TR/SVG11/feature#Mask",
    "http://www.w3.org/TR/SVG11/feature#XlinkAttribute",
];

/// Nested groups limit. Guards against mutually recursive masks and patterns.
const NESTING_LIMIT: usize = 256;

pub(crate) fn convert_doc(
    doc: &Document,
    opt: &Options,
    ids: &mut IdRegistry,
) -> Result<SvgDrawing, Error> {
    let svg = doc.root_element();
    let size = resolve_svg_size(svg, opt)?;
    let view_box = parse_viewbox(svg).unwrap_or_else(|| size.to_non_zero_rect(0.0, 0.0));
    let aspect: svgtypes::AspectRatio = svg.attribute("preserveAspectRatio").unwrap_or_default();

    let state = SvgServices::new(opt, view_box);
    let mut ctx = RenderContext::new(opt, ids);

    if is_visible_element(svg, opt) {
        convert_children(svg, &state, &mut ctx)?;
    }

    let mut root = ctx.finish();
    let ts = view_box_to_transform(view_box, aspect, size);
    if !ts.is_identity() {
        root.transform = Some(DrawingTransform::Matrix(ts));
    }

    Ok(SvgDrawing {
        size,
        view_box,
        root,
    })
}

fn parse_viewbox(node: Node) -> Option<NonZeroRect> {
    let vb: svgtypes::ViewBox = node.attribute("viewBox")?;
    NonZeroRect::from_xywh(vb.x as f32, vb.y as f32, vb.w as f32, vb.h as f32)
}

fn resolve_svg_size(svg: Node, opt: &Options) -> Result<Size, Error> {
    let mut state = SvgServices::new(opt, opt.default_size.to_non_zero_rect(0.0, 0.0));

    let def = Length::new(100.0, Unit::Percent);
    let mut width: Length = svg.attribute("width").unwrap_or(def);
    let mut height: Length = svg.attribute("height").unwrap_or(def);

    let view_box = parse_viewbox(svg);

    if view_box.is_none() {
        // Apply the percentages to the fallback size.
        if width.unit == Unit::Percent {
            width = Length::new(
                (width.number / 100.0) * opt.default_size.width() as f64,
                Unit::None,
            );
        }

        if height.unit == Unit::Percent {
            height = Length::new(
                (height.number / 100.0) * opt.default_size.height() as f64,
                Unit::None,
            );
        }
    }

    let size = if let Some(vbox) = view_box {
        state.view_box = vbox;

        let w = if width.unit == Unit::Percent {
            vbox.width() * (width.number as f32 / 100.0)
        } else {
            units::convert_user_length(width, svg, "width", &state)
        };

        let h = if height.unit == Unit::Percent {
            vbox.height() * (height.number as f32 / 100.0)
        } else {
            units::convert_user_length(height, svg, "height", &state)
        };

        Size::from_wh(w, h)
    } else {
        Size::from_wh(
            units::convert_user_length(width, svg, "width", &state),
            units::convert_user_length(height, svg, "height", &state),
        )
    };

    size.ok_or(Error::InvalidSize)
}

fn is_visible_element(node: Node, opt: &Options) -> bool {
    super::is_visible_element(node) && is_condition_passed(node, opt)
}

#[inline(never)]
pub(crate) fn convert_children(
    parent: Node,
    state: &SvgServices,
    ctx: &mut RenderContext,
) -> Result<(), Error> {
    for node in parent.children() {
        convert_element(node, state, ctx)?;
    }

    Ok(())
}

#[inline(never)]
pub(crate) fn convert_element(
    node: Node,
    state: &SvgServices,
    ctx: &mut RenderContext,
) -> Result<(), Error> {
    let tag_name = match node.tag_name() {
        Some(v) => v,
        None => return Ok(()),
    };

    if !is_visible_element(node, state.opt) {
        return Ok(());
    }

    if ctx.depth() > NESTING_LIMIT {
        log::warn!("Elements nesting limit reached. '{}' is skipped.", node.element_id());
        return Ok(());
    }

    match node.rendering_hint() {
        RenderingHint::Shape => convert_shape(node, state, ctx),
        RenderingHint::Containing => {
            if ctx.rendering_clip_region() && tag_name != ElementId::Use {
                log::warn!("'{}' is not a valid 'clip-path' child.", tag_name);
                return Ok(());
            }

            // `symbol` is rendered only via `use`.
            if tag_name == ElementId::Symbol
                && node.parent_element().and_then(|n| n.tag_name()) != Some(ElementId::Use)
            {
                return Ok(());
            }

            convert_group(node, tag_name, state, ctx)
        }
        RenderingHint::Text | RenderingHint::Image => {
            log::debug!("'{}' elements are not supported. Skipped.", tag_name);
            Ok(())
        }
        // Definitions are rendered only when referenced.
        RenderingHint::Clipping
        | RenderingHint::Masking
        | RenderingHint::Marker
        | RenderingHint::None => Ok(()),
    }
}

fn convert_shape(node: Node, state: &SvgServices, ctx: &mut RenderContext) -> Result<(), Error> {
    let opacity = resolve_opacity(node, ctx);
    if opacity == Opacity::ONE {
        return render_shape(&node, state, ctx);
    }

    ctx.push_group(DrawingGroup {
        opacity,
        ..DrawingGroup::default()
    });
    let res = render_shape(&node, state, ctx);
    let g = ctx.pop_group().unwrap_or_default();
    res?;

    if !g.is_empty() {
        ctx.push_drawing(g.into());
    }

    Ok(())
}

fn resolve_opacity(node: Node, ctx: &RenderContext) -> Opacity {
    // A `clipPath` child cannot have an opacity.
    if ctx.rendering_clip_region() {
        return Opacity::ONE;
    }

    node.attribute::<f64>("opacity")
        .map(|v| Opacity::new_clamped(v as f32))
        .unwrap_or(Opacity::ONE)
}

fn convert_group(
    node: Node,
    tag_name: ElementId,
    state: &SvgServices,
    ctx: &mut RenderContext,
) -> Result<(), Error> {
    let opacity = resolve_opacity(node, ctx);

    let mut transform = super::parse_transform(node, "transform").unwrap_or_default();
    if tag_name == ElementId::Use {
        let x = units::convert_attribute(node, "x", UnitSpace::UserSpace, state, Length::zero());
        let y = units::convert_attribute(node, "y", UnitSpace::UserSpace, state, Length::zero());
        transform = transform.pre_translate(x, y);
    }

    if ["clip-path", "mask"]
        .iter()
        .any(|name| !matches!(node.attribute::<&str>(name), None | Some("none")))
    {
        log::warn!(
            "Clip paths and masks are supported only on shapes. '{}' is rendered without them.",
            node.element_id()
        );
    }

    let mut g = DrawingGroup {
        opacity,
        transform: Some(DrawingTransform::Matrix(transform)).filter(|ts| !ts.is_identity()),
        ..DrawingGroup::default()
    };

    if matches!(tag_name, ElementId::G | ElementId::Use) {
        assign_group_name(node, &mut g, ctx);
    }

    let is_required = g.opacity != Opacity::ONE || g.transform.is_some() || g.name.is_some();

    ctx.push_group(g);
    let res = if tag_name == ElementId::Switch {
        convert_switch_child(node, state, ctx)
    } else {
        convert_children(node, state, ctx)
    };
    let mut g = ctx.pop_group().unwrap_or_default();
    res?;

    if g.is_empty() {
        return Ok(());
    }

    if is_required {
        ctx.push_drawing(g.into());
    } else {
        for child in g.children.drain(..) {
            ctx.push_drawing(child);
        }
    }

    Ok(())
}

fn assign_group_name(node: Node, g: &mut DrawingGroup, ctx: &mut RenderContext) {
    let id = node.element_id();
    if id.trim().is_empty() || ctx.is_registered_id(id) {
        return;
    }

    g.name = Some(id.to_string());
    ctx.register_id(id);

    if ctx.include_runtime() {
        g.metadata.id = Some(id.to_string());
        g.metadata.class = node
            .attribute::<&str>("class")
            .filter(|c| !c.trim().is_empty())
            .map(|c| c.to_string());
    }
}

fn convert_switch_child(
    node: Node,
    state: &SvgServices,
    ctx: &mut RenderContext,
) -> Result<(), Error> {
    match node.children().find(|n| is_condition_passed(*n, state.opt)) {
        Some(child) => convert_element(child, state, ctx),
        None => Ok(()),
    }
}

fn is_condition_passed(node: Node, opt: &Options) -> bool {
    if !node.is_element() {
        return false;
    }

    if node.has_attribute("requiredExtensions") {
        return false;
    }

    // 'The value is a list of feature strings, with the individual values separated by white space.
    // Determines whether all of the named features are supported by the user agent.
    // Only feature strings defined in the Feature String appendix are allowed.
    // If all of the given features are supported, then the attribute evaluates to true;
    // otherwise, the current element and its children are skipped and thus will not be rendered.'
    if let Some(features) = node.attribute::<&str>("requiredFeatures") {
        for feature in features.split(' ') {
            if !FEATURES.contains(&feature) {
                return false;
            }
        }
    }

    is_valid_sys_lang(node, opt)
}

/// SVG spec 5.8.5
fn is_valid_sys_lang(node: Node, opt: &Options) -> bool {
    // 'The attribute value is a comma-separated list of language names
    // as defined in BCP 47.'
    //
    // But we support only simple cases like `en` or `en-US`.
    let langs = match node.attribute::<&str>("systemLanguage") {
        Some(v) => v,
        None => return true,
    };

    for lang in langs.split(',') {
        let lang = lang.trim();

        if opt.languages.iter().any(|v| v == lang) {
            return true;
        }

        if let Some(idx) = lang.bytes().position(|c| c == b'-') {
            let lang_prefix = &lang[..idx];
            if opt.languages.iter().any(|v| v == lang_prefix) {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use tiny_skia_path::Transform;

    use super::*;

    fn convert(text: &str) -> SvgDrawing {
        let doc = Document::parse_str(text).unwrap();
        let opt = Options::default();
        let mut ids = IdRegistry::new();
        convert_doc(&doc, &opt, &mut ids).unwrap()
    }

    #[test]
    fn size_and_view_box() {
        let drawing = convert(
            "<svg xmlns='http://www.w3.org/2000/svg' width='200' height='100' viewBox='0 0 20 10'/>",
        );
        assert_eq!(drawing.size, Size::from_wh(200.0, 100.0).unwrap());
        assert_eq!(
            drawing.view_box,
            NonZeroRect::from_xywh(0.0, 0.0, 20.0, 10.0).unwrap()
        );
        assert_eq!(
            drawing.root.transform,
            Some(DrawingTransform::Matrix(Transform::from_scale(10.0, 10.0)))
        );
    }

    #[test]
    fn default_size() {
        let drawing = convert("<svg xmlns='http://www.w3.org/2000/svg'/>");
        assert_eq!(drawing.size, Size::from_wh(100.0, 100.0).unwrap());
        assert!(drawing.root.transform.is_none());
    }

    #[test]
    fn invalid_size() {
        let doc = Document::parse_str("<svg xmlns='http://www.w3.org/2000/svg' width='0'/>").unwrap();
        let opt = Options::default();
        let mut ids = IdRegistry::new();
        assert!(matches!(
            convert_doc(&doc, &opt, &mut ids),
            Err(Error::InvalidSize)
        ));
    }

    #[test]
    fn plain_groups_are_flattened() {
        let drawing = convert(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <g><rect width='10' height='10'/></g>
                <g id='named'><rect width='10' height='10'/></g>
                <g opacity='0.5'><rect width='10' height='10'/></g>
                <g><text>Text</text></g>
            </svg>",
        );
        assert_eq!(drawing.root.children.len(), 3);
        assert!(matches!(drawing.root.children[0], Drawing::Geometry(_)));
        assert!(drawing.root.find_by_name("named").is_some());
    }

    #[test]
    fn definitions_are_not_rendered() {
        let drawing = convert(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <defs><rect width='10' height='10'/></defs>
                <clipPath><rect width='10' height='10'/></clipPath>
                <mask><rect width='10' height='10'/></mask>
                <symbol><rect width='10' height='10'/></symbol>
            </svg>",
        );
        assert!(drawing.root.is_empty());
    }

    #[test]
    fn use_offset() {
        let drawing = convert(
            "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
                <defs><rect id='r' width='10' height='10'/></defs>
                <use xlink:href='#r' x='5' y='6'/>
            </svg>",
        );
        assert_eq!(drawing.root.children.len(), 1);
        match drawing.root.children[0] {
            Drawing::Group(ref g) => {
                assert_eq!(
                    g.transform,
                    Some(DrawingTransform::Matrix(Transform::from_translate(5.0, 6.0)))
                );
            }
            _ => panic!("expected a group"),
        }
    }

    #[test]
    fn switch_renders_first_valid_child() {
        let drawing = convert(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <switch>
                    <rect id='r1' systemLanguage='ru' width='10' height='10'/>
                    <rect id='r2' systemLanguage='en-US' width='10' height='10'/>
                    <rect id='r3' width='10' height='10'/>
                </switch>
            </svg>",
        );
        assert_eq!(drawing.root.iter().count(), 1);
        assert!(drawing.root.find_by_name("r2").is_some());
    }

    #[test]
    fn shape_opacity() {
        let drawing = convert(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <rect width='10' height='10' opacity='0.25'/>
            </svg>",
        );
        match drawing.root.children[0] {
            Drawing::Group(ref g) => {
                assert_eq!(g.opacity.get(), 0.25);
                assert_eq!(g.children.len(), 1);
            }
            _ => panic!("expected a group"),
        }
    }
}
