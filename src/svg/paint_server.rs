// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use strict_num::ApproxEqUlps;
use svgnode::{ElementId, FromValue, Node};
use svgtypes::{Length, LengthUnit as Unit};
use tiny_skia_path::{NonZeroRect, Rect};

use super::{render, shapes, units, SvgServices};
use crate::*;

impl<'a, 'input: 'a> FromValue<'a, 'input> for LineCap {
    fn parse(_: Node, _: &str, value: &str) -> Option<Self> {
        match value {
            "butt" => Some(LineCap::Butt),
            "round" => Some(LineCap::Round),
            "square" => Some(LineCap::Square),
            _ => None,
        }
    }
}

impl<'a, 'input: 'a> FromValue<'a, 'input> for LineJoin {
    fn parse(_: Node, _: &str, value: &str) -> Option<Self> {
        match value {
            "miter" => Some(LineJoin::Miter),
            "miter-clip" => Some(LineJoin::MiterClip),
            "round" => Some(LineJoin::Round),
            "bevel" => Some(LineJoin::Bevel),
            _ => None,
        }
    }
}

impl<'a, 'input: 'a> FromValue<'a, 'input> for SpreadMethod {
    fn parse(_: Node, _: &str, value: &str) -> Option<Self> {
        match value {
            "pad" => Some(SpreadMethod::Pad),
            "reflect" => Some(SpreadMethod::Reflect),
            "repeat" => Some(SpreadMethod::Repeat),
            _ => None,
        }
    }
}

pub(crate) fn resolve_fill(
    node: Node,
    state: &SvgServices,
    ctx: &mut RenderContext,
) -> Result<Option<Brush>, Error> {
    if ctx.rendering_clip_region() {
        // A `clipPath` child can be filled only with a black color.
        return Ok(Some(Brush::Solid(SolidBrush::new(Color::black()))));
    }

    let brush = if let Some(n) = node.ancestors().find(|n| n.has_attribute("fill")) {
        convert_paint(n, node, "fill", state, ctx)?
    } else {
        Some(Brush::Solid(SolidBrush::new(Color::black())))
    };

    Ok(brush.map(|b| with_opacity(b, resolve_opacity(node, "fill-opacity"))))
}

pub(crate) fn resolve_stroke(
    node: Node,
    state: &SvgServices,
    ctx: &mut RenderContext,
) -> Result<Option<Pen>, Error> {
    if ctx.rendering_clip_region() {
        // A `clipPath` child cannot be stroked.
        return Ok(None);
    }

    let brush = match node.ancestors().find(|n| n.has_attribute("stroke")) {
        Some(n) => convert_paint(n, node, "stroke", state, ctx)?,
        None => None,
    };
    let brush = match brush {
        Some(v) => with_opacity(v, resolve_opacity(node, "stroke-opacity")),
        None => return Ok(None),
    };

    let thickness = units::resolve_length(node, "stroke-width", state, 1.0);
    if !thickness.is_valid_length() {
        return Ok(None);
    }

    // Must be bigger than 1.
    let miter_limit = node.find_attribute::<f64>("stroke-miterlimit").unwrap_or(4.0) as f32;
    let miter_limit = if miter_limit < 1.0 { 1.0 } else { miter_limit };

    Ok(Some(Pen {
        brush,
        thickness,
        line_cap: node.find_attribute("stroke-linecap").unwrap_or_default(),
        line_join: node.find_attribute("stroke-linejoin").unwrap_or_default(),
        miter_limit,
        dash_array: conv_dasharray(node, state),
        dash_offset: units::resolve_length(node, "stroke-dashoffset", state, 0.0),
    }))
}

fn resolve_opacity(node: Node, name: &str) -> Opacity {
    node.find_attribute::<f64>(name)
        .map(|v| Opacity::new_clamped(v as f32))
        .unwrap_or(Opacity::ONE)
}

fn with_opacity(mut brush: Brush, opacity: Opacity) -> Brush {
    match brush {
        Brush::Solid(ref mut b) => b.opacity = b.opacity * opacity,
        Brush::LinearGradient(ref mut b) => b.opacity = b.opacity * opacity,
        Brush::RadialGradient(ref mut b) => b.opacity = b.opacity * opacity,
        Brush::Drawing(ref mut b) => b.opacity = b.opacity * opacity,
    }

    brush
}

/// Converts a paint set on `node` for the `shape` element.
fn convert_paint(
    node: Node,
    shape: Node,
    name: &str,
    state: &SvgServices,
    ctx: &mut RenderContext,
) -> Result<Option<Brush>, Error> {
    let value: &str = match node.attribute(name) {
        Some(v) => v,
        None => return Ok(None),
    };

    let paint = match svgtypes::Paint::from_str(value) {
        Ok(v) => v,
        Err(_) => {
            if name == "fill" {
                log::warn!(
                    "Failed to parse fill value: '{}'. Fallback to black.",
                    value
                );
                svgtypes::Paint::Color(svgtypes::Color::black())
            } else {
                log::warn!(
                    "Failed to parse stroke value: '{}'. Fallback to no stroke.",
                    value
                );
                return Ok(None);
            }
        }
    };

    let brush = match paint {
        svgtypes::Paint::None => None,
        // Already resolved by svgnode.
        svgtypes::Paint::Inherit => None,
        svgtypes::Paint::ContextFill | svgtypes::Paint::ContextStroke => {
            log::warn!("Context paint is not supported. Skipped.");
            None
        }
        svgtypes::Paint::CurrentColor => Some(solid(current_color(node))),
        svgtypes::Paint::Color(c) => Some(solid(c.into())),
        svgtypes::Paint::FuncIRI(func_iri, fallback) => {
            let link = match node.document().element_by_id(func_iri) {
                Some(v) => v,
                None => return Ok(from_fallback(node, fallback)),
            };

            let tag_name = match link.tag_name() {
                Some(v) if v.is_paint_server() => v,
                _ => {
                    log::warn!("'{}' cannot be used to {} a shape.", func_iri, name);
                    return Ok(None);
                }
            };

            match convert(link, tag_name, state, ctx)? {
                Some(ServerOrColor::Server(brush)) => {
                    // Object bounding box units require a non-degenerate shape.
                    if server_units(&brush) == UnitSpace::ObjectBoundingBox && !has_bbox(shape, state)
                    {
                        from_fallback(node, fallback)
                    } else {
                        Some(brush)
                    }
                }
                Some(ServerOrColor::Color(color)) => Some(solid(color)),
                None => from_fallback(node, fallback),
            }
        }
    };

    Ok(brush)
}

fn solid(color: Color) -> Brush {
    Brush::Solid(SolidBrush::new(color))
}

fn current_color(node: Node) -> Color {
    node.find_attribute::<svgtypes::Color>("color")
        .unwrap_or_else(svgtypes::Color::black)
        .into()
}

fn from_fallback(node: Node, fallback: Option<svgtypes::PaintFallback>) -> Option<Brush> {
    match fallback? {
        svgtypes::PaintFallback::None => None,
        svgtypes::PaintFallback::CurrentColor => Some(solid(current_color(node))),
        svgtypes::PaintFallback::Color(c) => Some(solid(c.into())),
    }
}

fn has_bbox(shape: Node, state: &SvgServices) -> bool {
    shapes::convert(shape, state)
        .and_then(|path| path.compute_tight_bounds())
        .and_then(|r| r.to_non_zero_rect())
        .is_some()
}

fn server_units(brush: &Brush) -> UnitSpace {
    match brush {
        Brush::Solid(_) => UnitSpace::UserSpace,
        Brush::LinearGradient(ref b) => b.units,
        Brush::RadialGradient(ref b) => b.units,
        Brush::Drawing(ref b) => b.viewport_units,
    }
}

enum ServerOrColor {
    Server(Brush),
    Color(Color),
}

fn convert(
    node: Node,
    tag_name: ElementId,
    state: &SvgServices,
    ctx: &mut RenderContext,
) -> Result<Option<ServerOrColor>, Error> {
    let server = match tag_name {
        ElementId::LinearGradient => convert_linear(node, state),
        ElementId::RadialGradient => convert_radial(node, state),
        ElementId::Pattern => convert_pattern(node, state, ctx)?,
        _ => None,
    };

    Ok(server)
}

#[inline(never)]
fn convert_linear(node: Node, state: &SvgServices) -> Option<ServerOrColor> {
    let stops = convert_stops(find_gradient_with_stops(node)?);
    if stops.len() < 2 {
        return stops_to_color(&stops);
    }

    let units = convert_units(node, "gradientUnits", UnitSpace::ObjectBoundingBox);
    let transform = resolve_transform(node, "gradientTransform");

    let gradient = LinearGradientBrush {
        x1: resolve_number(node, "x1", units, state, Length::zero()),
        y1: resolve_number(node, "y1", units, state, Length::zero()),
        x2: resolve_number(node, "x2", units, state, Length::new(100.0, Unit::Percent)),
        y2: resolve_number(node, "y2", units, state, Length::zero()),
        stops,
        units,
        spread: convert_spread_method(node),
        opacity: Opacity::ONE,
        transform,
    };

    Some(ServerOrColor::Server(Brush::LinearGradient(gradient)))
}

#[inline(never)]
fn convert_radial(node: Node, state: &SvgServices) -> Option<ServerOrColor> {
    let stops = convert_stops(find_gradient_with_stops(node)?);
    if stops.len() < 2 {
        return stops_to_color(&stops);
    }

    let units = convert_units(node, "gradientUnits", UnitSpace::ObjectBoundingBox);
    let r = resolve_number(node, "r", units, state, Length::new(50.0, Unit::Percent));

    // 'A value of zero will cause the area to be painted as a single color
    // using the color and opacity of the last gradient stop.'
    //
    // https://www.w3.org/TR/SVG11/pservers.html#RadialGradientElementRAttribute
    if !r.is_valid_length() {
        return stops.last().map(|stop| ServerOrColor::Color(stop.color));
    }

    let cx = resolve_number(node, "cx", units, state, Length::new(50.0, Unit::Percent));
    let cy = resolve_number(node, "cy", units, state, Length::new(50.0, Unit::Percent));
    let fx = resolve_number(node, "fx", units, state, Length::new_number(cx as f64));
    let fy = resolve_number(node, "fy", units, state, Length::new_number(cy as f64));

    let gradient = RadialGradientBrush {
        cx,
        cy,
        r,
        fx,
        fy,
        stops,
        units,
        spread: convert_spread_method(node),
        opacity: Opacity::ONE,
        transform: resolve_transform(node, "gradientTransform"),
    };

    Some(ServerOrColor::Server(Brush::RadialGradient(gradient)))
}

#[inline(never)]
fn convert_pattern(
    node: Node,
    state: &SvgServices,
    ctx: &mut RenderContext,
) -> Result<Option<ServerOrColor>, Error> {
    let node_with_children = match find_pattern_with_children(node) {
        Some(v) => v,
        None => return Ok(None),
    };

    let units = convert_units(node, "patternUnits", UnitSpace::ObjectBoundingBox);
    let content_units = convert_units(node, "patternContentUnits", UnitSpace::UserSpace);

    let rect = NonZeroRect::from_xywh(
        resolve_number(node, "x", units, state, Length::zero()),
        resolve_number(node, "y", units, state, Length::zero()),
        resolve_number(node, "width", units, state, Length::zero()),
        resolve_number(node, "height", units, state, Length::zero()),
    );
    let rect = match rect.log_none(|| {
        log::warn!(
            "Pattern '{}' has an invalid size. Skipped.",
            node.element_id()
        )
    }) {
        Some(v) => v,
        None => return Ok(None),
    };

    ctx.push_group(DrawingGroup::default());
    let res = render::convert_children(node_with_children, state, ctx);
    let content = ctx.pop_group().unwrap_or_default();
    res?;

    if content.is_empty() {
        return Ok(None);
    }

    let mut brush = DrawingBrush::new(content);
    brush.viewport = Some(rect.to_rect());
    brush.viewport_units = units;
    brush.tile = TileMode::Tile;
    brush.transform = resolve_transform(node, "patternTransform");

    let view_box = resolve_attr(node, "viewBox").attribute::<svgtypes::ViewBox>("viewBox");
    let view_box = view_box.and_then(|vb| {
        Rect::from_xywh(vb.x as f32, vb.y as f32, vb.w as f32, vb.h as f32)
    });
    if let Some(vb) = view_box {
        let aspect: svgtypes::AspectRatio = resolve_attr(node, "preserveAspectRatio")
            .attribute("preserveAspectRatio")
            .unwrap_or_default();
        brush.viewbox = Some(vb);
        brush.viewbox_units = UnitSpace::UserSpace;
        brush.stretch = Stretch::from(aspect);
    } else {
        brush.viewbox = Rect::from_xywh(0.0, 0.0, rect.width(), rect.height());
        brush.viewbox_units = content_units;
    }

    Ok(Some(ServerOrColor::Server(Brush::Drawing(brush))))
}

fn resolve_transform(node: Node, name: &str) -> Option<DrawingTransform> {
    super::parse_transform(resolve_attr(node, name), name)
        .filter(|ts| !ts.is_identity())
        .map(DrawingTransform::Matrix)
}

fn convert_spread_method(node: Node) -> SpreadMethod {
    let node = resolve_attr(node, "spreadMethod");
    node.attribute("spreadMethod").unwrap_or_default()
}

fn convert_units(node: Node, name: &str, def: UnitSpace) -> UnitSpace {
    let node = resolve_attr(node, name);
    super::convert_units(node, name, def)
}

fn find_gradient_with_stops<'a, 'input: 'a>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    for link in node.href_iter() {
        let tag_name = link.tag_name()?;
        if !tag_name.is_gradient() {
            log::warn!(
                "Gradient '{}' cannot reference '{}' via 'xlink:href'.",
                node.element_id(),
                tag_name
            );
            return None;
        }

        if link.children().any(|n| n.tag_name() == Some(ElementId::Stop)) {
            return Some(link);
        }
    }

    None
}

fn find_pattern_with_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> Option<Node<'a, 'input>> {
    for link in node.href_iter() {
        if link.tag_name() != Some(ElementId::Pattern) {
            log::warn!(
                "Pattern '{}' cannot reference '{:?}' via 'xlink:href'.",
                node.element_id(),
                link.tag_name()
            );
            return None;
        }

        if link.has_children() {
            return Some(link);
        }
    }

    None
}

fn convert_stops(grad: Node) -> Vec<GradientStop> {
    let mut stops = Vec::new();

    {
        let mut prev_offset = Length::zero();
        for stop in grad.children() {
            if stop.tag_name() != Some(ElementId::Stop) {
                log::warn!("Invalid gradient child: '{:?}'.", stop.tag_name());
                continue;
            }

            // `number` can be either a number or a percentage.
            let offset = stop.attribute("offset").unwrap_or(prev_offset);
            let offset = match offset.unit {
                Unit::None => offset.number,
                Unit::Percent => offset.number / 100.0,
                _ => prev_offset.number,
            };
            prev_offset = Length::new_number(offset);
            let offset = crate::f32_bound(0.0, offset as f32, 1.0);

            let color: Color = match stop.attribute("stop-color") {
                Some("currentColor") => current_color(stop),
                Some(value) => {
                    if let Ok(c) = svgtypes::Color::from_str(value) {
                        c.into()
                    } else {
                        log::warn!("Failed to parse stop-color value: '{}'.", value);
                        Color::black()
                    }
                }
                _ => Color::black(),
            };

            let stop_opacity = stop.attribute::<f64>("stop-opacity").unwrap_or(1.0) as f32;
            stops.push(GradientStop {
                offset: StopOffset::new_clamped(offset),
                color: color.with_opacity(stop_opacity),
            });
        }
    }

    // Remove stops with equal offset.
    //
    // Example:
    // offset="0.5"
    // offset="0.7"
    // offset="0.7" <-- this one should be removed
    // offset="0.7"
    // offset="0.9"
    if stops.len() >= 3 {
        let mut i = 0;
        while i < stops.len() - 2 {
            let offset1 = stops[i].offset.get();
            let offset2 = stops[i + 1].offset.get();
            let offset3 = stops[i + 2].offset.get();

            if offset1.approx_eq_ulps(&offset2, 4) && offset2.approx_eq_ulps(&offset3, 4) {
                // Remove offset in the middle.
                stops.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }

    // Shift equal offsets.
    //
    // From:
    // offset="0.5"
    // offset="0.7"
    // offset="0.7"
    //
    // To:
    // offset="0.5"
    // offset="0.699999999"
    // offset="0.7"
    {
        let mut i = 1;
        while i < stops.len() {
            let offset1 = stops[i - 1].offset.get();
            let offset2 = stops[i].offset.get();

            // Next offset must be bigger than the previous one.
            if offset1 > offset2 || offset1.approx_eq_ulps(&offset2, 4) {
                stops[i - 1].offset = StopOffset::new_clamped(offset1 - f32::EPSILON);
                stops[i].offset = StopOffset::new_clamped(offset1);
            }

            i += 1;
        }
    }

    stops
}

#[inline(never)]
fn resolve_number(
    node: Node,
    name: &str,
    units: UnitSpace,
    state: &SvgServices,
    def: Length,
) -> f32 {
    units::convert_attribute(resolve_attr(node, name), name, units, state, def)
}

fn resolve_attr<'a, 'input: 'a>(node: Node<'a, 'input>, name: &str) -> Node<'a, 'input> {
    if node.has_attribute(name) {
        return node;
    }

    let own_tag = node.tag_name();
    for link in node.href_iter() {
        let tag_name = match link.tag_name() {
            Some(v) => v,
            None => return node,
        };

        let is_shared = match tag_name {
            // Coordinates can be resolved only from an element of the same type.
            ElementId::LinearGradient | ElementId::RadialGradient => {
                matches!(name, "gradientUnits" | "spreadMethod" | "gradientTransform")
                    || Some(tag_name) == own_tag
            }
            ElementId::Pattern => Some(tag_name) == own_tag,
            _ => false,
        };

        if !is_shared {
            break;
        }

        if link.has_attribute(name) {
            return link;
        }
    }

    node
}

fn stops_to_color(stops: &[GradientStop]) -> Option<ServerOrColor> {
    stops.first().map(|stop| ServerOrColor::Color(stop.color))
}

// Prepare the 'stroke-dasharray' according to:
// https://www.w3.org/TR/SVG11/painting.html#StrokeDasharrayProperty
fn conv_dasharray(node: Node, state: &SvgServices) -> Option<Vec<f32>> {
    let node = node
        .ancestors()
        .find(|n| n.has_attribute("stroke-dasharray"))?;
    let list = units::convert_list(node, "stroke-dasharray", state)?;

    // `A negative value is an error`
    if list.iter().any(|n| n.is_sign_negative()) {
        return None;
    }

    // `If the sum of the values is zero, then the stroke is rendered
    // as if a value of none were specified.`
    let sum: f32 = list.iter().sum();
    if sum.approx_eq_ulps(&0.0, 4) {
        return None;
    }

    // `If an odd number of values is provided, then the list of values
    // is repeated to yield an even number of values.`
    if list.len() % 2 != 0 {
        let mut tmp_list = list.clone();
        tmp_list.extend_from_slice(&list);
        return Some(tmp_list);
    }

    Some(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgnode::Document;

    fn resolve(text: &str) -> (Option<Brush>, Option<Pen>) {
        let doc = Document::parse_str(text).unwrap();
        let opt = Options::default();
        let state = SvgServices::new(&opt, NonZeroRect::from_xywh(0.0, 0.0, 100.0, 100.0).unwrap());
        let mut ids = IdRegistry::new();
        let mut ctx = RenderContext::new(&opt, &mut ids);
        let node = doc.element_by_id("s").unwrap();
        let fill = resolve_fill(node, &state, &mut ctx).unwrap();
        let stroke = resolve_stroke(node, &state, &mut ctx).unwrap();
        (fill, stroke)
    }

    #[test]
    fn default_fill_is_black() {
        let (fill, stroke) =
            resolve("<svg xmlns='http://www.w3.org/2000/svg'><rect id='s'/></svg>");
        match fill {
            Some(Brush::Solid(ref b)) => assert_eq!(b.color, Color::black()),
            _ => panic!("expected a solid brush"),
        }
        assert!(stroke.is_none());
    }

    #[test]
    fn inherited_current_color() {
        let (fill, _) = resolve(
            "<svg xmlns='http://www.w3.org/2000/svg' color='#00ff00'>
                <g fill='currentColor'><rect id='s'/></g>
            </svg>",
        );
        match fill {
            Some(Brush::Solid(ref b)) => {
                assert_eq!(b.color.to_rgba8(), rgb::RGBA8::new(0, 255, 0, 255))
            }
            _ => panic!("expected a solid brush"),
        }
    }

    #[test]
    fn fill_opacity() {
        let (fill, _) = resolve(
            "<svg xmlns='http://www.w3.org/2000/svg'><rect id='s' fill='red' fill-opacity='0.5'/></svg>",
        );
        assert_eq!(fill.unwrap().opacity().get(), 0.5);
    }

    #[test]
    fn stroke_properties() {
        let (_, stroke) = resolve(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <rect id='s' stroke='blue' stroke-width='4' stroke-linecap='round'
                      stroke-miterlimit='0.5' stroke-dasharray='1 2 3'/>
            </svg>",
        );
        let pen = stroke.unwrap();
        assert_eq!(pen.thickness, 4.0);
        assert_eq!(pen.line_cap, LineCap::Round);
        assert_eq!(pen.line_join, LineJoin::Miter);
        assert_eq!(pen.miter_limit, 1.0);
        assert_eq!(pen.dash_array, Some(vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]));
    }

    #[test]
    fn zero_stroke_width() {
        let (_, stroke) = resolve(
            "<svg xmlns='http://www.w3.org/2000/svg'><rect id='s' stroke='blue' stroke-width='0'/></svg>",
        );
        assert!(stroke.is_none());
    }

    #[test]
    fn linear_gradient() {
        let (fill, _) = resolve(
            "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
                <linearGradient id='lg1' spreadMethod='reflect'>
                    <stop offset='0' stop-color='red'/>
                    <stop offset='1' stop-color='blue'/>
                </linearGradient>
                <linearGradient id='lg2' xlink:href='#lg1' gradientTransform='scale(2)'/>
                <rect id='s' width='10' height='10' fill='url(#lg2)'/>
            </svg>",
        );
        match fill {
            Some(Brush::LinearGradient(ref lg)) => {
                assert_eq!(lg.stops.len(), 2);
                assert_eq!(lg.units, UnitSpace::ObjectBoundingBox);
                assert_eq!(lg.spread, SpreadMethod::Reflect);
                assert_eq!(lg.x2, 1.0);
                assert_eq!(
                    lg.transform,
                    Some(DrawingTransform::Matrix(tiny_skia_path::Transform::from_scale(
                        2.0, 2.0
                    )))
                );
            }
            _ => panic!("expected a linear gradient"),
        }
    }

    #[test]
    fn single_stop_gradient_is_a_color() {
        let (fill, _) = resolve(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <radialGradient id='rg'><stop offset='0' stop-color='#0000ff'/></radialGradient>
                <rect id='s' width='10' height='10' fill='url(#rg)'/>
            </svg>",
        );
        match fill {
            Some(Brush::Solid(ref b)) => {
                assert_eq!(b.color.to_rgba8(), rgb::RGBA8::new(0, 0, 255, 255))
            }
            _ => panic!("expected a solid brush"),
        }
    }

    #[test]
    fn missing_link_uses_fallback() {
        let (fill, stroke) = resolve(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <rect id='s' width='10' height='10' fill='url(#missing) #ff0000' stroke='url(#missing)'/>
            </svg>",
        );
        assert!(matches!(fill, Some(Brush::Solid(_))));
        assert!(stroke.is_none());
    }

    #[test]
    fn bbox_gradient_on_a_flat_shape() {
        let (_, stroke) = resolve(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <linearGradient id='lg'>
                    <stop offset='0' stop-color='red'/>
                    <stop offset='1' stop-color='blue'/>
                </linearGradient>
                <line id='s' x2='10' stroke='url(#lg) green'/>
            </svg>",
        );
        assert!(matches!(stroke.unwrap().brush, Brush::Solid(_)));
    }

    #[test]
    fn pattern() {
        let (fill, _) = resolve(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <pattern id='p' width='0.5' height='0.5'>
                    <rect width='5' height='5' fill='green'/>
                </pattern>
                <rect id='s' width='10' height='10' fill='url(#p)'/>
            </svg>",
        );
        match fill {
            Some(Brush::Drawing(ref b)) => {
                assert_eq!(b.drawing.children.len(), 1);
                assert_eq!(b.tile, TileMode::Tile);
                assert_eq!(b.viewport_units, UnitSpace::ObjectBoundingBox);
                assert_eq!(b.viewport, Rect::from_xywh(0.0, 0.0, 0.5, 0.5));
            }
            _ => panic!("expected a drawing brush"),
        }
    }

    #[test]
    fn clip_mode() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'><rect id='s' fill='red' stroke='red'/></svg>",
        )
        .unwrap();
        let opt = Options::default();
        let state = SvgServices::new(&opt, NonZeroRect::from_xywh(0.0, 0.0, 100.0, 100.0).unwrap());
        let mut ids = IdRegistry::new();
        let mut ctx = RenderContext::new(&opt, &mut ids);
        ctx.set_rendering_clip_region(true);
        let node = doc.element_by_id("s").unwrap();
        match resolve_fill(node, &state, &mut ctx).unwrap() {
            Some(Brush::Solid(ref b)) => assert_eq!(b.color, Color::black()),
            _ => panic!("expected a solid brush"),
        }
        assert!(resolve_stroke(node, &state, &mut ctx).unwrap().is_none());
    }
}
