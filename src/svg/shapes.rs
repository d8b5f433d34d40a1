// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use strict_num::ApproxEqUlps;
use svgnode::{ElementId, Node};
use svgtypes::Length;
use tiny_skia_path::{Path, PathBuilder, Rect};

use super::{units, SvgServices};
use crate::IsValidLength;

pub(crate) fn convert(node: Node, state: &SvgServices) -> Option<Path> {
    match node.tag_name()? {
        ElementId::Rect => convert_rect(node, state),
        ElementId::Circle => convert_circle(node, state),
        ElementId::Ellipse => convert_ellipse(node, state),
        ElementId::Line => convert_line(node, state),
        ElementId::Polyline => convert_polyline(node),
        ElementId::Polygon => convert_polygon(node),
        ElementId::Path => convert_path(node),
        _ => None,
    }
}

fn user_length(node: Node, name: &str, state: &SvgServices) -> f32 {
    units::convert_attribute(node, name, crate::UnitSpace::UserSpace, state, Length::zero())
}

pub(crate) fn convert_path(node: Node) -> Option<Path> {
    let value: &str = node.attribute("d")?;
    let mut builder = PathBuilder::new();
    for segment in svgtypes::SimplifyingPathParser::from(value) {
        // Render everything up to the first error.
        let segment = match segment {
            Ok(v) => v,
            Err(_) => break,
        };

        match segment {
            svgtypes::SimplePathSegment::MoveTo { x, y } => {
                builder.move_to(x as f32, y as f32);
            }
            svgtypes::SimplePathSegment::LineTo { x, y } => {
                builder.line_to(x as f32, y as f32);
            }
            svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                builder.quad_to(x1 as f32, y1 as f32, x as f32, y as f32);
            }
            svgtypes::SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                builder.cubic_to(
                    x1 as f32, y1 as f32, x2 as f32, y2 as f32, x as f32, y as f32,
                );
            }
            svgtypes::SimplePathSegment::ClosePath => {
                builder.close();
            }
        }
    }

    builder.finish()
}

fn convert_rect(node: Node, state: &SvgServices) -> Option<Path> {
    // 'width' and 'height' attributes must be positive and non-zero.
    let width = user_length(node, "width", state);
    let height = user_length(node, "height", state);
    if !width.is_valid_length() {
        log::warn!(
            "Rect '{}' has an invalid 'width' value. Skipped.",
            node.element_id()
        );
        return None;
    }
    if !height.is_valid_length() {
        log::warn!(
            "Rect '{}' has an invalid 'height' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    let x = user_length(node, "x", state);
    let y = user_length(node, "y", state);

    let (rx, ry) = resolve_rx_ry(node, state);

    // Clamping must happen after resolving.
    let rx = rx.min(width / 2.0);
    let ry = ry.min(height / 2.0);

    let path = if rx.approx_eq_ulps(&0.0, 4) || ry.approx_eq_ulps(&0.0, 4) {
        PathBuilder::from_rect(Rect::from_xywh(x, y, width, height)?)
    } else {
        let mut builder = PathBuilder::new();
        builder.move_to(x + rx, y);

        builder.line_to(x + width - rx, y);
        builder.arc_to(rx, ry, 0.0, false, true, x + width, y + ry);

        builder.line_to(x + width, y + height - ry);
        builder.arc_to(rx, ry, 0.0, false, true, x + width - rx, y + height);

        builder.line_to(x + rx, y + height);
        builder.arc_to(rx, ry, 0.0, false, true, x, y + height - ry);

        builder.line_to(x, y + ry);
        builder.arc_to(rx, ry, 0.0, false, true, x + rx, y);

        builder.close();

        builder.finish()?
    };

    Some(path)
}

fn resolve_rx_ry(node: Node, state: &SvgServices) -> (f32, f32) {
    // Negative values are ignored.
    let rx_opt = node
        .attribute::<Length>("rx")
        .filter(|v| !v.number.is_sign_negative());
    let ry_opt = node
        .attribute::<Length>("ry")
        .filter(|v| !v.number.is_sign_negative());

    match (rx_opt, ry_opt) {
        (None, None) => (0.0, 0.0),
        (Some(rx), None) => {
            let rx = units::convert_user_length(rx, node, "rx", state);
            (rx, rx)
        }
        (None, Some(ry)) => {
            let ry = units::convert_user_length(ry, node, "ry", state);
            (ry, ry)
        }
        (Some(rx), Some(ry)) => {
            let rx = units::convert_user_length(rx, node, "rx", state);
            let ry = units::convert_user_length(ry, node, "ry", state);
            (rx, ry)
        }
    }
}

fn convert_line(node: Node, state: &SvgServices) -> Option<Path> {
    let x1 = user_length(node, "x1", state);
    let y1 = user_length(node, "y1", state);
    let x2 = user_length(node, "x2", state);
    let y2 = user_length(node, "y2", state);

    let mut builder = PathBuilder::new();
    builder.move_to(x1, y1);
    builder.line_to(x2, y2);
    builder.finish()
}

fn convert_polyline(node: Node) -> Option<Path> {
    let builder = points_to_path(node, "Polyline")?;
    builder.finish()
}

fn convert_polygon(node: Node) -> Option<Path> {
    let mut builder = points_to_path(node, "Polygon")?;
    builder.close();
    builder.finish()
}

fn points_to_path(node: Node, eid: &str) -> Option<PathBuilder> {
    use svgtypes::PointsParser;

    let mut builder = PathBuilder::new();
    match node.attribute::<&str>("points") {
        Some(text) => {
            for (x, y) in PointsParser::from(text) {
                if builder.is_empty() {
                    builder.move_to(x as f32, y as f32);
                } else {
                    builder.line_to(x as f32, y as f32);
                }
            }
        }
        _ => {
            log::warn!(
                "{} '{}' has an invalid 'points' value. Skipped.",
                eid,
                node.element_id()
            );
            return None;
        }
    };

    // 'polyline' and 'polygon' elements must contain at least 2 points.
    if builder.len() < 2 {
        log::warn!(
            "{} '{}' has less than 2 points. Skipped.",
            eid,
            node.element_id()
        );
        return None;
    }

    Some(builder)
}

fn convert_circle(node: Node, state: &SvgServices) -> Option<Path> {
    let cx = user_length(node, "cx", state);
    let cy = user_length(node, "cy", state);
    let r = user_length(node, "r", state);

    if !r.is_valid_length() {
        log::warn!(
            "Circle '{}' has an invalid 'r' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    ellipse_to_path(cx, cy, r, r)
}

fn convert_ellipse(node: Node, state: &SvgServices) -> Option<Path> {
    let cx = user_length(node, "cx", state);
    let cy = user_length(node, "cy", state);
    let (rx, ry) = resolve_rx_ry(node, state);

    if !rx.is_valid_length() {
        log::warn!(
            "Ellipse '{}' has an invalid 'rx' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    if !ry.is_valid_length() {
        log::warn!(
            "Ellipse '{}' has an invalid 'ry' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    ellipse_to_path(cx, cy, rx, ry)
}

fn ellipse_to_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<Path> {
    let mut builder = PathBuilder::new();
    builder.move_to(cx + rx, cy);
    builder.arc_to(rx, ry, 0.0, false, true, cx, cy + ry);
    builder.arc_to(rx, ry, 0.0, false, true, cx - rx, cy);
    builder.arc_to(rx, ry, 0.0, false, true, cx, cy - ry);
    builder.arc_to(rx, ry, 0.0, false, true, cx + rx, cy);
    builder.close();
    builder.finish()
}

trait PathBuilderExt {
    #[allow(clippy::too_many_arguments)]
    fn arc_to(
        &mut self,
        rx: f32,
        ry: f32,
        x_axis_rotation: f32,
        large_arc: bool,
        sweep: bool,
        x: f32,
        y: f32,
    );
}

impl PathBuilderExt for PathBuilder {
    fn arc_to(
        &mut self,
        rx: f32,
        ry: f32,
        x_axis_rotation: f32,
        large_arc: bool,
        sweep: bool,
        x: f32,
        y: f32,
    ) {
        let prev = match self.last_point() {
            Some(v) => v,
            None => return,
        };

        let svg_arc = kurbo::SvgArc {
            from: kurbo::Point::new(prev.x as f64, prev.y as f64),
            to: kurbo::Point::new(x as f64, y as f64),
            radii: kurbo::Vec2::new(rx as f64, ry as f64),
            x_rotation: (x_axis_rotation as f64).to_radians(),
            large_arc,
            sweep,
        };

        match kurbo::Arc::from_svg_arc(&svg_arc) {
            Some(arc) => {
                arc.to_cubic_beziers(0.1, |p1, p2, p| {
                    self.cubic_to(
                        p1.x as f32,
                        p1.y as f32,
                        p2.x as f32,
                        p2.y as f32,
                        p.x as f32,
                        p.y as f32,
                    );
                });
            }
            None => {
                self.line_to(x, y);
            }
        }
    }
}
