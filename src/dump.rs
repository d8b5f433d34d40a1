// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
A plain text representation of a drawing tree.

One object per line, children are indented by two spaces.
The output is stable and is meant for diagnostics and tests.
*/

use tiny_skia_path::{Rect, Transform};

use crate::{
    Brush, Drawing, DrawingGroup, DrawingTransform, FillRule, Geometry, GeometryDrawing,
    GeometryKind, GradientStop, LineCap, LineJoin, Metadata, Pen, SpreadMethod, Stretch,
    SvgDrawing, TileMode, UnitSpace,
};

impl SvgDrawing {
    /// Returns a text representation of the drawing.
    pub fn dump(&self) -> String {
        let mut w = Writer::default();
        w.line(format!(
            "svg size={} view-box={}",
            size_str(self.size.width(), self.size.height()),
            rect_str(self.view_box.to_rect())
        ));
        w.indent += 1;
        w.group(&self.root);
        w.buf
    }
}

/// Returns a text representation of a group and all its children.
pub fn group_to_string(group: &DrawingGroup) -> String {
    let mut w = Writer::default();
    w.group(group);
    w.buf
}

#[derive(Default)]
struct Writer {
    buf: String,
    indent: usize,
}

impl Writer {
    fn line(&mut self, text: String) {
        for _ in 0..self.indent {
            self.buf.push_str("  ");
        }

        self.buf.push_str(&text);
        self.buf.push('\n');
    }

    fn nested<F: FnOnce(&mut Self)>(&mut self, f: F) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    fn drawing(&mut self, drawing: &Drawing) {
        match drawing {
            Drawing::Geometry(ref d) => self.geometry_drawing(d),
            Drawing::Group(ref g) => self.group(g),
        }
    }

    fn group(&mut self, g: &DrawingGroup) {
        let mut text = String::from("group");
        push_name(&mut text, g.name.as_deref(), &g.metadata);
        if let Some(ref ts) = g.transform {
            text.push_str(&format!(" transform={}", transform_str(ts)));
        }
        if g.opacity.get() != 1.0 {
            text.push_str(&format!(" opacity={}", g.opacity.get()));
        }
        self.line(text);

        self.nested(|w| {
            if let Some(ref clip) = g.clip_geometry {
                w.line(format!("clip {}", geometry_str(clip)));
            }

            if let Some(ref mask) = g.opacity_mask {
                w.brush("mask", mask);
            }

            for child in &g.children {
                w.drawing(child);
            }
        });
    }

    fn geometry_drawing(&mut self, d: &GeometryDrawing) {
        let mut text = String::from("geometry");
        push_name(&mut text, d.name.as_deref(), &d.metadata);
        text.push(' ');
        text.push_str(&geometry_str(&d.geometry));
        self.line(text);

        self.nested(|w| {
            if let Some(ref brush) = d.brush {
                w.brush("fill", brush);
            }

            if let Some(ref pen) = d.pen {
                w.pen(pen);
            }
        });
    }

    fn pen(&mut self, pen: &Pen) {
        let mut text = format!(
            "stroke width={} cap={} join={} miter-limit={}",
            pen.thickness,
            cap_str(pen.line_cap),
            join_str(pen.line_join),
            pen.miter_limit
        );
        if let Some(ref list) = pen.dash_array {
            text.push_str(&format!(" dash-array={}", numbers_str(list)));
            text.push_str(&format!(" dash-offset={}", pen.dash_offset));
        }
        self.line(text);

        self.nested(|w| w.brush("paint", &pen.brush));
    }

    fn brush(&mut self, role: &str, brush: &Brush) {
        let mut text = format!("{} ", role);
        match brush {
            Brush::Solid(ref b) => {
                text.push_str(&format!("solid {}", b.color));
            }
            Brush::LinearGradient(ref b) => {
                text.push_str(&format!(
                    "linear-gradient ({} {}) ({} {}) units={} spread={}",
                    b.x1,
                    b.y1,
                    b.x2,
                    b.y2,
                    units_str(b.units),
                    spread_str(b.spread)
                ));
            }
            Brush::RadialGradient(ref b) => {
                text.push_str(&format!(
                    "radial-gradient ({} {}) r={} focal=({} {}) units={} spread={}",
                    b.cx,
                    b.cy,
                    b.r,
                    b.fx,
                    b.fy,
                    units_str(b.units),
                    spread_str(b.spread)
                ));
            }
            Brush::Drawing(ref b) => {
                text.push_str("drawing");
                if let Some(r) = b.viewbox {
                    text.push_str(&format!(
                        " viewbox={} {}",
                        rect_str(r),
                        units_str(b.viewbox_units)
                    ));
                }
                if let Some(r) = b.viewport {
                    text.push_str(&format!(
                        " viewport={} {}",
                        rect_str(r),
                        units_str(b.viewport_units)
                    ));
                }
                if b.stretch != Stretch::None {
                    text.push_str(&format!(" stretch={:?}", b.stretch));
                }
                if b.tile != TileMode::None {
                    text.push_str(" tile");
                }
            }
        }

        if brush.opacity().get() != 1.0 {
            text.push_str(&format!(" opacity={}", brush.opacity().get()));
        }
        if let Some(ts) = brush.transform() {
            text.push_str(&format!(" transform={}", transform_str(ts)));
        }
        self.line(text);

        self.nested(|w| match brush {
            Brush::LinearGradient(ref b) => w.stops(&b.stops),
            Brush::RadialGradient(ref b) => w.stops(&b.stops),
            Brush::Drawing(ref b) => w.group(&b.drawing),
            Brush::Solid(_) => {}
        });
    }

    fn stops(&mut self, stops: &[GradientStop]) {
        for stop in stops {
            self.line(format!("stop {} {}", stop.offset.get(), stop.color));
        }
    }
}

fn push_name(text: &mut String, name: Option<&str>, metadata: &Metadata) {
    if let Some(name) = name {
        text.push_str(&format!(" name={}", name));
    }
    if let Some(ref id) = metadata.id {
        text.push_str(&format!(" id={}", id));
    }
    if let Some(ref class) = metadata.class {
        text.push_str(&format!(" class={}", class));
    }
}

fn geometry_str(g: &Geometry) -> String {
    let mut text = format!(
        "{} rule={} bounds={}",
        match g.kind {
            GeometryKind::Stream => "stream",
            GeometryKind::Figures => "figures",
        },
        match g.fill_rule {
            FillRule::NonZero => "nonzero",
            FillRule::EvenOdd => "evenodd",
        },
        rect_str(g.local_bounds())
    );

    if g.kind == GeometryKind::Figures {
        text.push_str(&format!(" figures={}", g.figure_count()));
    }
    if let Some(ref ts) = g.transform {
        text.push_str(&format!(" transform={}", transform_str(ts)));
    }

    text
}

fn transform_str(ts: &DrawingTransform) -> String {
    match ts {
        DrawingTransform::Matrix(ts) => matrix_str(*ts),
        DrawingTransform::Chain(list) => {
            let list: Vec<_> = list.iter().map(|ts| matrix_str(*ts)).collect();
            format!("chain[{}]", list.join(" "))
        }
    }
}

fn matrix_str(ts: Transform) -> String {
    format!(
        "matrix({} {} {} {} {} {})",
        ts.sx, ts.ky, ts.kx, ts.sy, ts.tx, ts.ty
    )
}

fn rect_str(r: Rect) -> String {
    format!("({} {} {} {})", r.x(), r.y(), r.width(), r.height())
}

fn size_str(w: f32, h: f32) -> String {
    format!("{}x{}", w, h)
}

fn numbers_str(list: &[f32]) -> String {
    let list: Vec<_> = list.iter().map(|n| n.to_string()).collect();
    list.join(",")
}

fn units_str(units: UnitSpace) -> &'static str {
    match units {
        UnitSpace::UserSpace => "user-space",
        UnitSpace::ObjectBoundingBox => "bbox",
    }
}

fn spread_str(spread: SpreadMethod) -> &'static str {
    match spread {
        SpreadMethod::Pad => "pad",
        SpreadMethod::Reflect => "reflect",
        SpreadMethod::Repeat => "repeat",
    }
}

fn cap_str(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Butt => "butt",
        LineCap::Round => "round",
        LineCap::Square => "square",
    }
}

fn join_str(join: LineJoin) -> &'static str {
    match join {
        LineJoin::Miter => "miter",
        LineJoin::MiterClip => "miter-clip",
        LineJoin::Round => "round",
        LineJoin::Bevel => "bevel",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Options;

    #[test]
    fn solid_rect() {
        let drawing = SvgDrawing::from_str(
            "<svg xmlns='http://www.w3.org/2000/svg' width='20' height='10'>
                <rect id='r' x='1' y='2' width='3' height='4' fill='#ff0000' stroke='#000000'/>
            </svg>",
            &Options::default(),
        )
        .unwrap();

        assert_eq!(
            drawing.dump(),
            "svg size=20x10 view-box=(0 0 20 10)
  group
    geometry name=r stream rule=nonzero bounds=(1 2 3 4)
      fill solid #ff0000
      stroke width=1 cap=butt join=miter miter-limit=4
        paint solid #000000
"
        );
    }

    #[test]
    fn transforms() {
        let mut g = DrawingGroup::default();
        g.transform = Some(DrawingTransform::Chain(vec![
            Transform::from_scale(2.0, 2.0),
            Transform::from_translate(1.0, 0.0),
        ]));
        assert_eq!(
            group_to_string(&g),
            "group transform=chain[matrix(2 0 0 2 0 0) matrix(1 0 0 1 1 0)]\n"
        );
    }
}
