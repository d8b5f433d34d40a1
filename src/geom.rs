// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use svgtypes::{Align, AspectRatio};
use tiny_skia_path::{NonZeroRect, Path, PathSegment, Rect, Size, Transform};

/// A coordinate system of a clip path, mask or paint server.
///
/// `units` in SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnitSpace {
    UserSpace,
    ObjectBoundingBox,
}

/// A transform attached to a drawing object.
///
/// A missing transform (`None` at the use site) is different from an identity one.
#[derive(Clone, PartialEq, Debug)]
pub enum DrawingTransform {
    /// A single affine matrix.
    Matrix(Transform),
    /// A sequence of transforms applied first-to-last.
    Chain(Vec<Transform>),
}

impl DrawingTransform {
    /// Flattens the transform into a single matrix.
    pub fn to_matrix(&self) -> Transform {
        match self {
            DrawingTransform::Matrix(ts) => *ts,
            DrawingTransform::Chain(list) => list
                .iter()
                .fold(Transform::default(), |acc, ts| acc.post_concat(*ts)),
        }
    }

    /// Checks that the transform has no effect.
    pub fn is_identity(&self) -> bool {
        self.to_matrix().is_identity()
    }

    /// Appends `ts` to be applied after the current transform.
    pub fn then(self, ts: Transform) -> Self {
        match self {
            DrawingTransform::Matrix(prev) => DrawingTransform::Chain(vec![prev, ts]),
            DrawingTransform::Chain(mut list) => {
                list.push(ts);
                DrawingTransform::Chain(list)
            }
        }
    }
}

impl From<Transform> for DrawingTransform {
    #[inline]
    fn from(ts: Transform) -> Self {
        DrawingTransform::Matrix(ts)
    }
}

/// A fill rule.
///
/// `fill-rule` and `clip-rule` in SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Internal representation of a geometry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GeometryKind {
    /// An opaque, optimized segment stream.
    Stream,
    /// Separate figures as they were defined in the source.
    Figures,
}

/// A shape outline in its local coordinate system.
#[derive(Clone, Debug)]
pub struct Geometry {
    /// Path data.
    pub path: Arc<Path>,
    /// Fill rule used when the geometry is filled or used as a clip.
    pub fill_rule: FillRule,
    /// Geometry transform.
    pub transform: Option<DrawingTransform>,
    /// Internal representation.
    pub kind: GeometryKind,
}

impl Geometry {
    /// Creates a new geometry without a transform.
    pub fn new(path: Path, fill_rule: FillRule, optimize: bool) -> Self {
        Geometry {
            path: Arc::new(path),
            fill_rule,
            transform: None,
            kind: if optimize {
                GeometryKind::Stream
            } else {
                GeometryKind::Figures
            },
        }
    }

    /// Returns bounds in the local coordinate system, ignoring the transform.
    pub fn local_bounds(&self) -> Rect {
        self.path
            .compute_tight_bounds()
            .unwrap_or_else(|| self.path.bounds())
    }

    /// Returns bounds with the geometry transform applied.
    pub fn bounds(&self) -> Option<Rect> {
        match self.transform {
            Some(ref ts) => self.local_bounds().transform(ts.to_matrix()),
            None => Some(self.local_bounds()),
        }
    }

    /// Checks that the geometry has nothing to draw.
    pub fn is_empty(&self) -> bool {
        let r = self.path.bounds();
        self.path.points().len() < 2 || (r.width() == 0.0 && r.height() == 0.0)
    }

    /// Returns the number of figures (subpaths).
    pub fn figure_count(&self) -> usize {
        self.path
            .segments()
            .filter(|s| matches!(s, PathSegment::MoveTo(_)))
            .count()
    }
}

/// Defines how content is fitted into a viewport.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Stretch {
    None,
    Fill,
    Uniform,
    UniformToFill,
}

impl From<AspectRatio> for Stretch {
    fn from(aspect: AspectRatio) -> Self {
        if aspect.align == Align::None {
            Stretch::Fill
        } else if aspect.slice {
            Stretch::UniformToFill
        } else {
            Stretch::Uniform
        }
    }
}

/// Converts `viewBox` to `Transform`.
pub fn view_box_to_transform(view_box: NonZeroRect, aspect: AspectRatio, img_size: Size) -> Transform {
    let vr = view_box;

    let sx = img_size.width() / vr.width();
    let sy = img_size.height() / vr.height();

    let (sx, sy) = if aspect.align == Align::None {
        (sx, sy)
    } else {
        let s = if aspect.slice {
            sx.max(sy)
        } else {
            sx.min(sy)
        };

        (s, s)
    };

    let x = -vr.x() * sx;
    let y = -vr.y() * sy;
    let w = img_size.width() - vr.width() * sx;
    let h = img_size.height() - vr.height() * sy;

    let (tx, ty) = aligned_pos(aspect.align, x, y, w, h);
    Transform::from_row(sx, 0.0, 0.0, sy, tx, ty)
}

/// Returns object aligned position.
pub fn aligned_pos(align: Align, x: f32, y: f32, w: f32, h: f32) -> (f32, f32) {
    match align {
        Align::None => (x, y),
        Align::XMinYMin => (x, y),
        Align::XMidYMin => (x + w / 2.0, y),
        Align::XMaxYMin => (x + w, y),
        Align::XMinYMid => (x, y + h / 2.0),
        Align::XMidYMid => (x + w / 2.0, y + h / 2.0),
        Align::XMaxYMid => (x + w, y + h / 2.0),
        Align::XMinYMax => (x, y + h),
        Align::XMidYMax => (x + w / 2.0, y + h),
        Align::XMaxYMax => (x + w, y + h),
    }
}

/// Returns a rectangle that contains both `a` and `b`.
pub(crate) fn union_rect(a: Rect, b: Rect) -> Rect {
    Rect::from_ltrb(
        a.left().min(b.left()),
        a.top().min(b.top()),
        a.right().max(b.right()),
        a.bottom().max(b.bottom()),
    )
    .unwrap_or(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia_path::PathBuilder;

    fn rect_path(x: f32, y: f32, w: f32, h: f32) -> Path {
        PathBuilder::from_rect(Rect::from_xywh(x, y, w, h).unwrap())
    }

    #[test]
    fn chain_applies_in_order() {
        let chain = DrawingTransform::Chain(vec![
            Transform::from_scale(2.0, 2.0),
            Transform::from_translate(10.0, 0.0),
        ]);
        assert_eq!(chain.to_matrix(), Transform::from_row(2.0, 0.0, 0.0, 2.0, 10.0, 0.0));
    }

    #[test]
    fn then_extends_chain() {
        let ts = DrawingTransform::Matrix(Transform::from_scale(2.0, 2.0))
            .then(Transform::from_translate(1.0, 1.0))
            .then(Transform::from_translate(2.0, 2.0));
        match ts {
            DrawingTransform::Chain(ref list) => assert_eq!(list.len(), 3),
            _ => panic!("expected a chain"),
        }
        assert_eq!(ts.to_matrix(), Transform::from_row(2.0, 0.0, 0.0, 2.0, 3.0, 3.0));
    }

    #[test]
    fn geometry_bounds() {
        let mut g = Geometry::new(rect_path(10.0, 20.0, 30.0, 40.0), FillRule::NonZero, true);
        assert_eq!(g.bounds(), Rect::from_xywh(10.0, 20.0, 30.0, 40.0));

        g.transform = Some(Transform::from_scale(2.0, 2.0).into());
        assert_eq!(g.bounds(), Rect::from_xywh(20.0, 40.0, 60.0, 80.0));
        assert_eq!(g.local_bounds(), Rect::from_xywh(10.0, 20.0, 30.0, 40.0).unwrap());
    }

    #[test]
    fn empty_geometry() {
        let mut pb = PathBuilder::new();
        pb.move_to(10.0, 10.0);
        pb.line_to(10.0, 10.0);
        let g = Geometry::new(pb.finish().unwrap(), FillRule::NonZero, true);
        assert!(g.is_empty());

        let g = Geometry::new(rect_path(0.0, 0.0, 1.0, 1.0), FillRule::NonZero, true);
        assert!(!g.is_empty());
        assert_eq!(g.figure_count(), 1);
    }

    #[test]
    fn uniform_view_box() {
        let vb = NonZeroRect::from_xywh(0.0, 0.0, 10.0, 20.0).unwrap();
        let size = Size::from_wh(100.0, 100.0).unwrap();
        let ts = view_box_to_transform(vb, AspectRatio::default(), size);
        assert_eq!(ts, Transform::from_row(5.0, 0.0, 0.0, 5.0, 25.0, 0.0));
    }
}
