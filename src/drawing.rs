// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tiny_skia_path::Rect;

use crate::geom::union_rect;
use crate::{Brush, DrawingTransform, Error, Geometry, Opacity, Pen};

/// Runtime metadata attached to a drawing object.
///
/// Never affects rendering.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Metadata {
    /// Source element id.
    pub id: Option<String>,
    /// Source element class name.
    pub class: Option<String>,
}

impl Metadata {
    /// Checks that no metadata is set.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.class.is_none()
    }
}

/// A filled and/or stroked geometry.
#[derive(Clone, Debug)]
pub struct GeometryDrawing {
    /// The outline.
    pub geometry: Geometry,
    /// Fill paint.
    pub brush: Option<Brush>,
    /// Stroke style.
    pub pen: Option<Pen>,
    /// Unique name, taken from the element id.
    pub name: Option<String>,
    /// Runtime metadata.
    pub metadata: Metadata,
}

impl GeometryDrawing {
    /// Creates a new geometry drawing.
    pub fn new(geometry: Geometry, brush: Option<Brush>, pen: Option<Pen>) -> Self {
        GeometryDrawing {
            geometry,
            brush,
            pen,
            name: None,
            metadata: Metadata::default(),
        }
    }

    /// Returns geometry bounds with the geometry transform applied.
    ///
    /// Stroke width is not included.
    pub fn bounds(&self) -> Option<Rect> {
        self.geometry.bounds()
    }
}

/// A group of drawings.
///
/// A group with a clip geometry and/or an opacity mask clips and masks all its children.
#[derive(Clone, Debug)]
pub struct DrawingGroup {
    /// Children in painting order.
    pub children: Vec<Drawing>,
    /// Group transform.
    pub transform: Option<DrawingTransform>,
    /// Group opacity.
    pub opacity: Opacity,
    /// Clip region.
    pub clip_geometry: Option<Geometry>,
    /// Opacity mask.
    pub opacity_mask: Option<Brush>,
    /// Unique name, taken from the element id.
    pub name: Option<String>,
    /// Runtime metadata.
    pub metadata: Metadata,
}

impl Default for DrawingGroup {
    fn default() -> Self {
        DrawingGroup {
            children: Vec::new(),
            transform: None,
            opacity: Opacity::ONE,
            clip_geometry: None,
            opacity_mask: None,
            name: None,
            metadata: Metadata::default(),
        }
    }
}

impl DrawingGroup {
    /// Appends a drawing.
    #[inline]
    pub fn push(&mut self, drawing: Drawing) {
        self.children.push(drawing);
    }

    /// Checks that the group has no children.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Calculates the group bounds in its parent coordinates.
    ///
    /// Includes children bounds, the group transform and the clip region.
    pub fn bounds(&self) -> Option<Rect> {
        let mut bounds: Option<Rect> = None;
        for child in &self.children {
            if let Some(r) = child.bounds() {
                bounds = Some(match bounds {
                    Some(prev) => union_rect(prev, r),
                    None => r,
                });
            }
        }

        let mut bounds = bounds?;
        if let Some(ref clip) = self.clip_geometry {
            bounds = bounds.intersect(&clip.bounds()?)?;
        }

        match self.transform {
            Some(ref ts) => bounds.transform(ts.to_matrix()),
            None => Some(bounds),
        }
    }

    /// Returns a drawing by its name.
    ///
    /// Searches the whole subtree, including the current group.
    pub fn find_by_name(&self, name: &str) -> Option<DrawingRef> {
        if self.name.as_deref() == Some(name) {
            return Some(DrawingRef::Group(self));
        }

        self.iter()
            .find(|d| d.name() == Some(name))
            .map(DrawingRef::Drawing)
    }

    /// Returns a depth-first iterator over all descendant drawings.
    pub fn iter(&self) -> Descendants {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Replaces the colors of every top-level geometry drawing with their luminance.
    ///
    /// Nested groups are left as is.
    pub fn desaturate_top_level(&mut self) -> Result<(), Error> {
        for child in &mut self.children {
            if let Drawing::Geometry(d) = child {
                if let Some(ref mut brush) = d.brush {
                    *brush = brush.to_luminance()?;
                }

                if let Some(ref mut pen) = d.pen {
                    pen.brush = pen.brush.to_luminance()?;
                }
            }
        }

        Ok(())
    }
}

/// A drawing object.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub enum Drawing {
    Geometry(GeometryDrawing),
    Group(DrawingGroup),
}

impl Drawing {
    /// Returns drawing bounds in its parent coordinates.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Drawing::Geometry(ref d) => d.bounds(),
            Drawing::Group(ref g) => g.bounds(),
        }
    }

    /// Returns drawing's name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Drawing::Geometry(ref d) => d.name.as_deref(),
            Drawing::Group(ref g) => g.name.as_deref(),
        }
    }

    /// Returns drawing's metadata.
    pub fn metadata(&self) -> &Metadata {
        match self {
            Drawing::Geometry(ref d) => &d.metadata,
            Drawing::Group(ref g) => &g.metadata,
        }
    }
}

impl From<GeometryDrawing> for Drawing {
    fn from(d: GeometryDrawing) -> Self {
        Drawing::Geometry(d)
    }
}

impl From<DrawingGroup> for Drawing {
    fn from(g: DrawingGroup) -> Self {
        Drawing::Group(g)
    }
}

/// A reference to a drawing or to a root group.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub enum DrawingRef<'a> {
    Drawing(&'a Drawing),
    Group(&'a DrawingGroup),
}

impl<'a> DrawingRef<'a> {
    /// Returns drawing bounds in its parent coordinates.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            DrawingRef::Drawing(d) => d.bounds(),
            DrawingRef::Group(g) => g.bounds(),
        }
    }

    /// Returns a geometry drawing, if this is one.
    pub fn as_geometry(&self) -> Option<&'a GeometryDrawing> {
        match *self {
            DrawingRef::Drawing(Drawing::Geometry(d)) => Some(d),
            _ => None,
        }
    }

    /// Returns a group, if this is one.
    pub fn as_group(&self) -> Option<&'a DrawingGroup> {
        match *self {
            DrawingRef::Drawing(Drawing::Group(g)) => Some(g),
            DrawingRef::Group(g) => Some(g),
            _ => None,
        }
    }
}

/// A depth-first iterator over drawings.
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Drawing>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Drawing;

    fn next(&mut self) -> Option<Self::Item> {
        let drawing = self.stack.pop()?;
        if let Drawing::Group(ref g) = drawing {
            self.stack.extend(g.children.iter().rev());
        }

        Some(drawing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, FillRule, SolidBrush};
    use tiny_skia_path::{PathBuilder, Transform};

    fn rect(x: f32, y: f32, w: f32, h: f32, name: &str) -> Drawing {
        let path = PathBuilder::from_rect(Rect::from_xywh(x, y, w, h).unwrap());
        let mut d = GeometryDrawing::new(
            Geometry::new(path, FillRule::NonZero, true),
            Some(Brush::Solid(SolidBrush::new(Color::from_linear(1.0, 0.0, 0.0, 1.0)))),
            None,
        );
        d.name = Some(name.to_string());
        d.into()
    }

    #[test]
    fn group_bounds() {
        let mut inner = DrawingGroup::default();
        inner.push(rect(0.0, 0.0, 10.0, 10.0, "a"));
        inner.transform = Some(Transform::from_translate(100.0, 0.0).into());

        let mut root = DrawingGroup::default();
        root.push(rect(0.0, 0.0, 10.0, 10.0, "b"));
        root.push(inner.into());

        assert_eq!(root.bounds(), Rect::from_xywh(0.0, 0.0, 110.0, 10.0));
    }

    #[test]
    fn clipped_bounds() {
        let mut g = DrawingGroup::default();
        g.push(rect(0.0, 0.0, 10.0, 10.0, "a"));
        let clip = PathBuilder::from_rect(Rect::from_xywh(5.0, 5.0, 10.0, 10.0).unwrap());
        g.clip_geometry = Some(Geometry::new(clip, FillRule::NonZero, true));
        assert_eq!(g.bounds(), Rect::from_xywh(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn depth_first_order() {
        let mut inner = DrawingGroup::default();
        inner.name = Some("g".to_string());
        inner.push(rect(0.0, 0.0, 1.0, 1.0, "b"));

        let mut root = DrawingGroup::default();
        root.push(inner.into());
        root.push(rect(0.0, 0.0, 1.0, 1.0, "c"));

        let names: Vec<_> = root.iter().filter_map(|d| d.name()).collect();
        assert_eq!(names, vec!["g", "b", "c"]);
        assert!(root.find_by_name("b").and_then(|d| d.as_geometry()).is_some());
        assert!(root.find_by_name("x").is_none());
    }

    #[test]
    fn desaturate_only_top_level() {
        let mut inner = DrawingGroup::default();
        inner.push(rect(0.0, 0.0, 1.0, 1.0, "nested"));

        let mut g = DrawingGroup::default();
        g.push(rect(0.0, 0.0, 1.0, 1.0, "top"));
        g.push(inner.into());
        g.desaturate_top_level().unwrap();

        let color_of = |name: &str| match g.find_by_name(name).and_then(|d| d.as_geometry()) {
            Some(GeometryDrawing {
                brush: Some(Brush::Solid(b)),
                ..
            }) => b.color,
            _ => panic!("expected a solid brush"),
        };

        assert_eq!(color_of("top"), Color::from_linear(1.0, 0.5, 0.5, 0.5));
        assert_eq!(color_of("nested"), Color::from_linear(1.0, 0.0, 0.0, 1.0));
    }
}
