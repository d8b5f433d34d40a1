// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Interfaces consumed by the shape renderer.
//!
//! The SVG document model implements them in the `svg` module,
//! but any element source can be plugged in.

use tiny_skia_path::Transform;

use crate::{Brush, DrawingBrush, Error, Geometry, Pen, RenderContext, UnitSpace};

/// Style lookup on an element.
pub trait StyleSource {
    /// Returns a cascaded property value.
    fn cascaded_value(&self, name: &str) -> Option<&str>;

    /// Returns an attribute value as it was set on the element.
    fn literal_attribute(&self, name: &str) -> Option<&str>;
}

/// An element classification that guides the renderer.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RenderingHint {
    Shape,
    Clipping,
    Masking,
    Containing,
    Marker,
    Image,
    Text,
    None,
}

/// An element that can be rendered as a shape.
pub trait ShapeElement: StyleSource {
    /// Returns element's rendering hint.
    fn rendering_hint(&self) -> RenderingHint;

    /// Returns element's id or an empty string.
    fn element_id(&self) -> &str;

    /// Returns element's class name.
    fn class_name(&self) -> Option<&str>;

    /// Returns the tag name of the parent element.
    fn parent_name(&self) -> Option<&str>;
}

/// Builds element's geometry.
pub trait GeometryBuilder<E: ?Sized> {
    /// Returns the geometry in element's local coordinates.
    ///
    /// `optimize` selects the internal representation and must not affect the output.
    fn build_geometry(&self, element: &E, optimize: bool) -> Option<Geometry>;
}

/// Resolves fill and stroke paints.
pub trait PaintResolver<E: ?Sized> {
    /// Resolves the `fill` property.
    fn resolve_fill(&self, element: &E, ctx: &mut RenderContext) -> Result<Option<Brush>, Error>;

    /// Resolves the `stroke` property.
    fn resolve_stroke(&self, element: &E, ctx: &mut RenderContext) -> Result<Option<Pen>, Error>;
}

/// A clip region of an element.
#[derive(Clone, Debug)]
pub struct ClipGeometry {
    /// Clip outline.
    pub geometry: Geometry,
    /// `clipPathUnits` in SVG.
    pub units: UnitSpace,
    /// Clip path transform left for the bounding box units.
    ///
    /// Applied after the bounding box mapping. Always `None` for the user space units,
    /// since the outline is already transformed.
    pub transform: Option<Transform>,
}

/// An opacity mask of an element.
#[derive(Clone, Debug)]
pub struct MaskBrush {
    /// Mask content.
    pub brush: DrawingBrush,
    /// `maskUnits` in SVG.
    pub units: UnitSpace,
    /// `maskContentUnits` in SVG.
    pub content_units: UnitSpace,
}

/// Resolves element's transform, clip region and mask.
pub trait ClipMaskResolver<E: ?Sized> {
    /// Returns element's local-to-parent transform.
    fn transform(&self, element: &E) -> Option<Transform>;

    /// Resolves the clip region.
    fn resolve_clip(
        &self,
        element: &E,
        ctx: &mut RenderContext,
    ) -> Result<Option<ClipGeometry>, Error>;

    /// Resolves the opacity mask.
    fn resolve_mask(&self, element: &E, ctx: &mut RenderContext)
        -> Result<Option<MaskBrush>, Error>;
}

/// Renders element's markers.
pub trait MarkerRenderer<E: ?Sized> {
    /// Renders markers of the element into the current group.
    fn render_markers(&self, element: &E, ctx: &mut RenderContext) -> Result<(), Error>;
}

/// Everything the shape renderer needs.
pub trait ShapeServices<E: ?Sized>:
    GeometryBuilder<E> + PaintResolver<E> + ClipMaskResolver<E> + MarkerRenderer<E>
{
}

impl<E: ?Sized, T> ShapeServices<E> for T where
    T: GeometryBuilder<E> + PaintResolver<E> + ClipMaskResolver<E> + MarkerRenderer<E>
{
}
