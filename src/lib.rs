// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgdraw` renders [SVG] shapes into a retained drawing tree.

The result is a tree of groups and filled/stroked geometries that a host
can display as is. Nothing is rasterized.

## Features

- Basic shapes and paths are converted into geometries
- `fill` and `stroke` are resolved into brushes and pens,
  including gradients and patterns
- Shape transforms are propagated into geometries and brushes
- `clip-path` and `mask` on shapes are resolved into clipped and masked groups,
  with `objectBoundingBox` units mapped onto the shape bounding box
- Mask content is converted into a luminance mask
- Element ids and class names can be attached to drawings as runtime metadata
- SVG can be loaded from files, streams, embedded resources and `data:` URIs,
  including SVGZ

## Limitations

- Text, images and filters are not rendered
- Markers are resolved but not rendered
- Clip paths and masks are applied only to shapes

The shape renderer itself is independent from SVG parsing.
Any element model can be plugged in by implementing the traits in [`element`].

[SVG]: https://en.wikipedia.org/wiki/Scalable_Vector_Graphics
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]

mod color;
mod context;
mod drawing;
pub mod dump;
pub mod element;
mod error;
mod geom;
mod loader;
mod options;
mod paint;
mod shape;
mod svg;
mod view;

pub use color::Color;
pub use context::{IdRegistry, RenderContext};
pub use drawing::{Descendants, Drawing, DrawingGroup, DrawingRef, GeometryDrawing, Metadata};
pub use error::Error;
pub use geom::{
    aligned_pos, view_box_to_transform, DrawingTransform, FillRule, Geometry, GeometryKind,
    Stretch, UnitSpace,
};
pub use loader::{decompress_svgz, load_data, Source};
pub use options::Options;
pub use paint::{
    Brush, DrawingBrush, GradientStop, LineCap, LineJoin, LinearGradientBrush, Opacity, Pen,
    RadialGradientBrush, SolidBrush, SpreadMethod, StopOffset, TileMode,
};
pub use shape::render_shape;
pub use view::{LoadStatus, SvgViewbox};

pub use strict_num::{self, ApproxEqUlps, NonZeroPositiveF32, NormalizedF32, PositiveF32};
pub use svgnode;
pub use tiny_skia_path::{self, NonZeroRect, Rect, Size, Transform};

/// A rendered SVG document.
#[derive(Clone, Debug)]
pub struct SvgDrawing {
    /// Image size.
    ///
    /// Size of an image that should be created to fit the SVG.
    ///
    /// `width` and `height` in SVG.
    pub size: Size,

    /// SVG viewbox.
    ///
    /// Specifies which part of the SVG image should be rendered.
    ///
    /// `viewBox` in SVG.
    pub view_box: NonZeroRect,

    /// The root group.
    ///
    /// Maps the viewbox onto the image size through its transform.
    pub root: DrawingGroup,
}

impl SvgDrawing {
    /// Parses and renders an SVG data.
    ///
    /// Can contain an SVG string or a gzip compressed data.
    pub fn from_data(data: &[u8], opt: &Options) -> Result<Self, Error> {
        if data.starts_with(&[0x1f, 0x8b]) {
            let data = decompress_svgz(data)?;
            let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str(text, opt)
        } else {
            let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str(text, opt)
        }
    }

    /// Parses and renders an SVG string.
    pub fn from_str(text: &str, opt: &Options) -> Result<Self, Error> {
        let doc = svgnode::Document::parse_str(text)?;
        Self::from_document(&doc, opt)
    }

    /// Renders an already parsed document.
    pub fn from_document(doc: &svgnode::Document, opt: &Options) -> Result<Self, Error> {
        let mut ids = IdRegistry::new();
        Self::from_document_with_ids(doc, opt, &mut ids)
    }

    /// Renders an already parsed document, sharing the id registry with other renders.
    ///
    /// Ids that are already registered are not assigned to drawings.
    pub fn from_document_with_ids(
        doc: &svgnode::Document,
        opt: &Options,
        ids: &mut IdRegistry,
    ) -> Result<Self, Error> {
        svg::convert_doc(doc, opt, ids)
    }

    /// Loads, parses and renders an SVG from a source.
    pub fn from_source(source: Source, opt: &Options) -> Result<Self, Error> {
        let data = load_data(source, opt)?;
        Self::from_data(&data, opt)
    }

    /// Returns a drawing by its name.
    pub fn find_by_name(&self, name: &str) -> Option<DrawingRef> {
        self.root.find_by_name(name)
    }

    /// Returns bounds of the whole drawing in image coordinates.
    pub fn bounds(&self) -> Option<Rect> {
        self.root.bounds()
    }
}

trait OptionLog {
    fn log_none<F: FnOnce()>(self, f: F) -> Self;
}

impl<T> OptionLog for Option<T> {
    #[inline]
    fn log_none<F: FnOnce()>(self, f: F) -> Self {
        self.or_else(|| {
            f();
            None
        })
    }
}

pub(crate) trait IsValidLength {
    fn is_valid_length(&self) -> bool;
}

impl IsValidLength for f32 {
    #[inline]
    fn is_valid_length(&self) -> bool {
        *self > 0.0 && self.is_finite()
    }
}

#[inline]
pub(crate) fn f32_bound(min: f32, val: f32, max: f32) -> f32 {
    debug_assert!(min.is_finite());
    debug_assert!(val.is_finite());
    debug_assert!(max.is_finite());

    if val > max {
        max
    } else if val < min {
        min
    } else {
        val
    }
}
