// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use strict_num::NormalizedF32;
use tiny_skia_path::Rect;

use crate::{Color, DrawingGroup, DrawingTransform, Error, Stretch, UnitSpace};

/// An alias to `NormalizedF32`.
pub type Opacity = NormalizedF32;

/// An alias to `NormalizedF32`.
pub type StopOffset = NormalizedF32;

/// A brush that paints an area with a single color.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct SolidBrush {
    pub color: Color,
    pub opacity: Opacity,
    pub transform: Option<DrawingTransform>,
}

impl SolidBrush {
    /// Creates an opaque solid brush.
    pub fn new(color: Color) -> Self {
        SolidBrush {
            color,
            opacity: Opacity::ONE,
            transform: None,
        }
    }
}

/// Gradient's stop.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GradientStop {
    pub offset: StopOffset,
    pub color: Color,
}

/// A spread method.
///
/// `spreadMethod` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SpreadMethod {
    #[default]
    Pad,
    Reflect,
    Repeat,
}

/// A linear gradient brush.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct LinearGradientBrush {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub stops: Vec<GradientStop>,
    pub units: UnitSpace,
    pub spread: SpreadMethod,
    pub opacity: Opacity,
    pub transform: Option<DrawingTransform>,
}

/// A radial gradient brush.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct RadialGradientBrush {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    pub fx: f32,
    pub fy: f32,
    pub stops: Vec<GradientStop>,
    pub units: UnitSpace,
    pub spread: SpreadMethod,
    pub opacity: Opacity,
    pub transform: Option<DrawingTransform>,
}

/// How a drawing brush fills an area larger than its viewport.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileMode {
    None,
    Tile,
}

/// A brush that paints an area with a drawing.
///
/// Used for patterns and mask content.
#[derive(Clone, Debug)]
pub struct DrawingBrush {
    /// The content.
    pub drawing: Box<DrawingGroup>,
    /// The part of the content that is shown.
    ///
    /// `None` means the content bounds.
    pub viewbox: Option<Rect>,
    /// Where the viewbox is placed.
    ///
    /// `None` means the painted area.
    pub viewport: Option<Rect>,
    /// Units of the `viewbox`.
    pub viewbox_units: UnitSpace,
    /// Units of the `viewport`.
    pub viewport_units: UnitSpace,
    /// How the viewbox is fitted into the viewport.
    pub stretch: Stretch,
    /// Tiling.
    pub tile: TileMode,
    /// Brush opacity.
    pub opacity: Opacity,
    /// Brush transform.
    pub transform: Option<DrawingTransform>,
}

impl DrawingBrush {
    /// Creates a brush that shows the whole drawing without tiling.
    pub fn new(drawing: DrawingGroup) -> Self {
        DrawingBrush {
            drawing: Box::new(drawing),
            viewbox: None,
            viewport: None,
            viewbox_units: UnitSpace::UserSpace,
            viewport_units: UnitSpace::UserSpace,
            stretch: Stretch::None,
            tile: TileMode::None,
            opacity: Opacity::ONE,
            transform: None,
        }
    }
}

/// A paint.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub enum Brush {
    Solid(SolidBrush),
    LinearGradient(LinearGradientBrush),
    RadialGradient(RadialGradientBrush),
    Drawing(DrawingBrush),
}

impl Brush {
    /// Returns a short name of the brush kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Brush::Solid(_) => "solid",
            Brush::LinearGradient(_) => "linear gradient",
            Brush::RadialGradient(_) => "radial gradient",
            Brush::Drawing(_) => "drawing",
        }
    }

    /// Returns brush transform.
    pub fn transform(&self) -> Option<&DrawingTransform> {
        match self {
            Brush::Solid(ref b) => b.transform.as_ref(),
            Brush::LinearGradient(ref b) => b.transform.as_ref(),
            Brush::RadialGradient(ref b) => b.transform.as_ref(),
            Brush::Drawing(ref b) => b.transform.as_ref(),
        }
    }

    /// Returns a mutable reference to the brush transform.
    pub fn transform_mut(&mut self) -> &mut Option<DrawingTransform> {
        match self {
            Brush::Solid(ref mut b) => &mut b.transform,
            Brush::LinearGradient(ref mut b) => &mut b.transform,
            Brush::RadialGradient(ref mut b) => &mut b.transform,
            Brush::Drawing(ref mut b) => &mut b.transform,
        }
    }

    /// Returns brush opacity.
    pub fn opacity(&self) -> Opacity {
        match self {
            Brush::Solid(ref b) => b.opacity,
            Brush::LinearGradient(ref b) => b.opacity,
            Brush::RadialGradient(ref b) => b.opacity,
            Brush::Drawing(ref b) => b.opacity,
        }
    }

    /// Replaces every color of the brush with its luminance.
    ///
    /// Only solid and gradient brushes can be converted.
    pub fn to_luminance(&self) -> Result<Brush, Error> {
        let mut brush = self.clone();
        match brush {
            Brush::Solid(ref mut b) => b.color = b.color.to_luminance(),
            Brush::LinearGradient(ref mut b) => desaturate_stops(&mut b.stops),
            Brush::RadialGradient(ref mut b) => desaturate_stops(&mut b.stops),
            Brush::Drawing(_) => return Err(Error::UnsupportedBrush(self.kind_name())),
        }

        Ok(brush)
    }
}

fn desaturate_stops(stops: &mut [GradientStop]) {
    for stop in stops {
        stop.color = stop.color.to_luminance();
    }
}

/// A line cap.
///
/// `stroke-linecap` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// A line join.
///
/// `stroke-linejoin` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    MiterClip,
    Round,
    Bevel,
}

/// An outline style.
#[derive(Clone, Debug)]
pub struct Pen {
    /// Outline paint.
    pub brush: Brush,
    /// Line width. Always positive.
    pub thickness: f32,
    /// Line cap.
    pub line_cap: LineCap,
    /// Line join.
    pub line_join: LineJoin,
    /// Miter limit. Always >= 1.
    pub miter_limit: f32,
    /// Dash pattern with an even number of positive values.
    pub dash_array: Option<Vec<f32>>,
    /// Dash offset.
    pub dash_offset: f32,
}

impl Pen {
    /// Creates a one unit wide pen with default line properties.
    pub fn new(brush: Brush) -> Self {
        Pen {
            brush,
            thickness: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 4.0,
            dash_array: None,
            dash_offset: 0.0,
        }
    }
}
