// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

macro_rules! element_ids {
    ($($variant:ident => $name:literal,)+) => {
        /// A list of supported SVG elements.
        #[allow(missing_docs)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        pub enum ElementId {
            $($variant,)+
        }

        impl ElementId {
            /// Parses an element name.
            pub fn from_str(text: &str) -> Option<Self> {
                match text {
                    $($name => Some(ElementId::$variant),)+
                    _ => None,
                }
            }

            /// Returns the element name as it appears in SVG.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ElementId::$variant => $name,)+
                }
            }
        }
    };
}

element_ids! {
    A => "a",
    Circle => "circle",
    ClipPath => "clipPath",
    Defs => "defs",
    Desc => "desc",
    Ellipse => "ellipse",
    G => "g",
    Image => "image",
    Line => "line",
    LinearGradient => "linearGradient",
    Marker => "marker",
    Mask => "mask",
    Metadata => "metadata",
    Path => "path",
    Pattern => "pattern",
    Polygon => "polygon",
    Polyline => "polyline",
    RadialGradient => "radialGradient",
    Rect => "rect",
    Stop => "stop",
    Style => "style",
    Svg => "svg",
    Switch => "switch",
    Symbol => "symbol",
    Text => "text",
    Title => "title",
    Tspan => "tspan",
    Use => "use",
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
