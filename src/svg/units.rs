// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use svgnode::Node;
use svgtypes::{Length, LengthUnit as Unit};

use super::SvgServices;
use crate::UnitSpace;

#[inline(never)]
pub(crate) fn convert_length(
    length: Length,
    node: Node,
    name: &str,
    object_units: UnitSpace,
    state: &SvgServices,
) -> f32 {
    let dpi = state.opt.dpi;
    let n = length.number as f32;
    match length.unit {
        Unit::None | Unit::Px => n,
        Unit::Em => n * resolve_font_size(node, state),
        Unit::Ex => n * resolve_font_size(node, state) / 2.0,
        Unit::In => n * dpi,
        Unit::Cm => n * dpi / 2.54,
        Unit::Mm => n * dpi / 25.4,
        Unit::Pt => n * dpi / 72.0,
        Unit::Pc => n * dpi / 6.0,
        Unit::Percent => {
            if object_units == UnitSpace::ObjectBoundingBox {
                n / 100.0
            } else {
                let view_box = state.view_box;

                match name {
                    "cx" | "dx" | "fx" | "markerWidth" | "refX" | "rx" | "width" | "x" | "x1"
                    | "x2" => convert_percent(length, view_box.width()),
                    "cy" | "dy" | "fy" | "height" | "markerHeight" | "refY" | "ry" | "y"
                    | "y1" | "y2" => convert_percent(length, view_box.height()),
                    _ => {
                        let mut vb_len = view_box.width().powi(2) + view_box.height().powi(2);
                        vb_len = (vb_len / 2.0).sqrt();
                        convert_percent(length, vb_len)
                    }
                }
            }
        }
    }
}

pub(crate) fn convert_user_length(
    length: Length,
    node: Node,
    name: &str,
    state: &SvgServices,
) -> f32 {
    convert_length(length, node, name, UnitSpace::UserSpace, state)
}

/// Converts a length attribute of the node, falling back to `def`.
pub(crate) fn convert_attribute(
    node: Node,
    name: &str,
    object_units: UnitSpace,
    state: &SvgServices,
    def: Length,
) -> f32 {
    let length = node.attribute(name).unwrap_or(def);
    convert_length(length, node, name, object_units, state)
}

/// Converts a cascaded length property.
pub(crate) fn resolve_length(node: Node, name: &str, state: &SvgServices, def: f32) -> f32 {
    for n in node.ancestors() {
        if n.has_attribute(name) {
            return match n.attribute::<Length>(name) {
                Some(length) => convert_user_length(length, n, name, state),
                None => def,
            };
        }
    }

    def
}

#[inline(never)]
pub(crate) fn convert_list(node: Node, name: &str, state: &SvgServices) -> Option<Vec<f32>> {
    let text = node.attribute::<&str>(name)?;
    let mut num_list = Vec::new();
    for length in svgtypes::LengthListParser::from(text).flatten() {
        num_list.push(convert_user_length(length, node, name, state));
    }

    Some(num_list)
}

fn convert_percent(length: Length, base: f32) -> f32 {
    base * (length.number as f32) / 100.0
}

#[inline(never)]
pub(crate) fn resolve_font_size(node: Node, state: &SvgServices) -> f32 {
    let nodes: Vec<_> = node.ancestors().filter(|n| n.is_element()).collect();
    let mut font_size = state.opt.font_size;
    for n in nodes.iter().rev() {
        let value = match n.attribute::<&str>("font-size") {
            Some(v) => v,
            None => continue,
        };

        if let Ok(length) = Length::from_str(value) {
            let dpi = state.opt.dpi;
            let n = length.number as f32;
            font_size = match length.unit {
                Unit::None | Unit::Px => n,
                Unit::Em => n * font_size,
                Unit::Ex => n * font_size / 2.0,
                Unit::In => n * dpi,
                Unit::Cm => n * dpi / 2.54,
                Unit::Mm => n * dpi / 25.4,
                Unit::Pt => n * dpi / 72.0,
                Unit::Pc => n * dpi / 6.0,
                // Relative to the parent `font-size`.
                Unit::Percent => n * font_size * 0.01,
            }
        } else {
            font_size = convert_named_font_size(value, font_size);
        }
    }

    font_size
}

fn convert_named_font_size(name: &str, parent_font_size: f32) -> f32 {
    let factor = match name {
        "xx-small" => -3,
        "x-small" => -2,
        "small" => -1,
        "medium" => 0,
        "large" => 1,
        "x-large" => 2,
        "xx-large" => 3,
        "smaller" => -1,
        "larger" => 1,
        _ => {
            log::warn!("Invalid 'font-size' value: '{}'.", name);
            0
        }
    };

    // A scaling factor of 1.2 between adjacent sizes.
    parent_font_size * 1.2f32.powi(factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Options;
    use svgnode::Document;
    use tiny_skia_path::NonZeroRect;

    fn state(opt: &Options) -> SvgServices {
        SvgServices::new(opt, NonZeroRect::from_xywh(0.0, 0.0, 200.0, 100.0).unwrap())
    }

    #[test]
    fn absolute_units() {
        let doc = Document::parse_str("<svg xmlns='http://www.w3.org/2000/svg'/>").unwrap();
        let opt = Options::default();
        let state = state(&opt);
        let node = doc.root_element();
        let conv = |s: &str| convert_user_length(Length::from_str(s).unwrap(), node, "x", &state);
        assert_eq!(conv("10"), 10.0);
        assert_eq!(conv("1in"), 96.0);
        assert_eq!(conv("6pc"), 96.0);
        assert_eq!(conv("72pt"), 96.0);
        assert_eq!(conv("50%"), 100.0);
    }

    #[test]
    fn percent_on_other_axis() {
        let doc = Document::parse_str("<svg xmlns='http://www.w3.org/2000/svg'/>").unwrap();
        let opt = Options::default();
        let state = state(&opt);
        let node = doc.root_element();
        let len = Length::new(50.0, Unit::Percent);
        assert_eq!(convert_user_length(len, node, "height", &state), 50.0);
        assert_eq!(
            convert_length(len, node, "width", UnitSpace::ObjectBoundingBox, &state),
            0.5
        );
    }

    #[test]
    fn font_relative_units() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg' font-size='20'><g font-size='50%'><rect id='r'/></g></svg>",
        )
        .unwrap();
        let opt = Options::default();
        let state = state(&opt);
        let node = doc.element_by_id("r").unwrap();
        assert_eq!(resolve_font_size(node, &state), 10.0);
        assert_eq!(convert_user_length(Length::new(2.0, Unit::Em), node, "x", &state), 20.0);
    }
}
