// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgnode::{ElementId, Node};

use crate::RenderContext;

/// Records element's markers.
///
/// Marker geometry is not generated. Resolved references are only logged.
pub(crate) fn render(node: Node, ctx: &mut RenderContext) {
    if !is_valid(node) || ctx.rendering_clip_region() {
        return;
    }

    for name in ["marker-start", "marker-mid", "marker-end"] {
        let link = match node.find_attribute::<&str>(name) {
            Some("none") | None => continue,
            Some(_) => node.find_attribute::<Node>(name),
        };

        match link {
            Some(marker) if marker.tag_name() == Some(ElementId::Marker) => {
                log::debug!(
                    "Marker '{}' on '{}' is not rendered.",
                    marker.element_id(),
                    node.element_id()
                );
            }
            Some(_) => log::warn!("'{}' must reference a marker.", name),
            None => {}
        }
    }
}

fn is_valid(node: Node) -> bool {
    // `marker-*` attributes can only be set on `path`, `line`, `polyline` and `polygon`.
    matches!(
        node.tag_name(),
        Some(ElementId::Path | ElementId::Line | ElementId::Polyline | ElementId::Polygon)
    )
}
