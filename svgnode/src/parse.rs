// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use simplecss::Declaration;

use crate::{
    is_inheritable, is_presentation, Attribute, Document, ElementId, Error, Node, NodeData,
    NodeId, NodeKind, ShortRange,
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NAMESPACE_NS: &str = "http://www.w3.org/XML/1998/namespace";

const NODES_LIMIT: usize = 1_000_000;
const DEPTH_LIMIT: u32 = 1024;

type IdMap<'a, 'input> = HashMap<&'a str, roxmltree::Node<'a, 'input>>;

impl<'input> Document<'input> {
    /// Parses a [`Document`] from a string.
    pub fn parse_str(text: &'input str) -> Result<Document<'input>, Error> {
        let xml = roxmltree::Document::parse(text)?;
        parse(&xml)
    }

    /// Parses a [`Document`] from a [`roxmltree::Document`].
    pub fn parse_tree(xml: &roxmltree::Document<'input>) -> Result<Document<'input>, Error> {
        parse(xml)
    }

    fn append(&mut self, parent_id: NodeId, kind: NodeKind) -> NodeId {
        let new_child_id = NodeId::from(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent_id),
            next_sibling: None,
            children: None,
            kind,
        });

        let last_child_id = self.nodes[parent_id.get_usize()].children.map(|(_, id)| id);

        if let Some(id) = last_child_id {
            self.nodes[id.get_usize()].next_sibling = Some(new_child_id);
        }

        self.nodes[parent_id.get_usize()].children = Some(
            if let Some((first_child_id, _)) = self.nodes[parent_id.get_usize()].children {
                (first_child_id, new_child_id)
            } else {
                (new_child_id, new_child_id)
            },
        );

        new_child_id
    }

    fn append_attribute(&mut self, name: &str, value: roxmltree::StringStorage<'input>) {
        self.attrs.push(Attribute {
            name: name.to_string(),
            value,
        });
    }
}

fn parse<'input>(xml: &roxmltree::Document<'input>) -> Result<Document<'input>, Error> {
    let mut doc = Document {
        nodes: Vec::new(),
        attrs: Vec::new(),
        links: HashMap::new(),
    };

    // The first element with a given id wins, like in browsers.
    let mut id_map = HashMap::new();
    for node in xml.descendants() {
        if let Some(id) = node.attribute("id") {
            id_map.entry(id).or_insert(node);
        }
    }

    doc.nodes.push(NodeData {
        parent: None,
        next_sibling: None,
        children: None,
        kind: NodeKind::Root,
    });

    let style_sheet = resolve_css(xml);

    let ctx = ParseContext {
        style_sheet: &style_sheet,
        id_map: &id_map,
    };

    parse_xml_node_children(xml.root(), xml.root(), doc.root().id, false, 0, &ctx, &mut doc)?;

    match doc.root().first_child() {
        Some(child) if child.tag_name() == Some(ElementId::Svg) => {}
        _ => return Err(Error::NoRootNode),
    }

    let mut links = HashMap::new();
    for node in doc.descendants() {
        if let Some(id) = node.attribute::<&str>("id") {
            links.insert(id.to_string(), node.id);
        }
    }
    doc.links = links;

    fix_recursive_patterns(&mut doc);
    fix_recursive_links(ElementId::ClipPath, "clip-path", &mut doc);
    fix_recursive_links(ElementId::Mask, "mask", &mut doc);

    Ok(doc)
}

struct ParseContext<'s, 'a, 'input: 'a> {
    style_sheet: &'s simplecss::StyleSheet<'s>,
    id_map: &'s IdMap<'a, 'input>,
}

fn parse_tag_name(node: roxmltree::Node) -> Option<ElementId> {
    if !node.is_element() {
        return None;
    }

    if node.tag_name().namespace() != Some(SVG_NS) {
        return None;
    }

    ElementId::from_str(node.tag_name().name())
}

fn parse_xml_node_children<'a, 'input: 'a>(
    parent: roxmltree::Node<'a, 'input>,
    origin: roxmltree::Node<'a, 'input>,
    parent_id: NodeId,
    ignore_ids: bool,
    depth: u32,
    ctx: &ParseContext<'_, 'a, 'input>,
    doc: &mut Document<'input>,
) -> Result<(), Error> {
    for node in parent.children() {
        parse_xml_node(node, origin, parent_id, ignore_ids, depth, ctx, doc)?;
    }

    Ok(())
}

fn parse_xml_node<'a, 'input: 'a>(
    node: roxmltree::Node<'a, 'input>,
    origin: roxmltree::Node<'a, 'input>,
    parent_id: NodeId,
    ignore_ids: bool,
    depth: u32,
    ctx: &ParseContext<'_, 'a, 'input>,
    doc: &mut Document<'input>,
) -> Result<(), Error> {
    if depth > DEPTH_LIMIT {
        return Err(Error::ElementsLimitReached);
    }

    let mut tag_name = match parse_tag_name(node) {
        Some(id) => id,
        None => return Ok(()),
    };

    if tag_name == ElementId::Style {
        return Ok(());
    }

    // Treat links as groups.
    if tag_name == ElementId::A {
        tag_name = ElementId::G;
    }

    let node_id = parse_svg_element(node, parent_id, tag_name, ignore_ids, ctx, doc)?;
    if tag_name == ElementId::Use {
        parse_svg_use_element(node, origin, node_id, depth + 1, ctx, doc)?;
    } else {
        parse_xml_node_children(node, origin, node_id, ignore_ids, depth + 1, ctx, doc)?;
    }

    Ok(())
}

fn parse_svg_element<'input>(
    xml_node: roxmltree::Node<'_, 'input>,
    parent_id: NodeId,
    tag_name: ElementId,
    ignore_ids: bool,
    ctx: &ParseContext,
    doc: &mut Document<'input>,
) -> Result<NodeId, Error> {
    let attrs_start_idx = doc.attrs.len();

    // Copy presentational attributes first.
    for attr in xml_node.attributes() {
        match attr.namespace() {
            None | Some(SVG_NS) | Some(XLINK_NS) | Some(XML_NAMESPACE_NS) => {}
            _ => continue,
        }

        // During a `use` resolving, all `id` attributes must be ignored.
        // Otherwise we will get elements with duplicated id's.
        if ignore_ids && attr.name() == "id" {
            continue;
        }

        append_attribute(parent_id, attr.name(), attr.value_storage().clone(), doc);
    }

    let mut insert_attribute = |name: &str, value: &str| {
        let idx = doc.attrs[attrs_start_idx..]
            .iter()
            .position(|a| a.name == name);

        let added = append_attribute(
            parent_id,
            name,
            roxmltree::StringStorage::new_owned(value),
            doc,
        );

        // Replace an existing value instead of adding a duplicate.
        if added {
            if let Some(idx) = idx {
                let last_idx = doc.attrs.len() - 1;
                doc.attrs.swap(attrs_start_idx + idx, last_idx);
                doc.attrs.pop();
            }
        }
    };

    let mut write_declaration = |declaration: &Declaration| {
        if declaration.name == "marker" {
            insert_attribute("marker-start", declaration.value);
            insert_attribute("marker-mid", declaration.value);
            insert_attribute("marker-end", declaration.value);
        } else if is_presentation(declaration.name) {
            insert_attribute(declaration.name, declaration.value);
        }
    };

    for rule in &ctx.style_sheet.rules {
        if rule.selector.matches(&XmlNode(xml_node)) {
            for declaration in &rule.declarations {
                write_declaration(declaration);
            }
        }
    }

    if let Some(value) = xml_node.attribute("style") {
        for declaration in simplecss::DeclarationTokenizer::from(value) {
            write_declaration(&declaration);
        }
    }

    if doc.nodes.len() > NODES_LIMIT {
        return Err(Error::ElementsLimitReached);
    }

    let node_id = doc.append(
        parent_id,
        NodeKind::Element {
            tag_name,
            attributes: ShortRange::new(attrs_start_idx as u32, doc.attrs.len() as u32),
        },
    );

    Ok(node_id)
}

fn append_attribute<'input>(
    parent_id: NodeId,
    name: &str,
    value: roxmltree::StringStorage<'input>,
    doc: &mut Document<'input>,
) -> bool {
    // The `style` attribute is split into separate attributes.
    if name == "style" {
        return false;
    }

    if is_presentation(name) && &*value == "inherit" {
        return resolve_inherit(parent_id, name, doc);
    }

    doc.append_attribute(name, value);
    true
}

fn resolve_inherit(parent_id: NodeId, name: &str, doc: &mut Document) -> bool {
    let source = if is_inheritable(name) {
        // Inheritable properties can take a value from any ancestor.
        doc.get(parent_id)
            .ancestors()
            .find(|n| n.has_attribute(name))
    } else {
        // The rest only from a direct parent.
        Some(doc.get(parent_id)).filter(|n| n.has_attribute(name))
    };

    let value = source.and_then(|n| {
        n.attributes()
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.clone())
    });

    if let Some(value) = value {
        doc.append_attribute(name, value);
        return true;
    }

    let value = match initial_value(name) {
        Some(v) => v,
        None => return false,
    };

    doc.append_attribute(name, roxmltree::StringStorage::Borrowed(value));
    true
}

fn initial_value(name: &str) -> Option<&'static str> {
    let value = match name {
        "color-rendering" | "shape-rendering" => "auto",
        "clip-path" | "marker-end" | "marker-mid" | "marker-start" | "mask" | "stroke"
        | "stroke-dasharray" | "vector-effect" => "none",
        "font-style" | "font-weight" => "normal",
        "fill" | "stop-color" | "color" => "black",
        "fill-opacity" | "opacity" | "stop-opacity" | "stroke-opacity" => "1",
        "clip-rule" | "fill-rule" => "nonzero",
        "color-interpolation" => "sRGB",
        "display" => "inline",
        "font-size" => "medium",
        "overflow" => "visible",
        "stroke-dashoffset" => "0",
        "stroke-linecap" => "butt",
        "stroke-linejoin" => "miter",
        "stroke-miterlimit" => "4",
        "stroke-width" => "1",
        "visibility" => "visible",
        _ => return None,
    };

    Some(value)
}

fn resolve_href<'a, 'input: 'a>(
    node: roxmltree::Node<'a, 'input>,
    id_map: &IdMap<'a, 'input>,
) -> Option<roxmltree::Node<'a, 'input>> {
    let link_value = node
        .attribute((XLINK_NS, "href"))
        .or_else(|| node.attribute("href"))?;

    let link_id = svgtypes::IRI::from_str(link_value).ok()?.0;

    id_map.get(link_id).copied()
}

fn parse_svg_use_element<'a, 'input: 'a>(
    node: roxmltree::Node<'a, 'input>,
    origin: roxmltree::Node<'a, 'input>,
    parent_id: NodeId,
    depth: u32,
    ctx: &ParseContext<'_, 'a, 'input>,
    doc: &mut Document<'input>,
) -> Result<(), Error> {
    let link = match resolve_href(node, ctx.id_map) {
        Some(v) => v,
        None => return Ok(()),
    };

    if link == node || link == origin {
        log::warn!(
            "Recursive 'use' detected. '{}' will be skipped.",
            node.attribute("id").unwrap_or_default()
        );
        return Ok(());
    }

    if parse_tag_name(link).is_none() {
        return Ok(());
    }

    // A linked subtree must not reference the current `use` or itself
    // through another `use`.
    let is_recursive = link
        .descendants()
        .skip(1)
        .filter(|n| n.has_tag_name((SVG_NS, "use")))
        .filter_map(|n| resolve_href(n, ctx.id_map))
        .any(|link2| link2 == node || link2 == link || link2.is_ancestor_of(node));

    if is_recursive {
        log::warn!(
            "Recursive 'use' detected. '{}' will be skipped.",
            node.attribute("id").unwrap_or_default()
        );
        return Ok(());
    }

    parse_xml_node(link, node, parent_id, true, depth + 1, ctx, doc)
}

fn resolve_css<'a>(xml: &'a roxmltree::Document<'a>) -> simplecss::StyleSheet<'a> {
    let mut sheet = simplecss::StyleSheet::new();

    for node in xml.descendants().filter(|n| n.has_tag_name("style")) {
        match node.attribute("type") {
            Some("text/css") => {}
            Some(_) => continue,
            None => {}
        }

        let text = match node.text() {
            Some(v) => v,
            None => continue,
        };

        sheet.parse_more(text);
    }

    sheet
}

struct XmlNode<'a, 'input: 'a>(roxmltree::Node<'a, 'input>);

impl simplecss::Element for XmlNode<'_, '_> {
    fn parent_element(&self) -> Option<Self> {
        self.0.parent_element().map(XmlNode)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.0.prev_sibling_element().map(XmlNode)
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.0.tag_name().name() == local_name
    }

    fn attribute_matches(&self, local_name: &str, operator: simplecss::AttributeOperator) -> bool {
        match self.0.attribute(local_name) {
            Some(value) => operator.matches(value),
            None => false,
        }
    }

    fn pseudo_class_matches(&self, class: simplecss::PseudoClass) -> bool {
        match class {
            simplecss::PseudoClass::FirstChild => self.prev_sibling_element().is_none(),
            // A static document has no dynamic state.
            _ => false,
        }
    }
}

trait IsAncestorOf {
    fn is_ancestor_of(&self, other: Self) -> bool;
}

impl IsAncestorOf for roxmltree::Node<'_, '_> {
    fn is_ancestor_of(&self, other: Self) -> bool {
        other.ancestors().skip(1).any(|n| n == *self)
    }
}

fn fix_recursive_patterns(doc: &mut Document) {
    for name in ["fill", "stroke"] {
        while let Some(node_id) = find_recursive_pattern(name, doc) {
            reset_to_none(node_id, name, doc);
        }
    }
}

fn find_recursive_pattern(name: &str, doc: &Document) -> Option<NodeId> {
    for pattern_node in doc
        .root()
        .descendants()
        .filter(|n| n.tag_name() == Some(ElementId::Pattern))
    {
        for node in pattern_node.descendants() {
            let link_id = match node.attribute(name) {
                Some(svgtypes::Paint::FuncIRI(link_id, _)) => link_id,
                _ => continue,
            };

            // A pattern child must not link the pattern itself.
            if link_id == pattern_node.element_id() {
                return Some(node.id);
            }

            // Nor through the children of a linked element.
            if let Some(linked_node) = doc.element_by_id(link_id) {
                for node2 in linked_node.descendants() {
                    if let Some(svgtypes::Paint::FuncIRI(link_id2, _)) = node2.attribute(name) {
                        if link_id2 == pattern_node.element_id() {
                            return Some(node2.id);
                        }
                    }
                }
            }
        }
    }

    None
}

fn fix_recursive_links(eid: ElementId, name: &str, doc: &mut Document) {
    while let Some(node_id) = find_recursive_link(eid, name, doc) {
        reset_to_none(node_id, name, doc);
    }
}

fn find_recursive_link(eid: ElementId, name: &str, doc: &Document) -> Option<NodeId> {
    for node in doc
        .root()
        .descendants()
        .filter(|n| n.tag_name() == Some(eid))
    {
        for child in node.descendants() {
            if let Some(link) = child.attribute::<Node>(name) {
                if link == node {
                    return Some(child.id);
                }

                for node2 in link.descendants() {
                    if let Some(link2) = node2.attribute::<Node>(name) {
                        if link2 == node {
                            return Some(node2.id);
                        }
                    }
                }
            }
        }
    }

    None
}

fn reset_to_none(node_id: NodeId, name: &str, doc: &mut Document) {
    if let Some(idx) = doc.get(node_id).attribute_index(name) {
        doc.attrs[idx].value = roxmltree::StringStorage::Borrowed("none");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_values_cover_paint() {
        assert_eq!(initial_value("fill"), Some("black"));
        assert_eq!(initial_value("stroke"), Some("none"));
        assert_eq!(initial_value("x"), None);
    }
}
