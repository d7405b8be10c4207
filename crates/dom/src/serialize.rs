//! Writes a [`Tree`] (or any subtree of it) out as XML text via `quick-xml`.
use crate::backend::TreeBackend;
use crate::error::DomError;
use crate::node::{Attribute, NodeType};
use crate::tree::{NodeId, Tree};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use std::fmt::Display;
use std::io::Write;

/// Options controlling XML output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Indent nested elements by this many spaces. `None` writes compact output.
    pub indent: Option<usize>,
    /// Emit an `<?xml ...?>` declaration. Only honoured for document nodes.
    pub xml_declaration: bool,
}

fn serialize_err<E: Display>(e: E) -> DomError {
    DomError::Serialize(e.to_string())
}

/// Prefix bindings declared in the output written so far, innermost last.
type OutputScope<'t> = Vec<(&'t str, &'t str)>;

fn lookup<'t>(scope: &OutputScope<'t>, prefix: &str) -> Option<&'t str> {
    scope
        .iter()
        .rev()
        .find(|(bound, _)| *bound == prefix)
        .map(|&(_, uri)| uri)
}

/// The prefix an `xmlns`/`xmlns:*` attribute declares.
fn declared_by(attr: &Attribute) -> Option<&str> {
    match attr.prefix.as_deref() {
        Some("xmlns") => Some(attr.local_name.as_str()),
        None if attr.local_name == "xmlns" => Some(""),
        _ => None,
    }
}

/// Pushes the element's own declarations onto `scope`, then returns the
/// bindings its name and attributes use that the output has not declared.
/// Those are pushed too. Unprefixed elements without a namespace undeclare a
/// non-empty default namespace with `("", "")`.
fn missing_declarations<'t>(
    tree: &'t Tree,
    node: NodeId,
    scope: &mut OutputScope<'t>,
) -> Vec<(&'t str, &'t str)> {
    let own = scope.len();
    let attrs = tree.attributes(node);
    scope.extend(
        attrs
            .iter()
            .filter_map(|attr| declared_by(attr).map(|prefix| (prefix, attr.value.as_str()))),
    );

    let element = match (tree.prefix(node), tree.namespace_uri(node)) {
        (prefix, Some(uri)) => Some((prefix.unwrap_or(""), uri)),
        (None, None) => Some(("", "")),
        (Some(_), None) => None,
    };
    let used = element.into_iter().chain(attrs.iter().filter_map(|attr| {
        match (attr.prefix.as_deref(), attr.namespace_uri.as_deref()) {
            (Some(prefix), Some(uri)) if prefix != "xmlns" => Some((prefix, uri)),
            _ => None,
        }
    }));

    let mut missing = Vec::new();
    for (prefix, uri) in used {
        let declared_here = scope[own..].iter().any(|(bound, _)| *bound == prefix);
        if prefix == "xml" || declared_here || lookup(scope, prefix).unwrap_or("") == uri {
            continue;
        }
        scope.push((prefix, uri));
        missing.push((prefix, uri));
    }
    missing
}

/// Serializes `node` and its descendants to a string.
///
/// Namespace declarations are written where the output needs them: an
/// element or attribute whose prefix is bound by an ancestor outside the
/// serialized subtree, or only by a build-time scope, gets its own `xmlns`
/// attribute so the text stays well-formed.
pub fn serialize(tree: &Tree, node: NodeId, options: &SerializeOptions) -> Result<String, DomError> {
    let bytes = match options.indent {
        Some(width) => {
            let mut writer = Writer::new_with_indent(Vec::new(), b' ', width);
            write_document(tree, node, options, &mut writer)?;
            writer.into_inner()
        }
        None => {
            let mut writer = Writer::new(Vec::new());
            write_document(tree, node, options, &mut writer)?;
            writer.into_inner()
        }
    };
    String::from_utf8(bytes).map_err(serialize_err)
}

fn write_document<W: Write>(
    tree: &Tree,
    node: NodeId,
    options: &SerializeOptions,
    writer: &mut Writer<W>,
) -> Result<(), DomError> {
    if options.xml_declaration && tree.node_type(node) == NodeType::Document {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(serialize_err)?;
    }
    write_node(tree, node, &mut Vec::new(), writer)
}

fn write_node<'t, W: Write>(
    tree: &'t Tree,
    node: NodeId,
    scope: &mut OutputScope<'t>,
    writer: &mut Writer<W>,
) -> Result<(), DomError> {
    match tree.node_type(node) {
        NodeType::Document | NodeType::DocumentFragment => {
            for child in tree.children(node) {
                write_node(tree, child, scope, writer)?;
            }
        }
        NodeType::Element => {
            let depth = scope.len();
            let name = tree.tag_name(node).unwrap_or_default();
            let mut start = BytesStart::new(name.as_str());
            for (prefix, uri) in missing_declarations(tree, node, scope) {
                let key = if prefix.is_empty() {
                    "xmlns".to_string()
                } else {
                    format!("xmlns:{}", prefix)
                };
                start.push_attribute((key.as_str(), uri));
            }
            for attr in tree.attributes(node) {
                let key = attr.name();
                start.push_attribute((key.as_str(), attr.value.as_str()));
            }
            if tree.first_child(node).is_none() {
                writer.write_event(Event::Empty(start)).map_err(serialize_err)?;
            } else {
                writer.write_event(Event::Start(start)).map_err(serialize_err)?;
                for child in tree.children(node) {
                    write_node(tree, child, scope, writer)?;
                }
                writer
                    .write_event(Event::End(BytesEnd::new(name.as_str())))
                    .map_err(serialize_err)?;
            }
            scope.truncate(depth);
        }
        NodeType::Text => {
            let data = tree.character_data(node).unwrap_or_default();
            writer
                .write_event(Event::Text(BytesText::new(data)))
                .map_err(serialize_err)?;
        }
        NodeType::CDataSection => {
            let data = tree.character_data(node).unwrap_or_default();
            writer
                .write_event(Event::CData(BytesCData::new(data)))
                .map_err(serialize_err)?;
        }
        NodeType::Comment => {
            let data = tree.character_data(node).unwrap_or_default();
            writer
                .write_event(Event::Comment(BytesText::from_escaped(data)))
                .map_err(serialize_err)?;
        }
        NodeType::ProcessingInstruction => {
            let target = tree.pi_target(node).unwrap_or_default();
            let data = tree.character_data(node).unwrap_or_default();
            let content = if data.is_empty() {
                target.to_string()
            } else {
                format!("{} {}", target, data)
            };
            writer
                .write_event(Event::PI(BytesPI::new(content.as_str())))
                .map_err(serialize_err)?;
        }
    }
    Ok(())
}
