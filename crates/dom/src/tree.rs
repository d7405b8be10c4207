//! An arena-backed node tree implementing [`TreeBackend`].
//!
//! Every node of every document created through a `Tree` lives in one
//! arena and is addressed by a [`NodeId`]. Sibling and parent links are
//! stored as ids, so handles stay valid for the lifetime of the tree even
//! when nodes are moved, replaced or detached.

use crate::backend::TreeBackend;
use crate::error::DomError;
use crate::node::{Attribute, NodeType};
use mixup_names::{is_qualified_name, parse_qualified_name};

/// A handle to a node stored in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct ElementData {
    prefix: Option<String>,
    local_name: String,
    namespace_uri: Option<String>,
    attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Fragment,
    Element(ElementData),
    Text(String),
    Comment(String),
    CData(String),
    ProcessingInstruction { target: String, data: String },
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    owner: Option<NodeId>,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// An in-memory markup tree holding any number of documents.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

/// Iterator over the children of a node, in document order.
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.data(current).next_sibling;
        Some(current)
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, node: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.data(node).first_child,
        }
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.children(node).count()
    }

    /// The qualified tag name of an element.
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.element(node).map(|el| match &el.prefix {
            Some(prefix) => format!("{}:{}", prefix, el.local_name),
            None => el.local_name.clone(),
        })
    }

    pub fn local_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.local_name.as_str())
    }

    /// Looks an attribute up by its qualified name.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attributes
            .iter()
            .find(|attr| attr.name() == name)
            .map(|attr| attr.value.as_str())
    }

    /// Looks an attribute up by namespace and local name.
    pub fn attribute_ns(&self, node: NodeId, namespace: &str, local_name: &str) -> Option<&str> {
        self.element(node)?
            .attributes
            .iter()
            .find(|attr| {
                attr.namespace_uri.as_deref() == Some(namespace) && attr.local_name == local_name
            })
            .map(|attr| attr.value.as_str())
    }

    /// The data of a text, comment, CDATA or processing-instruction node.
    pub fn character_data(&self, node: NodeId) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Text(data) | NodeKind::Comment(data) | NodeKind::CData(data) => Some(data),
            NodeKind::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn pi_target(&self, node: NodeId) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::ProcessingInstruction { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Concatenated text and CDATA of all descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.data(node).kind {
            NodeKind::Text(data) | NodeKind::CData(data) => out.push_str(data),
            NodeKind::Document | NodeKind::Fragment | NodeKind::Element(_) => {
                for child in self.children(node) {
                    self.collect_text(child, out);
                }
            }
            _ => {}
        }
    }

    /// The single element child of a document, if any.
    pub fn document_element(&self, doc: NodeId) -> Option<NodeId> {
        self.children(doc)
            .find(|&child| self.node_type(child) == NodeType::Element)
    }

    // --- Internals ---

    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.0]
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.data(node).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut ElementData, DomError> {
        let found = self.node_type(node);
        match &mut self.data_mut(node).kind {
            NodeKind::Element(el) => Ok(el),
            _ => Err(DomError::WrongNodeType {
                expected: "element",
                found: found.to_string(),
            }),
        }
    }

    fn alloc(&mut self, kind: NodeKind, owner: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            owner,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        });
        id
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.data(id).parent;
        }
        false
    }

    /// Unlinks `node` from its parent and siblings.
    fn detach(&mut self, node: NodeId) {
        let (parent, prev, next) = {
            let data = self.data(node);
            (data.parent, data.prev_sibling, data.next_sibling)
        };
        let Some(parent) = parent else {
            return;
        };
        match prev {
            Some(prev) => self.data_mut(prev).next_sibling = next,
            None => self.data_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.data_mut(next).prev_sibling = prev,
            None => self.data_mut(parent).last_child = prev,
        }
        let data = self.data_mut(node);
        data.parent = None;
        data.prev_sibling = None;
        data.next_sibling = None;
    }

    /// Links a detached `node` under `parent`, before `reference` or at the end.
    fn link_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        let prev = match reference {
            Some(reference) => self.data(reference).prev_sibling,
            None => self.data(parent).last_child,
        };
        {
            let data = self.data_mut(node);
            data.parent = Some(parent);
            data.prev_sibling = prev;
            data.next_sibling = reference;
        }
        match prev {
            Some(prev) => self.data_mut(prev).next_sibling = Some(node),
            None => self.data_mut(parent).first_child = Some(node),
        }
        match reference {
            Some(reference) => self.data_mut(reference).prev_sibling = Some(node),
            None => self.data_mut(parent).last_child = Some(node),
        }
    }

    fn validate_insertion(
        &self,
        parent: NodeId,
        child: NodeId,
        replacing: Option<NodeId>,
    ) -> Result<(), DomError> {
        let parent_type = self.node_type(parent);
        if !parent_type.is_container() {
            return Err(DomError::HierarchyRequest(format!(
                "a {} cannot have children",
                parent_type
            )));
        }
        let child_type = self.node_type(child);
        if child_type == NodeType::Document {
            return Err(DomError::HierarchyRequest(
                "a document cannot be inserted".to_string(),
            ));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest(
                "a node cannot be inserted into itself or its descendants".to_string(),
            ));
        }
        if parent_type != NodeType::Document {
            return Ok(());
        }

        let incoming: Vec<NodeId> = if child_type == NodeType::DocumentFragment {
            self.children(child).collect()
        } else {
            vec![child]
        };
        let mut elements = 0;
        for &node in &incoming {
            match self.node_type(node) {
                NodeType::Element => elements += 1,
                NodeType::Text | NodeType::CDataSection => {
                    return Err(DomError::HierarchyRequest(format!(
                        "a document cannot contain a {} node",
                        self.node_type(node)
                    )));
                }
                _ => {}
            }
        }
        let existing = self
            .children(parent)
            .filter(|&c| Some(c) != replacing && c != child)
            .filter(|&c| self.node_type(c) == NodeType::Element)
            .count();
        if elements + existing > 1 {
            return Err(DomError::HierarchyRequest(
                "a document can only have one document element".to_string(),
            ));
        }
        Ok(())
    }

    /// Moves `child` (or all children of a fragment) under `parent`.
    fn insert_nodes(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if self.node_type(child) == NodeType::DocumentFragment {
            let moved: Vec<NodeId> = self.children(child).collect();
            log::trace!(
                "Moving {} fragment children into node {}",
                moved.len(),
                parent.0
            );
            for node in moved {
                self.detach(node);
                self.link_before(parent, node, reference);
            }
        } else {
            self.detach(child);
            self.link_before(parent, child, reference);
        }
    }

    fn ensure_child_of(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.data(child).parent == Some(parent) {
            Ok(())
        } else {
            Err(DomError::NotFound(format!(
                "node {} is not a child of node {}",
                child.0, parent.0
            )))
        }
    }
}

impl TreeBackend for Tree {
    type Node = NodeId;

    fn node_type(&self, node: NodeId) -> NodeType {
        match self.data(node).kind {
            NodeKind::Document => NodeType::Document,
            NodeKind::Fragment => NodeType::DocumentFragment,
            NodeKind::Element(_) => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Comment(_) => NodeType::Comment,
            NodeKind::CData(_) => NodeType::CDataSection,
            NodeKind::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).first_child
    }

    fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).last_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).next_sibling
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).prev_sibling
    }

    fn owner_document(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).owner
    }

    fn namespace_uri(&self, node: NodeId) -> Option<&str> {
        self.element(node)?.namespace_uri.as_deref()
    }

    fn prefix(&self, node: NodeId) -> Option<&str> {
        self.element(node)?.prefix.as_deref()
    }

    fn attributes(&self, node: NodeId) -> &[Attribute] {
        match self.element(node) {
            Some(el) => &el.attributes,
            None => &[],
        }
    }

    fn create_document(&mut self) -> NodeId {
        self.alloc(NodeKind::Document, None)
    }

    fn create_document_fragment(&mut self, doc: NodeId) -> NodeId {
        self.alloc(NodeKind::Fragment, Some(doc))
    }

    fn create_element(&mut self, doc: NodeId, name: &str) -> Result<NodeId, DomError> {
        if !is_qualified_name(name) {
            return Err(DomError::InvalidCharacter(name.to_string()));
        }
        let element = ElementData {
            prefix: None,
            local_name: name.to_string(),
            namespace_uri: None,
            attributes: Vec::new(),
        };
        Ok(self.alloc(NodeKind::Element(element), Some(doc)))
    }

    fn create_element_ns(
        &mut self,
        doc: NodeId,
        namespace: &str,
        qualified_name: &str,
    ) -> Result<NodeId, DomError> {
        let qname = parse_qualified_name(qualified_name)
            .ok_or_else(|| DomError::InvalidCharacter(qualified_name.to_string()))?;
        let element = ElementData {
            prefix: qname.prefix.map(str::to_string),
            local_name: qname.local_part.to_string(),
            namespace_uri: (!namespace.is_empty()).then(|| namespace.to_string()),
            attributes: Vec::new(),
        };
        Ok(self.alloc(NodeKind::Element(element), Some(doc)))
    }

    fn create_text(&mut self, doc: NodeId, data: &str) -> NodeId {
        self.alloc(NodeKind::Text(data.to_string()), Some(doc))
    }

    fn create_comment(&mut self, doc: NodeId, data: &str) -> NodeId {
        self.alloc(NodeKind::Comment(data.to_string()), Some(doc))
    }

    fn create_cdata_section(&mut self, doc: NodeId, data: &str) -> Result<NodeId, DomError> {
        if data.contains("]]>") {
            return Err(DomError::InvalidCharacter(data.to_string()));
        }
        Ok(self.alloc(NodeKind::CData(data.to_string()), Some(doc)))
    }

    fn create_processing_instruction(
        &mut self,
        doc: NodeId,
        target: &str,
        data: &str,
    ) -> Result<NodeId, DomError> {
        if !is_qualified_name(target) {
            return Err(DomError::InvalidCharacter(target.to_string()));
        }
        if data.contains("?>") {
            return Err(DomError::InvalidCharacter(data.to_string()));
        }
        let kind = NodeKind::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        };
        Ok(self.alloc(kind, Some(doc)))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.validate_insertion(parent, child, None)?;
        self.insert_nodes(parent, child, None);
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        if let Some(reference) = reference {
            self.ensure_child_of(parent, reference)?;
        }
        self.validate_insertion(parent, child, None)?;
        let reference = match reference {
            Some(reference) if reference == child => self.data(child).next_sibling,
            other => other,
        };
        self.insert_nodes(parent, child, reference);
        Ok(())
    }

    fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<(), DomError> {
        self.ensure_child_of(parent, old_child)?;
        self.validate_insertion(parent, new_child, Some(old_child))?;
        if new_child == old_child {
            return Ok(());
        }
        let mut reference = self.data(old_child).next_sibling;
        if reference == Some(new_child) {
            reference = self.data(new_child).next_sibling;
        }
        self.detach(old_child);
        self.insert_nodes(parent, new_child, reference);
        Ok(())
    }

    fn clone_node(&mut self, node: NodeId, deep: bool) -> NodeId {
        let (kind, owner) = {
            let data = self.data(node);
            (data.kind.clone(), data.owner)
        };
        let copy = self.alloc(kind, owner);
        if deep {
            let children: Vec<NodeId> = self.children(node).collect();
            for child in children {
                let child_copy = self.clone_node(child, true);
                self.link_before(copy, child_copy, None);
            }
        }
        copy
    }

    fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        if !is_qualified_name(name) {
            return Err(DomError::InvalidCharacter(name.to_string()));
        }
        let el = self.element_mut(element)?;
        match el.attributes.iter_mut().find(|attr| attr.name() == name) {
            Some(existing) => existing.value = value.to_string(),
            None => el.attributes.push(Attribute {
                prefix: None,
                local_name: name.to_string(),
                namespace_uri: None,
                value: value.to_string(),
            }),
        }
        Ok(())
    }

    fn set_attribute_ns(
        &mut self,
        element: NodeId,
        namespace: &str,
        qualified_name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let qname = parse_qualified_name(qualified_name)
            .ok_or_else(|| DomError::InvalidCharacter(qualified_name.to_string()))?;
        let el = self.element_mut(element)?;
        let existing = el.attributes.iter_mut().find(|attr| {
            attr.namespace_uri.as_deref() == Some(namespace) && attr.local_name == qname.local_part
        });
        match existing {
            Some(existing) => {
                existing.prefix = qname.prefix.map(str::to_string);
                existing.value = value.to_string();
            }
            None => el.attributes.push(Attribute {
                prefix: qname.prefix.map(str::to_string),
                local_name: qname.local_part.to_string(),
                namespace_uri: Some(namespace.to_string()),
                value: value.to_string(),
            }),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_root(tree: &mut Tree) -> (NodeId, NodeId) {
        let doc = tree.create_document();
        let root = tree.create_element(doc, "root").unwrap();
        tree.append_child(doc, root).unwrap();
        (doc, root)
    }

    #[test]
    fn test_append_and_navigate() {
        let mut tree = Tree::new();
        let (doc, root) = doc_with_root(&mut tree);
        let a = tree.create_text(doc, "a");
        let b = tree.create_text(doc, "b");
        tree.append_child(root, a).unwrap();
        tree.append_child(root, b).unwrap();

        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.previous_sibling(b), Some(a));
        assert_eq!(tree.last_child(root), Some(b));
        assert_eq!(tree.owner_document(a), Some(doc));
        assert_eq!(tree.owner_document(doc), None);
        assert_eq!(tree.text_content(root), "ab");
    }

    #[test]
    fn test_fragment_insertion_empties_fragment() {
        let mut tree = Tree::new();
        let (doc, root) = doc_with_root(&mut tree);
        let existing = tree.create_text(doc, "z");
        tree.append_child(root, existing).unwrap();

        let frag = tree.create_document_fragment(doc);
        for text in ["x", "y"] {
            let node = tree.create_text(doc, text);
            tree.append_child(frag, node).unwrap();
        }
        tree.insert_before(root, frag, Some(existing)).unwrap();

        assert_eq!(tree.text_content(root), "xyz");
        assert_eq!(tree.first_child(frag), None);
        assert_eq!(tree.child_count(root), 3);
    }

    #[test]
    fn test_moving_an_attached_node() {
        let mut tree = Tree::new();
        let (doc, root) = doc_with_root(&mut tree);
        let a = tree.create_element(doc, "a").unwrap();
        let b = tree.create_element(doc, "b").unwrap();
        tree.append_child(root, a).unwrap();
        tree.append_child(root, b).unwrap();
        tree.append_child(b, a).unwrap();

        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![b]);
        assert_eq!(tree.parent(a), Some(b));
    }

    #[test]
    fn test_replace_child() {
        let mut tree = Tree::new();
        let (doc, root) = doc_with_root(&mut tree);
        let a = tree.create_text(doc, "a");
        let b = tree.create_text(doc, "b");
        let c = tree.create_text(doc, "c");
        tree.append_child(root, a).unwrap();
        tree.append_child(root, b).unwrap();
        tree.replace_child(root, c, a).unwrap();

        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![c, b]);
        assert_eq!(tree.parent(a), None);
    }

    #[test]
    fn test_replace_document_element() {
        let mut tree = Tree::new();
        let (doc, root) = doc_with_root(&mut tree);
        let other = tree.create_element(doc, "other").unwrap();
        tree.replace_child(doc, other, root).unwrap();
        assert_eq!(tree.document_element(doc), Some(other));
    }

    #[test]
    fn test_hierarchy_errors() {
        let mut tree = Tree::new();
        let (doc, root) = doc_with_root(&mut tree);
        let text = tree.create_text(doc, "t");
        let second = tree.create_element(doc, "second").unwrap();

        assert!(matches!(
            tree.append_child(doc, text),
            Err(DomError::HierarchyRequest(_))
        ));
        assert!(matches!(
            tree.append_child(doc, second),
            Err(DomError::HierarchyRequest(_))
        ));
        assert!(matches!(
            tree.append_child(text, second),
            Err(DomError::HierarchyRequest(_))
        ));
        assert!(matches!(
            tree.append_child(root, root),
            Err(DomError::HierarchyRequest(_))
        ));
        assert!(matches!(
            tree.insert_before(root, second, Some(text)),
            Err(DomError::NotFound(_))
        ));
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let mut tree = Tree::new();
        let (doc, root) = doc_with_root(&mut tree);
        let child = tree.create_element(doc, "child").unwrap();
        let text = tree.create_text(doc, "hello");
        tree.append_child(child, text).unwrap();
        tree.append_child(root, child).unwrap();
        tree.set_attribute(child, "id", "c1").unwrap();

        let copy = tree.clone_node(child, true);
        assert_eq!(tree.parent(copy), None);
        assert_eq!(tree.text_content(copy), "hello");
        tree.set_attribute(copy, "id", "c2").unwrap();

        assert_eq!(tree.attribute(child, "id"), Some("c1"));
        assert_eq!(tree.attribute(copy, "id"), Some("c2"));

        let shallow = tree.clone_node(child, false);
        assert_eq!(tree.first_child(shallow), None);
    }

    #[test]
    fn test_namespaced_elements_and_attributes() {
        let mut tree = Tree::new();
        let doc = tree.create_document();
        let svg = tree
            .create_element_ns(doc, "http://www.w3.org/2000/svg", "svg:rect")
            .unwrap();
        assert_eq!(tree.prefix(svg), Some("svg"));
        assert_eq!(tree.local_name(svg), Some("rect"));
        assert_eq!(tree.namespace_uri(svg), Some("http://www.w3.org/2000/svg"));
        assert_eq!(tree.tag_name(svg).as_deref(), Some("svg:rect"));

        tree.set_attribute_ns(svg, "urn:x", "x:a", "1").unwrap();
        tree.set_attribute_ns(svg, "urn:x", "y:a", "2").unwrap();
        assert_eq!(tree.attributes(svg).len(), 1);
        assert_eq!(tree.attribute_ns(svg, "urn:x", "a"), Some("2"));
        assert_eq!(tree.attribute(svg, "y:a"), Some("2"));
    }

    #[test]
    fn test_name_validation() {
        let mut tree = Tree::new();
        let doc = tree.create_document();
        assert!(matches!(
            tree.create_element(doc, "no good"),
            Err(DomError::InvalidCharacter(_))
        ));
        assert!(tree.create_processing_instruction(doc, "t", "a ?> b").is_err());
        assert!(tree.create_cdata_section(doc, "]]>").is_err());
        let text = tree.create_text(doc, "x");
        assert!(matches!(
            tree.set_attribute(text, "a", "b"),
            Err(DomError::WrongNodeType { .. })
        ));
    }
}
