//! The four ways a built node joins the tree relative to a reference node.
use crate::error::BuildError;
use mixup_dom::{NodeType, TreeBackend};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    /// Append as the last child of the reference.
    Parent,
    /// Insert as the previous sibling of the reference.
    Before,
    /// Insert as the next sibling of the reference.
    After,
    /// Take the reference's place; the reference is detached.
    Replace,
}

impl Attachment {
    pub const ALL: [Attachment; 4] = [
        Attachment::Parent,
        Attachment::Before,
        Attachment::After,
        Attachment::Replace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Attachment::Parent => "parent",
            Attachment::Before => "before",
            Attachment::After => "after",
            Attachment::Replace => "replace",
        }
    }

    /// Inserts `node` relative to `reference` and returns the node now
    /// occupying the attachment point.
    ///
    /// For fragments that is the fragment's last (or first, for `after`)
    /// child as placed in the tree, not the emptied fragment itself. When the
    /// tree reports nothing there, the reference is returned instead.
    pub fn attach<B: TreeBackend>(
        self,
        tree: &mut B,
        node: B::Node,
        reference: B::Node,
    ) -> Result<B::Node, BuildError> {
        match self {
            Attachment::Parent => {
                tree.append_child(reference, node)?;
                Ok(tree.last_child(reference).unwrap_or(reference))
            }
            Attachment::Before => {
                let parent = self.parent_of(tree, reference)?;
                tree.insert_before(parent, node, Some(reference))?;
                Ok(tree.previous_sibling(reference).unwrap_or(reference))
            }
            Attachment::After => {
                let parent = self.parent_of(tree, reference)?;
                let next = tree.next_sibling(reference);
                tree.insert_before(parent, node, next)?;
                Ok(tree.next_sibling(reference).unwrap_or(reference))
            }
            Attachment::Replace => {
                let last = if tree.node_type(node) == NodeType::DocumentFragment {
                    tree.last_child(node)
                } else {
                    Some(node)
                };
                let parent = self.parent_of(tree, reference)?;
                tree.replace_child(parent, node, reference)?;
                Ok(last.unwrap_or(parent))
            }
        }
    }

    fn parent_of<B: TreeBackend>(self, tree: &B, reference: B::Node) -> Result<B::Node, BuildError> {
        tree.parent(reference)
            .ok_or(BuildError::DetachedReference(self))
    }
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixup_dom::Tree;

    fn setup() -> (Tree, mixup_dom::NodeId, mixup_dom::NodeId, mixup_dom::NodeId) {
        let mut tree = Tree::new();
        let doc = tree.create_document();
        let root = tree.create_element(doc, "root").unwrap();
        tree.append_child(doc, root).unwrap();
        let mid = tree.create_element(doc, "mid").unwrap();
        tree.append_child(root, mid).unwrap();
        (tree, doc, root, mid)
    }

    fn names(tree: &Tree, parent: mixup_dom::NodeId) -> Vec<String> {
        tree.children(parent)
            .map(|c| tree.tag_name(c).unwrap_or_else(|| "#text".to_string()))
            .collect()
    }

    #[test]
    fn test_parent_returns_last_child() {
        let (mut tree, doc, root, _) = setup();
        let new = tree.create_element(doc, "new").unwrap();
        let got = Attachment::Parent.attach(&mut tree, new, root).unwrap();
        assert_eq!(got, new);
        assert_eq!(names(&tree, root), vec!["mid", "new"]);
    }

    #[test]
    fn test_before_and_after() {
        let (mut tree, doc, root, mid) = setup();
        let a = tree.create_element(doc, "a").unwrap();
        let b = tree.create_element(doc, "b").unwrap();
        assert_eq!(Attachment::Before.attach(&mut tree, a, mid).unwrap(), a);
        assert_eq!(Attachment::After.attach(&mut tree, b, mid).unwrap(), b);
        assert_eq!(names(&tree, root), vec!["a", "mid", "b"]);
    }

    #[test]
    fn test_after_fragment_returns_first_inserted() {
        let (mut tree, doc, root, mid) = setup();
        let frag = tree.create_document_fragment(doc);
        let x = tree.create_element(doc, "x").unwrap();
        let y = tree.create_element(doc, "y").unwrap();
        tree.append_child(frag, x).unwrap();
        tree.append_child(frag, y).unwrap();
        assert_eq!(Attachment::After.attach(&mut tree, frag, mid).unwrap(), x);
        assert_eq!(names(&tree, root), vec!["mid", "x", "y"]);
    }

    #[test]
    fn test_before_fragment_returns_last_inserted() {
        let (mut tree, doc, root, mid) = setup();
        let frag = tree.create_document_fragment(doc);
        let x = tree.create_element(doc, "x").unwrap();
        let y = tree.create_element(doc, "y").unwrap();
        tree.append_child(frag, x).unwrap();
        tree.append_child(frag, y).unwrap();
        assert_eq!(Attachment::Before.attach(&mut tree, frag, mid).unwrap(), y);
        assert_eq!(names(&tree, root), vec!["x", "y", "mid"]);
    }

    #[test]
    fn test_replace_fragment_returns_last_inserted() {
        let (mut tree, doc, root, mid) = setup();
        let frag = tree.create_document_fragment(doc);
        let x = tree.create_element(doc, "x").unwrap();
        let y = tree.create_element(doc, "y").unwrap();
        tree.append_child(frag, x).unwrap();
        tree.append_child(frag, y).unwrap();
        assert_eq!(Attachment::Replace.attach(&mut tree, frag, mid).unwrap(), y);
        assert_eq!(names(&tree, root), vec!["x", "y"]);
        assert_eq!(tree.parent(mid), None);
    }

    #[test]
    fn test_sibling_modes_need_a_parent() {
        let (mut tree, doc, _, _) = setup();
        let loose = tree.create_element(doc, "loose").unwrap();
        for mode in [Attachment::Before, Attachment::After, Attachment::Replace] {
            let node = tree.create_element(doc, "n").unwrap();
            let err = mode.attach(&mut tree, node, loose).unwrap_err();
            assert_eq!(err, BuildError::DetachedReference(mode));
        }
        assert_eq!(
            BuildError::DetachedReference(Attachment::Before).to_string(),
            "before node must have a parent node"
        );
    }
}
