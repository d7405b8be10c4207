//! Normalizes the different ways of calling the builder into one request.
use crate::attach::Attachment;
use crate::error::BuildError;
use mixup_dom::{NodeType, TreeBackend};
use mixup_spec::Spec;

/// Where and how a build attaches its output.
///
/// At most one of `parent`, `before`, `after` and `replace` may be set. With
/// none set, the build goes into `doc`, or into a fresh document.
#[derive(Debug, Clone)]
pub struct BuildOptions<N> {
    pub parent: Option<N>,
    pub before: Option<N>,
    pub after: Option<N>,
    pub replace: Option<N>,
    /// Overrides the spec passed alongside the options.
    pub spec: Option<Spec<N>>,
    /// Overrides the args passed alongside the options.
    pub args: Option<Vec<Spec<N>>>,
    /// The node whose ancestry supplies the initial namespace scope.
    pub pseudo: Option<N>,
    /// The document new nodes are created in.
    pub doc: Option<N>,
}

impl<N> Default for BuildOptions<N> {
    fn default() -> Self {
        Self {
            parent: None,
            before: None,
            after: None,
            replace: None,
            spec: None,
            args: None,
            pseudo: None,
            doc: None,
        }
    }
}

impl<N> BuildOptions<N> {
    /// Options that build into a new document.
    pub fn new_document() -> Self {
        Self::default()
    }

    pub fn parent(node: N) -> Self {
        Self {
            parent: Some(node),
            ..Self::default()
        }
    }

    pub fn before(node: N) -> Self {
        Self {
            before: Some(node),
            ..Self::default()
        }
    }

    pub fn after(node: N) -> Self {
        Self {
            after: Some(node),
            ..Self::default()
        }
    }

    pub fn replace(node: N) -> Self {
        Self {
            replace: Some(node),
            ..Self::default()
        }
    }

    pub fn with_spec(mut self, spec: Spec<N>) -> Self {
        self.spec = Some(spec);
        self
    }

    pub fn with_args(mut self, args: Vec<Spec<N>>) -> Self {
        self.args = Some(args);
        self
    }

    pub fn with_pseudo(mut self, node: N) -> Self {
        self.pseudo = Some(node);
        self
    }

    pub fn with_doc(mut self, node: N) -> Self {
        self.doc = Some(node);
        self
    }
}

impl<N: Copy> BuildOptions<N> {
    fn bindings(&self) -> impl Iterator<Item = (Attachment, N)> + '_ {
        [
            (Attachment::Parent, self.parent),
            (Attachment::Before, self.before),
            (Attachment::After, self.after),
            (Attachment::Replace, self.replace),
        ]
        .into_iter()
        .filter_map(|(mode, node)| node.map(|n| (mode, n)))
    }
}

/// The first argument of a build: a bare node (meaning "append to it") or
/// a full set of options.
#[derive(Debug, Clone)]
pub enum Target<N> {
    Node(N),
    Options(BuildOptions<N>),
}

impl<N> From<N> for Target<N> {
    fn from(node: N) -> Self {
        Target::Node(node)
    }
}

impl<N> From<BuildOptions<N>> for Target<N> {
    fn from(options: BuildOptions<N>) -> Self {
        Target::Options(options)
    }
}

impl<N: Clone> Target<N> {
    /// Reads a target out of a dynamic value: a node, or a mapping with any
    /// of the option keys. Null option values count as absent; unknown keys
    /// are ignored.
    pub fn from_spec(value: &Spec<N>) -> Result<Self, BuildError> {
        let map = match value {
            Spec::Node(node) => return Ok(Target::Node(node.clone())),
            Spec::Map(map) => map,
            other => return Err(BuildError::UnsupportedInput(other.kind().to_string())),
        };

        let mut options = BuildOptions::default();
        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            let slot = match key.as_str() {
                "parent" => &mut options.parent,
                "before" => &mut options.before,
                "after" => &mut options.after,
                "replace" => &mut options.replace,
                "pseudo" => &mut options.pseudo,
                "doc" => &mut options.doc,
                "spec" => {
                    options.spec = Some(value.clone());
                    continue;
                }
                "args" => {
                    options.args = Some(value.to_children());
                    continue;
                }
                _ => continue,
            };
            match value {
                Spec::Node(node) => *slot = Some(node.clone()),
                other => {
                    return Err(BuildError::NotANode {
                        key: key.clone(),
                        found: other.kind().to_string(),
                    });
                }
            }
        }
        Ok(Target::Options(options))
    }
}

/// A build with every default filled in.
#[derive(Debug, Clone)]
pub struct Request<N> {
    pub mode: Attachment,
    /// The node the output is attached relative to.
    pub reference: N,
    /// The node whose ancestry seeds the namespace scope.
    pub anchor: N,
    /// The document new nodes are created in.
    pub doc: N,
    pub spec: Spec<N>,
    pub args: Vec<Spec<N>>,
}

fn document_of<B: TreeBackend>(tree: &mut B, node: B::Node) -> B::Node {
    if tree.node_type(node) == NodeType::Document {
        return node;
    }
    match tree.owner_document(node) {
        Some(doc) => doc,
        None => tree.create_document(),
    }
}

/// Resolves `target` against the tree. May create a document when the
/// target names none.
pub fn normalize<B: TreeBackend>(
    tree: &mut B,
    target: Target<B::Node>,
    spec: Spec<B::Node>,
    args: Vec<Spec<B::Node>>,
) -> Result<Request<B::Node>, BuildError> {
    let options = match target {
        Target::Node(node) => {
            let doc = document_of(tree, node);
            return Ok(Request {
                mode: Attachment::Parent,
                reference: node,
                anchor: node,
                doc,
                spec,
                args,
            });
        }
        Target::Options(options) => options,
    };

    let mut bound: Option<(Attachment, B::Node)> = None;
    for (mode, node) in options.bindings() {
        if let Some((existing, _)) = bound {
            return Err(BuildError::ConflictingBinding { mode, existing });
        }
        let found = tree.node_type(node);
        if !found.is_container() {
            return Err(BuildError::NotElementOrDocument { mode, found });
        }
        bound = Some((mode, node));
    }

    let (spec, mut args) = match options.spec {
        // With the spec carried in the options, a positional list is the args.
        Some(carried) => match spec {
            Spec::List(items) => (carried, items),
            _ => (carried, args),
        },
        None => (spec, args),
    };
    if let Some(override_args) = options.args {
        args = override_args;
    }

    let request = match bound {
        Some((mode, reference)) => {
            let doc = match options.doc {
                Some(doc) => doc,
                None => document_of(tree, reference),
            };
            let anchor = match (options.pseudo, mode) {
                (Some(pseudo), _) => pseudo,
                (None, Attachment::Parent) => reference,
                (None, _) => tree
                    .parent(reference)
                    .ok_or(BuildError::DetachedReference(mode))?,
            };
            Request {
                mode,
                reference,
                anchor,
                doc,
                spec,
                args,
            }
        }
        None => {
            let doc = match options.doc {
                Some(doc) => doc,
                None => tree.create_document(),
            };
            Request {
                mode: Attachment::Parent,
                reference: doc,
                anchor: options.pseudo.unwrap_or(doc),
                doc,
                spec,
                args,
            }
        }
    };
    log::debug!(
        "Normalized build: mode={}, {} args",
        request.mode,
        request.args.len()
    );
    Ok(request)
}
