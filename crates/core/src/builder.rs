//! The recursive spec interpreter.
use crate::attach::Attachment;
use crate::config::BuildConfig;
use crate::element::{TagName, materialize_element};
use crate::error::BuildError;
use crate::namespace::{NamespaceMap, gather_namespaces};
use crate::request::{Request, Target, normalize};
use itertools::Itertools;
use mixup_dom::TreeBackend;
use mixup_names::{Designator, KeyKind, ReservedKind, classify_key, parse_qualified_name};
use mixup_spec::{Spec, SpecMap, flatten, flatten_entries, flatten_items};

/// Where the node built from the current spec goes.
#[derive(Debug, Clone, Copy)]
struct Position<N> {
    mode: Attachment,
    reference: N,
    doc: N,
}

impl<N> Position<N> {
    fn inside(node: N, doc: N) -> Self {
        Position {
            mode: Attachment::Parent,
            reference: node,
            doc,
        }
    }
}

/// An object spec taken apart: at most one designator plus attributes,
/// all borrowed from the spec.
struct ObjectParts<'s, N> {
    designator: Option<(&'s str, Designator<'s>)>,
    children: &'s [Spec<N>],
    attrs: Vec<(&'s str, &'s Spec<N>)>,
}

/// Builds specs into a tree through its [`TreeBackend`].
///
/// ```ignore
/// let mut tree = Tree::new();
/// let doc = tree.create_document();
/// let spec = Spec::from(json!({ "#p": ["Hello, ", { "#b": "world" }] }));
/// let p = MarkupBuilder::new(&mut tree).build(doc, spec, vec![])?;
/// ```
pub struct MarkupBuilder<'t, B: TreeBackend> {
    tree: &'t mut B,
    config: BuildConfig,
}

impl<'t, B: TreeBackend> MarkupBuilder<'t, B> {
    pub fn new(tree: &'t mut B) -> Self {
        Self {
            tree,
            config: BuildConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Builds `spec` at `target` and returns the node now at the attachment
    /// point: the new node, the last (or for `after`, first) node of a batch,
    /// or the reference itself when nothing was inserted. An element with
    /// children returns what building its children returned instead.
    pub fn build(
        &mut self,
        target: impl Into<Target<B::Node>>,
        spec: Spec<B::Node>,
        args: Vec<Spec<B::Node>>,
    ) -> Result<B::Node, BuildError> {
        let request = normalize(self.tree, target.into(), spec, args)?;
        self.run(request)
    }

    /// Builds an already normalized request.
    pub fn run(&mut self, request: Request<B::Node>) -> Result<B::Node, BuildError> {
        let scope = gather_namespaces(&*self.tree, request.anchor);
        let at = Position {
            mode: request.mode,
            reference: request.reference,
            doc: request.doc,
        };
        self.build_spec(at, &scope, &request.spec, &request.args)
    }

    fn build_spec(
        &mut self,
        at: Position<B::Node>,
        scope: &NamespaceMap,
        spec: &Spec<B::Node>,
        args: &[Spec<B::Node>],
    ) -> Result<B::Node, BuildError> {
        match spec {
            Spec::Null => Ok(at.reference),
            Spec::List(items) => self.build_list(at, scope, items, args),
            Spec::Func(thunk) => {
                let produced = thunk.call(args);
                self.build_spec(at, scope, &produced, args)
            }
            Spec::Node(node) => {
                let copy = self.tree.clone_node(*node, true);
                at.mode.attach(self.tree, copy, at.reference)
            }
            Spec::Map(map) if map.is_empty() => self.build_text(at, ""),
            Spec::Map(map) => self.build_object(at, scope, map, args),
            Spec::Bool(_) | Spec::Number(_) | Spec::String(_) => {
                let text = spec.atom_string().unwrap_or_default();
                self.build_text(at, &text)
            }
        }
    }

    /// Empty lists insert nothing; a single item builds directly; longer
    /// lists are built into one fragment that is attached in a single step.
    fn build_list(
        &mut self,
        at: Position<B::Node>,
        scope: &NamespaceMap,
        items: &[Spec<B::Node>],
        args: &[Spec<B::Node>],
    ) -> Result<B::Node, BuildError> {
        match items {
            [] => Ok(at.reference),
            [only] => self.build_spec(at, scope, only, args),
            _ => {
                let fragment = self.tree.create_document_fragment(at.doc);
                let inner = Position::inside(fragment, at.doc);
                for item in items {
                    self.build_spec(inner, scope, item, args)?;
                }
                if self.tree.first_child(fragment).is_none() {
                    return Ok(at.reference);
                }
                log::trace!("Attaching batch of {} specs ({})", items.len(), at.mode);
                at.mode.attach(self.tree, fragment, at.reference)
            }
        }
    }

    fn build_text(&mut self, at: Position<B::Node>, text: &str) -> Result<B::Node, BuildError> {
        let node = self.tree.create_text(at.doc, text);
        at.mode.attach(self.tree, node, at.reference)
    }

    fn build_object(
        &mut self,
        at: Position<B::Node>,
        scope: &NamespaceMap,
        map: &SpecMap<B::Node>,
        args: &[Spec<B::Node>],
    ) -> Result<B::Node, BuildError> {
        let ObjectParts {
            designator,
            children,
            attrs,
        } = split_object(map)?;

        let Some((key, designator)) = designator else {
            return self.build_shorthand(at, scope, map, args);
        };
        log::trace!("Building '{}' with {} children", key, children.len());

        match designator {
            Designator::Reserved(kind) => self.build_reserved(at, kind, children, &attrs, args),
            Designator::Element => {
                let (first, children) = children.split_first().ok_or(BuildError::MissingTagName)?;
                let tag = tag_from_spec(first, args)?;
                self.build_element(at, scope, &tag, &attrs, children, args)
            }
            Designator::Named(name) => {
                let tag = TagName::Qualified(name.to_string());
                self.build_element(at, scope, &tag, &attrs, children, args)
            }
        }
    }

    /// `{"svg:rect": children}`: a lone qualified-name key names the element.
    fn build_shorthand(
        &mut self,
        at: Position<B::Node>,
        scope: &NamespaceMap,
        map: &SpecMap<B::Node>,
        args: &[Spec<B::Node>],
    ) -> Result<B::Node, BuildError> {
        let shorthand = match map.get_index(0) {
            Some((key, value)) if map.len() == 1 => parse_qualified_name(key)
                .filter(|qname| !qname.is_namespace_declaration())
                .map(|_| (key, value)),
            _ => None,
        };
        let Some((key, value)) = shorthand else {
            return Err(BuildError::MissingDesignator(map.keys().join(", ")));
        };
        let tag = TagName::Qualified(key.clone());
        self.build_element(at, scope, &tag, &[], value.as_children(), args)
    }

    fn build_element(
        &mut self,
        at: Position<B::Node>,
        scope: &NamespaceMap,
        tag: &TagName,
        attrs: &[(&str, &Spec<B::Node>)],
        children: &[Spec<B::Node>],
        args: &[Spec<B::Node>],
    ) -> Result<B::Node, BuildError> {
        let (element, child_scope) = materialize_element(
            self.tree,
            at.doc,
            tag,
            scope,
            attrs,
            args,
            self.config.namespace_policy,
        )?;
        let attached = at.mode.attach(self.tree, element, at.reference)?;
        if children.is_empty() {
            return Ok(attached);
        }
        self.build_list(Position::inside(element, at.doc), &child_scope, children, args)
    }

    fn build_reserved(
        &mut self,
        at: Position<B::Node>,
        kind: ReservedKind,
        children: &[Spec<B::Node>],
        attrs: &[(&str, &Spec<B::Node>)],
        args: &[Spec<B::Node>],
    ) -> Result<B::Node, BuildError> {
        let node = match kind {
            ReservedKind::Comment => {
                let data = flatten_items(children, args);
                self.tree.create_comment(at.doc, &data)
            }
            ReservedKind::CData => {
                let data = flatten_items(children, args);
                self.tree.create_cdata_section(at.doc, &data)?
            }
            ReservedKind::ProcessingInstruction => {
                let (target, rest) = children
                    .split_first()
                    .ok_or(BuildError::MissingPiTarget)?;
                let target = flatten(target, args)
                    .filter(|t| !t.is_empty())
                    .ok_or(BuildError::MissingPiTarget)?;
                let pairs = flatten_entries(attrs.iter().copied(), args, "=");
                let data = format!("{} {}", pairs, flatten_items(rest, args));
                self.tree
                    .create_processing_instruction(at.doc, &target, data.trim())?
            }
            ReservedKind::Doctype => return Err(BuildError::DoctypeUnsupported),
        };
        at.mode.attach(self.tree, node, at.reference)
    }
}

/// Splits an object spec into its designator, children and attributes.
/// Non-name keys are dropped; a second designator is an error.
fn split_object<N>(map: &SpecMap<N>) -> Result<ObjectParts<'_, N>, BuildError> {
    let mut parts = ObjectParts {
        designator: None,
        children: &[],
        attrs: Vec::new(),
    };
    for (key, value) in map {
        match classify_key(key) {
            KeyKind::Designator(designator) => {
                if let Some((first, _)) = parts.designator {
                    return Err(BuildError::AmbiguousDesignators(
                        first.to_string(),
                        key.clone(),
                    ));
                }
                parts.designator = Some((key.as_str(), designator));
                parts.children = value.as_children();
            }
            KeyKind::Attribute(_) => parts.attrs.push((key.as_str(), value)),
            KeyKind::Ignored => log::trace!("Ignoring spec key '{}'", key),
        }
    }
    Ok(parts)
}

/// Reads the tag name from an element designator's first child: a
/// `[prefix, local]` pair or anything that flattens to a name.
fn tag_from_spec<N>(first: &Spec<N>, args: &[Spec<N>]) -> Result<TagName, BuildError> {
    match first {
        Spec::List(parts) if parts.len() == 2 => {
            let prefix = flatten(&parts[0], args).filter(|p| !p.is_empty());
            let local = flatten(&parts[1], args).ok_or(BuildError::MissingTagName)?;
            Ok(TagName::Pair { prefix, local })
        }
        other => flatten(other, args)
            .map(TagName::Qualified)
            .ok_or(BuildError::MissingTagName),
    }
}

/// Builds `spec` at `target` with the default configuration.
pub fn build<B: TreeBackend>(
    tree: &mut B,
    target: impl Into<Target<B::Node>>,
    spec: Spec<B::Node>,
    args: Vec<Spec<B::Node>>,
) -> Result<B::Node, BuildError> {
    MarkupBuilder::new(tree).build(target, spec, args)
}
