//! Prefix-to-URI scopes and their recovery from an existing tree.
use mixup_dom::{NodeType, TreeBackend};
use mixup_names::{XML_NAMESPACE, declared_prefix};
use mixup_spec::{Spec, flatten};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A prefix-to-namespace mapping in effect at some point of a build.
///
/// The empty prefix holds the default namespace. Maps are threaded down the
/// recursion by value: an element that declares namespaces hands an extended
/// copy to its children and leaves its siblings' scope untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    bindings: BTreeMap<String, String>,
}

impl NamespaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The URI explicitly bound to `prefix`.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    /// Like [`get`](Self::get), but `xml` always resolves to the XML namespace.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        match self.get(prefix) {
            Some(uri) => Some(uri),
            None if prefix == "xml" => Some(XML_NAMESPACE),
            None => None,
        }
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.bindings.contains_key(prefix)
    }

    /// Binds `prefix`, overwriting any earlier binding.
    pub fn bind(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.bindings.insert(prefix.into(), uri.into());
    }

    /// Binds `prefix` only if it is still unbound. Returns whether it bound.
    pub fn bind_if_absent(&mut self, prefix: &str, uri: &str) -> bool {
        if self.bindings.contains_key(prefix) {
            return false;
        }
        self.bindings.insert(prefix.to_string(), uri.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

impl<P: Into<String>, U: Into<String>> FromIterator<(P, U)> for NamespaceMap {
    fn from_iter<I: IntoIterator<Item = (P, U)>>(iter: I) -> Self {
        let mut map = NamespaceMap::new();
        for (prefix, uri) in iter {
            map.bind(prefix, uri);
        }
        map
    }
}

/// Returns `scope` extended with the `xmlns`/`xmlns:*` declarations among
/// `attrs`, borrowing when there are none. Declared URIs are trimmed.
pub fn declared_scope<'a, N>(
    scope: &'a NamespaceMap,
    attrs: &[(&str, &Spec<N>)],
    args: &[Spec<N>],
) -> Cow<'a, NamespaceMap> {
    let mut extended = Cow::Borrowed(scope);
    for &(key, value) in attrs {
        if let Some(prefix) = declared_prefix(key)
            && let Some(uri) = flatten(value, args)
        {
            extended.to_mut().bind(prefix, uri.trim());
        }
    }
    extended
}

/// Recovers the namespace bindings in effect at `node` by walking it and its
/// ancestors. The walk stops at the first non-element.
///
/// The closest binding wins: a prefix seen on a nearer element is never
/// overwritten by an ancestor's. Each element contributes its own prefix and
/// namespace, its `xmlns`/`xmlns:*` attributes, and the prefixes of its
/// namespaced attributes.
pub fn gather_namespaces<B: TreeBackend>(tree: &B, node: B::Node) -> NamespaceMap {
    let mut scope = NamespaceMap::new();
    let mut current = Some(node);
    while let Some(element) = current {
        if tree.node_type(element) != NodeType::Element {
            break;
        }
        if let Some(uri) = tree.namespace_uri(element) {
            scope.bind_if_absent(tree.prefix(element).unwrap_or(""), uri);
        }
        for attr in tree.attributes(element) {
            if let Some(prefix) = declared_prefix(&attr.name()) {
                scope.bind_if_absent(prefix, &attr.value);
            } else if let Some(uri) = attr.namespace_uri.as_deref() {
                scope.bind_if_absent(attr.prefix.as_deref().unwrap_or(""), uri);
            }
        }
        current = tree.parent(element);
    }
    log::trace!("Gathered {} namespace bindings", scope.len());
    scope
}
