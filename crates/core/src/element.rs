//! Creates a namespace-correct element and its attributes.
use crate::config::NamespacePolicy;
use crate::error::BuildError;
use crate::namespace::{NamespaceMap, declared_scope};
use itertools::Itertools;
use mixup_dom::TreeBackend;
use mixup_names::{XMLNS_NAMESPACE, compare_attribute_keys, is_ncname, parse_qualified_name};
use mixup_spec::{Spec, flatten};

/// How an element's name was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagName {
    /// A `prefix:local` or plain `local` string.
    Qualified(String),
    /// An explicit prefix and local part.
    Pair { prefix: Option<String>, local: String },
}

impl TagName {
    /// Validates the name and returns `(qualified_name, prefix)`, where the
    /// prefix is `""` for unprefixed names.
    fn resolve(&self) -> Result<(String, String), BuildError> {
        match self {
            TagName::Qualified(name) => {
                let qname = parse_qualified_name(name)
                    .ok_or_else(|| BuildError::InvalidName(name.clone()))?;
                Ok((name.clone(), qname.prefix_or_default().to_string()))
            }
            TagName::Pair { prefix, local } => {
                let prefix = prefix.as_deref().unwrap_or("");
                let qualified = if prefix.is_empty() {
                    local.clone()
                } else {
                    format!("{}:{}", prefix, local)
                };
                if !is_ncname(local) || !(prefix.is_empty() || is_ncname(prefix)) {
                    return Err(BuildError::InvalidName(qualified));
                }
                Ok((qualified, prefix.to_string()))
            }
        }
    }
}

fn unbound_prefix(policy: NamespacePolicy, prefix: &str, name: &str) -> Result<(), BuildError> {
    match policy {
        NamespacePolicy::Strict => Err(BuildError::UnboundPrefix {
            prefix: prefix.to_string(),
            name: name.to_string(),
        }),
        NamespacePolicy::Permissive => {
            log::warn!(
                "No namespace bound for prefix '{}'; creating '{}' without a namespace",
                prefix,
                name
            );
            Ok(())
        }
    }
}

/// Creates a detached element named `tag` in `doc` and sets `attrs` on it.
///
/// Namespace declarations among `attrs` extend `namespaces` first, so the
/// element itself and its attributes already see them. Returns the element
/// with that extended scope, which is the scope for its children.
pub fn materialize_element<B: TreeBackend>(
    tree: &mut B,
    doc: B::Node,
    tag: &TagName,
    namespaces: &NamespaceMap,
    attrs: &[(&str, &Spec<B::Node>)],
    args: &[Spec<B::Node>],
    policy: NamespacePolicy,
) -> Result<(B::Node, NamespaceMap), BuildError> {
    let (qualified, prefix) = tag.resolve()?;

    let scope = declared_scope(namespaces, attrs, args).into_owned();

    let element = match scope.resolve(&prefix).filter(|uri| !uri.is_empty()) {
        Some(uri) => tree.create_element_ns(doc, uri, &qualified)?,
        None => {
            if !prefix.is_empty() {
                unbound_prefix(policy, &prefix, &qualified)?;
            }
            tree.create_element(doc, &qualified)?
        }
    };

    for &(key, value) in attrs
        .iter()
        .sorted_by(|(a, _), (b, _)| compare_attribute_keys(a, b))
    {
        let Some(qname) = parse_qualified_name(key) else {
            log::trace!("Skipping attribute with invalid name '{}'", key);
            continue;
        };
        let Some(text) = flatten(value, args) else {
            continue;
        };
        if qname.is_namespace_declaration() {
            tree.set_attribute_ns(element, XMLNS_NAMESPACE, key, &text)?;
            continue;
        }
        match qname.prefix {
            Some(attr_prefix) => match scope.resolve(attr_prefix).filter(|uri| !uri.is_empty()) {
                Some(uri) => tree.set_attribute_ns(element, uri, key, &text)?,
                None => {
                    unbound_prefix(policy, attr_prefix, key)?;
                    tree.set_attribute(element, key, &text)?;
                }
            },
            None => tree.set_attribute(element, key, &text)?,
        }
    }

    Ok((element, scope))
}
