//! Reduces a structured value to a single string.
use crate::value::{Spec, number_to_string};
use itertools::Itertools;
use mixup_names::compare_attribute_keys;

/// The separator placed between key and value when flattening a mapping.
pub const DEFAULT_PAIR_SEPARATOR: &str = ": ";

/// Flattens `value` with the default `": "` pair separator.
///
/// Returns `None` for `Null` (and for node handles, which have no string form
/// of their own). Cyclic values are the caller's problem: there is no depth guard.
pub fn flatten<N>(value: &Spec<N>, args: &[Spec<N>]) -> Option<String> {
    flatten_with(value, args, DEFAULT_PAIR_SEPARATOR)
}

/// Flattens `value`, rendering mapping entries as `key + pair_separator + value`.
///
/// - atoms stringify directly, and an empty mapping becomes `""`;
/// - callables are invoked with `args` and their result flattened;
/// - lists flatten each item and join with a single space;
/// - mappings sort namespace declarations first, then keys lexicographically.
///
/// The separator applies to the top level only; nested values use the default.
pub fn flatten_with<N>(value: &Spec<N>, args: &[Spec<N>], pair_separator: &str) -> Option<String> {
    match value {
        Spec::Null | Spec::Node(_) => None,
        Spec::Bool(b) => Some(b.to_string()),
        Spec::Number(n) => Some(number_to_string(n)),
        Spec::String(s) => Some(s.clone()),
        Spec::Func(f) => flatten(&f.call(args), args),
        Spec::List(items) => Some(flatten_items(items, args)),
        Spec::Map(map) => Some(flatten_entries(
            map.iter().map(|(key, v)| (key.as_str(), v)),
            args,
            pair_separator,
        )),
    }
}

/// Flattens borrowed key/value pairs exactly as a mapping with those entries.
pub fn flatten_entries<'a, N: 'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a Spec<N>)>,
    args: &[Spec<N>],
    pair_separator: &str,
) -> String {
    entries
        .into_iter()
        .sorted_by(|(a, _), (b, _)| compare_attribute_keys(a, b))
        .map(|(key, v)| format!("{}{}{}", key, pair_separator, flatten(v, args).unwrap_or_default()))
        .join(" ")
}

/// Flattens each item and joins the results with a single space, as a list.
pub fn flatten_items<N>(items: &[Spec<N>], args: &[Spec<N>]) -> String {
    items
        .iter()
        .map(|item| flatten(item, args).unwrap_or_default())
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type S = Spec<u32>;

    fn flat(value: serde_json::Value) -> Option<String> {
        flatten(&S::from(value), &[])
    }

    #[test]
    fn test_atoms() {
        assert_eq!(flat(json!(null)), None);
        assert_eq!(flat(json!(true)).as_deref(), Some("true"));
        assert_eq!(flat(json!(3)).as_deref(), Some("3"));
        assert_eq!(flat(json!("text")).as_deref(), Some("text"));
        assert_eq!(flat(json!({})).as_deref(), Some(""));
        assert_eq!(flatten(&Spec::Node(7u32), &[]), None);
    }

    #[test]
    fn test_mapping_is_sorted() {
        assert_eq!(flat(json!({ "b": 1, "a": 2 })).as_deref(), Some("a: 2 b: 1"));
    }

    #[test]
    fn test_namespace_declarations_sort_first() {
        let out = flat(json!({ "a": "x", "xmlns:z": "urn:z", "xmlns": "urn:d" }));
        assert_eq!(out.as_deref(), Some("xmlns: urn:d xmlns:z: urn:z a: x"));
    }

    #[test]
    fn test_lists_join_with_spaces() {
        assert_eq!(flat(json!(["a", 1, null, ["b", "c"]])).as_deref(), Some("a 1  b c"));
        assert_eq!(flat(json!([])).as_deref(), Some(""));
    }

    #[test]
    fn test_custom_pair_separator_is_top_level_only() {
        let value = S::from(json!({ "k": "v", "n": { "x": 1 } }));
        assert_eq!(
            flatten_with(&value, &[], "=").as_deref(),
            Some("k=v n=x: 1")
        );
    }

    #[test]
    fn test_callables_receive_args() {
        let args = vec![S::from("red"), S::from(2)];
        let value = S::map([
            ("color", S::func(|args: &[S]| args[0].clone())),
            ("width", S::func(|args: &[S]| S::list(vec![args[1].clone(), S::from("px")]))),
        ]);
        assert_eq!(
            flatten(&value, &args).as_deref(),
            Some("color: red width: 2 px")
        );
    }

    #[test]
    fn test_entries_flatten_like_a_mapping() {
        let map = S::from(json!({ "type": "text/css", "xmlns:a": "urn:a", "href": "s.css" }));
        let Spec::Map(entries) = &map else {
            panic!("expected a mapping");
        };
        let pairs = entries.iter().map(|(k, v)| (k.as_str(), v));
        assert_eq!(Some(flatten_entries(pairs, &[], "=")), flatten_with(&map, &[], "="));
        assert_eq!(flatten_entries(std::iter::empty::<(&str, &S)>(), &[], "="), "");
        assert_eq!(flatten_items(&[S::from("a"), S::Null, S::from(1)], &[]), "a  1");
    }
}
