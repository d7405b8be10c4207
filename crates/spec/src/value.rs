//! Defines the `Spec` value tree a caller hands to the builder.
use indexmap::IndexMap;
use serde_json::{Number, Value};
use std::fmt;
use std::rc::Rc;

/// An ordered mapping from key to spec; iteration follows insertion order.
pub type SpecMap<N> = IndexMap<String, Spec<N>>;

/// A deferred spec or value. Invoked with the build's args spread as a slice.
pub struct Thunk<N>(Rc<dyn Fn(&[Spec<N>]) -> Spec<N>>);

impl<N> Thunk<N> {
    pub fn new(f: impl Fn(&[Spec<N>]) -> Spec<N> + 'static) -> Self {
        Thunk(Rc::new(f))
    }

    pub fn call(&self, args: &[Spec<N>]) -> Spec<N> {
        (self.0)(args)
    }
}

impl<N> Clone for Thunk<N> {
    fn clone(&self) -> Self {
        Thunk(Rc::clone(&self.0))
    }
}

impl<N> fmt::Debug for Thunk<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Thunk(..)")
    }
}

/// A declarative description of markup, generic over the backend's node handle.
///
/// The same type serves both as a spec (something to build) and as a value
/// (something to flatten into an attribute or character data).
#[derive(Debug, Clone)]
pub enum Spec<N> {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// An ordered sequence; built as siblings or flattened space-separated.
    List(Vec<Spec<N>>),
    /// An object spec: designator, attributes and children.
    Map(SpecMap<N>),
    /// A callable evaluated lazily with the build args.
    Func(Thunk<N>),
    /// An existing node, deep-cloned wherever it is built.
    Node(N),
}

impl<N> Spec<N> {
    pub fn func(f: impl Fn(&[Spec<N>]) -> Spec<N> + 'static) -> Self {
        Spec::Func(Thunk::new(f))
    }

    pub fn node(node: N) -> Self {
        Spec::Node(node)
    }

    pub fn list(items: impl IntoIterator<Item = Spec<N>>) -> Self {
        Spec::List(items.into_iter().collect())
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Spec<N>)>) -> Self {
        Spec::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Spec::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Spec::String(s) => Some(s),
            _ => None,
        }
    }

    /// The string form of a boolean, number or string. `None` for anything else.
    pub fn atom_string(&self) -> Option<String> {
        match self {
            Spec::Bool(b) => Some(b.to_string()),
            Spec::Number(n) => Some(number_to_string(n)),
            Spec::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// A short name for the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Spec::Null => "null",
            Spec::Bool(_) => "boolean",
            Spec::Number(_) => "number",
            Spec::String(_) => "string",
            Spec::List(_) => "list",
            Spec::Map(_) => "mapping",
            Spec::Func(_) => "callable",
            Spec::Node(_) => "node",
        }
    }

    /// Views a designator's value as its children: a list's items, or the
    /// value itself as the only child.
    pub fn as_children(&self) -> &[Spec<N>] {
        match self {
            Spec::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

impl<N: Clone> Spec<N> {
    /// Owned form of [`as_children`](Self::as_children).
    pub fn to_children(&self) -> Vec<Spec<N>> {
        self.as_children().to_vec()
    }
}

/// Formats a JSON number the way ECMAScript's `Number#toString` does for
/// integral values, so `1.0` renders as `1`.
pub fn number_to_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) => format_f64(f),
        None => n.to_string(),
    }
}

pub(crate) fn format_f64(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if f == 0.0 {
        "0".to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{:.0}", f)
    } else {
        format!("{}", f)
    }
}

// --- Conversions ---

impl<N> From<Value> for Spec<N> {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Spec::Null,
            Value::Bool(b) => Spec::Bool(b),
            Value::Number(n) => Spec::Number(n),
            Value::String(s) => Spec::String(s),
            Value::Array(items) => Spec::List(items.into_iter().map(Spec::from).collect()),
            Value::Object(map) => {
                Spec::Map(map.into_iter().map(|(k, v)| (k, Spec::from(v))).collect())
            }
        }
    }
}

impl<N> From<&str> for Spec<N> {
    fn from(s: &str) -> Self {
        Spec::String(s.to_string())
    }
}

impl<N> From<String> for Spec<N> {
    fn from(s: String) -> Self {
        Spec::String(s)
    }
}

impl<N> From<bool> for Spec<N> {
    fn from(b: bool) -> Self {
        Spec::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(impl<N> From<$ty> for Spec<N> {
            fn from(n: $ty) -> Self {
                Spec::Number(Number::from(n))
            }
        })*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl<N> From<f64> for Spec<N> {
    fn from(f: f64) -> Self {
        Number::from_f64(f)
            .map(Spec::Number)
            .unwrap_or_else(|| Spec::String(format_f64(f)))
    }
}

impl<N> From<Vec<Spec<N>>> for Spec<N> {
    fn from(items: Vec<Spec<N>>) -> Self {
        Spec::List(items)
    }
}

impl<N> From<SpecMap<N>> for Spec<N> {
    fn from(map: SpecMap<N>) -> Self {
        Spec::Map(map)
    }
}

impl<N> From<Thunk<N>> for Spec<N> {
    fn from(thunk: Thunk<N>) -> Self {
        Spec::Func(thunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type S = Spec<u32>;

    #[test]
    fn test_from_json_preserves_key_order() {
        let spec = S::from(json!({ "#p": "x", "b": 1, "a": 2 }));
        let Spec::Map(map) = spec else {
            panic!("expected a mapping");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["#p", "b", "a"]);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(S::from(json!(1.0)).atom_string().unwrap(), "1");
        assert_eq!(S::from(json!(-2.5)).atom_string().unwrap(), "-2.5");
        assert_eq!(S::from(42u64).atom_string().unwrap(), "42");
        assert_eq!(S::from(f64::NAN).atom_string().unwrap(), "NaN");
        assert_eq!(S::from(f64::NEG_INFINITY).atom_string().unwrap(), "-Infinity");
        assert_eq!(S::from(-0.0).atom_string().unwrap(), "0");
    }

    #[test]
    fn test_to_children() {
        let single = S::from("a");
        assert_eq!(single.to_children().len(), 1);
        let list = S::from(json!(["a", "b"]));
        assert_eq!(list.to_children().len(), 2);
        assert!(std::ptr::eq(&single.as_children()[0], &single));
        assert_eq!(S::from(json!([])).as_children().len(), 0);
    }

    #[test]
    fn test_thunk_receives_args() {
        let thunk = S::func(|args| args.first().cloned().unwrap_or(Spec::Null));
        let Spec::Func(f) = thunk else {
            panic!("expected a callable");
        };
        let out = f.call(&[S::from("first"), S::from("second")]);
        assert_eq!(out.as_str(), Some("first"));
    }
}
