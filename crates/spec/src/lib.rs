//! Spec values for the markup builder.
//!
//! A [`Spec`] describes markup declaratively: lists become siblings,
//! mappings become elements or other node types, callables are evaluated
//! lazily, node handles are cloned, and everything else becomes text.
//! [`flatten`] turns the same values into attribute strings.

pub mod flatten;
pub mod value;

pub use flatten::{DEFAULT_PAIR_SEPARATOR, flatten, flatten_entries, flatten_items, flatten_with};
pub use value::{Spec, SpecMap, Thunk, number_to_string};
