//! Name grammar for markup specs.
//!
//! Classifies qualified names following the XML `Name` production (without
//! colons for `NCName`), recognizes namespace-declaration attributes and
//! sorts out the two closed vocabularies of `#`-prefixed designator keys
//! that a spec object may carry.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// The namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
/// The namespace namespace-declaration attributes live in.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";
/// The XHTML namespace.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

// Taken from https://www.w3.org/TR/REC-xml/#NT-Name, minus the colon.
const NAME_START_CHARS: &str = concat!(
    r"A-Z_a-z\x{C0}-\x{D6}\x{D8}-\x{F6}\x{F8}-\x{2FF}\x{370}-\x{37D}",
    r"\x{37F}-\x{1FFF}\x{200C}-\x{200D}\x{2070}-\x{218F}\x{2C00}-\x{2FEF}",
    r"\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFFD}\x{10000}-\x{EFFFF}",
);
const NAME_EXTRA_CHARS: &str = r"\-.0-9\x{B7}\x{300}-\x{36F}\x{203F}-\x{2040}";

fn ncname_pattern() -> String {
    format!("([{NAME_START_CHARS}][{NAME_START_CHARS}{NAME_EXTRA_CHARS}]*)")
}

static NCNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}$", ncname_pattern())).expect("BUG: invalid NCNAME_RE pattern")
});

static QNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    let ncname = ncname_pattern();
    Regex::new(&format!("^(?:{ncname}:)?{ncname}$")).expect("BUG: invalid QNAME_RE pattern")
});

static XMLNS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^xmlns(?::{})?$", ncname_pattern()))
        .expect("BUG: invalid XMLNS_RE pattern")
});

/// Keys that designate an element whose tag name is the first child.
pub const ELEMENT_DESIGNATORS: [&str; 4] = ["#", "#elem", "#element", "#tag"];

/// Keys that designate one of the non-element node types.
pub const RESERVED_DESIGNATORS: [&str; 6] = [
    "#comment",
    "#cdata",
    "#doctype",
    "#dtd",
    "#pi",
    "#processing-instruction",
];

/// A qualified name, consisting of an optional prefix and a local part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub prefix: Option<&'a str>,
    pub local_part: &'a str,
}

impl<'a> QName<'a> {
    /// Returns the prefix, or the empty string for an unprefixed name.
    pub fn prefix_or_default(&self) -> &'a str {
        self.prefix.unwrap_or("")
    }

    /// True if this name is `xmlns` or `xmlns:*`.
    pub fn is_namespace_declaration(&self) -> bool {
        match self.prefix {
            Some(prefix) => prefix == "xmlns",
            None => self.local_part == "xmlns",
        }
    }
}

impl std::fmt::Display for QName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local_part),
            None => f.write_str(self.local_part),
        }
    }
}

/// The non-element node types a reserved designator can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedKind {
    Comment,
    CData,
    Doctype,
    ProcessingInstruction,
}

/// What a `#`-prefixed spec key designates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Designator<'a> {
    /// One of [`ELEMENT_DESIGNATORS`]; the tag name comes from the first child.
    Element,
    /// One of [`RESERVED_DESIGNATORS`].
    Reserved(ReservedKind),
    /// `#name` outside both vocabularies; the remainder is the tag name.
    Named(&'a str),
}

/// The role a key plays inside a spec object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind<'a> {
    Designator(Designator<'a>),
    Attribute(QName<'a>),
    /// Not a legal qualified name; dropped without error.
    Ignored,
}

pub fn is_ncname(s: &str) -> bool {
    NCNAME_RE.is_match(s)
}

pub fn is_qualified_name(s: &str) -> bool {
    QNAME_RE.is_match(s)
}

/// True for `xmlns` and `xmlns:NCName`.
pub fn is_namespace_declaration(key: &str) -> bool {
    XMLNS_RE.is_match(key)
}

/// Splits a string against the qualified-name grammar.
pub fn parse_qualified_name(s: &str) -> Option<QName<'_>> {
    let caps = QNAME_RE.captures(s)?;
    let local_part = caps.get(2)?.as_str();
    Some(QName {
        prefix: caps.get(1).map(|m| m.as_str()),
        local_part,
    })
}

/// Returns the prefix a namespace declaration binds, `""` for the default
/// namespace, or `None` if `key` is not a declaration.
pub fn declared_prefix(key: &str) -> Option<&str> {
    let caps = XMLNS_RE.captures(key)?;
    Some(caps.get(1).map_or("", |m| m.as_str()))
}

/// Classifies a `#`-prefixed key. Returns `None` for keys without the `#`.
pub fn classify_designator(key: &str) -> Option<Designator<'_>> {
    let rest = key.strip_prefix('#')?;
    if ELEMENT_DESIGNATORS.contains(&key) {
        return Some(Designator::Element);
    }
    let reserved = match key {
        "#comment" => Some(ReservedKind::Comment),
        "#cdata" => Some(ReservedKind::CData),
        "#doctype" | "#dtd" => Some(ReservedKind::Doctype),
        "#pi" | "#processing-instruction" => Some(ReservedKind::ProcessingInstruction),
        _ => None,
    };
    Some(match reserved {
        Some(kind) => Designator::Reserved(kind),
        None => Designator::Named(rest),
    })
}

/// Classifies any key of a spec object.
pub fn classify_key(key: &str) -> KeyKind<'_> {
    if let Some(designator) = classify_designator(key) {
        return KeyKind::Designator(designator);
    }
    match parse_qualified_name(key) {
        Some(qname) => KeyKind::Attribute(qname),
        None => KeyKind::Ignored,
    }
}

/// Attribute key order: namespace declarations first, then lexicographic.
pub fn compare_attribute_keys(a: &str, b: &str) -> Ordering {
    match (is_namespace_declaration(a), is_namespace_declaration(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.cmp(b),
    }
}
