//! The compact type-name syntax used throughout a service definition.
//!
//! ```text
//! type  := array | map | leaf
//! array := "[" type "]"
//! map   := "map[" type "]"
//! leaf  := anything else
//! ```
//!
//! A wrapper is only recognized when its brackets form one balanced pair around a non-empty
//! inner span, so `[string`, `[]`, `map[]` and `[a][b]` are all leaves. Nothing is trimmed;
//! whitespace is part of the name it appears in.

use std::fmt;

use tracing::trace;

use crate::builtins::is_primitive_kind_name;

const MAP_PREFIX: &str = "map[";
const ARRAY_PREFIX: char = '[';
const SUFFIX: char = ']';

/// The two kinds of type that enclose another type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnclosingKind {
    Array,
    Map,
}

impl EnclosingKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for EnclosingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed type name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// A bare name: a primitive kind, or a (possibly unqualified) custom type name.
    Leaf { name: String },
    /// An array or map of `inner`.
    Enclosing {
        kind: EnclosingKind,
        inner: Box<TypeName>,
    },
}

impl TypeName {
    /// Parses a type name. Never fails; input that is not a well-formed wrapper is a leaf.
    ///
    /// ```
    /// use dt_apibuilder::ast::TypeName;
    ///
    /// let ast = TypeName::parse("map[[string]]");
    /// assert_eq!(ast, TypeName::map(TypeName::array(TypeName::leaf("string"))));
    /// assert_eq!(ast.to_string(), "map[[string]]");
    /// ```
    pub fn parse(input: &str) -> Self {
        match split_enclosing(input) {
            Some((kind, inner)) => {
                trace!(%kind, inner, "unwrapping enclosing type name");
                Self::Enclosing {
                    kind,
                    inner: Box::new(Self::parse(inner)),
                }
            }
            None => Self::leaf(input),
        }
    }

    pub fn leaf(name: impl Into<String>) -> Self {
        Self::Leaf { name: name.into() }
    }

    pub fn array(inner: TypeName) -> Self {
        Self::Enclosing {
            kind: EnclosingKind::Array,
            inner: Box::new(inner),
        }
    }

    pub fn map(inner: TypeName) -> Self {
        Self::Enclosing {
            kind: EnclosingKind::Map,
            inner: Box::new(inner),
        }
    }

    /// The kind of the outermost wrapper, `None` for a leaf.
    pub fn enclosing_kind(&self) -> Option<EnclosingKind> {
        match self {
            Self::Leaf { .. } => None,
            Self::Enclosing { kind, .. } => Some(*kind),
        }
    }

    /// The node directly enclosed by this one, `None` for a leaf.
    pub fn nested(&self) -> Option<&TypeName> {
        match self {
            Self::Leaf { .. } => None,
            Self::Enclosing { inner, .. } => Some(inner.as_ref()),
        }
    }

    /// The name of the innermost leaf.
    pub fn base_type_name(&self) -> &str {
        let mut node = self;
        loop {
            match node {
                Self::Leaf { name } => return name,
                Self::Enclosing { inner, .. } => node = inner.as_ref(),
            }
        }
    }

    /// Whether the base type is a primitive kind.
    pub fn is_primitive(&self) -> bool {
        is_primitive_kind_name(self.base_type_name())
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf { name } => f.write_str(name),
            Self::Enclosing {
                kind: EnclosingKind::Map,
                inner,
            } => write!(f, "{MAP_PREFIX}{inner}{SUFFIX}"),
            Self::Enclosing {
                kind: EnclosingKind::Array,
                inner,
            } => write!(f, "{ARRAY_PREFIX}{inner}{SUFFIX}"),
        }
    }
}

impl From<&str> for TypeName {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

/// Splits off the outermost wrapper of `input`, returning its kind and the enclosed span.
fn split_enclosing(input: &str) -> Option<(EnclosingKind, &str)> {
    if let Some(inner) = input
        .strip_prefix(MAP_PREFIX)
        .and_then(|rest| rest.strip_suffix(SUFFIX))
        .filter(|inner| is_balanced(inner))
    {
        return Some((EnclosingKind::Map, inner));
    }

    input
        .strip_prefix(ARRAY_PREFIX)
        .and_then(|rest| rest.strip_suffix(SUFFIX))
        .filter(|inner| is_balanced(inner))
        .map(|inner| (EnclosingKind::Array, inner))
}

/// A non-empty span whose square brackets pair up.
fn is_balanced(span: &str) -> bool {
    if span.is_empty() {
        return false;
    }

    let mut depth = 0usize;
    for c in span.chars() {
        match c {
            '[' => depth += 1,
            ']' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Whether the outermost wrapper of `type_name` is an array, e.g. `[string]`.
pub fn is_array_type_name(type_name: &str) -> bool {
    matches!(split_enclosing(type_name), Some((EnclosingKind::Array, _)))
}

/// Whether the outermost wrapper of `type_name` is a map, e.g. `map[string]`.
pub fn is_map_type_name(type_name: &str) -> bool {
    matches!(split_enclosing(type_name), Some((EnclosingKind::Map, _)))
}

pub fn is_enclosing_type_name(type_name: &str) -> bool {
    split_enclosing(type_name).is_some()
}

/// Strips exactly one wrapper: `map[[string]]` becomes `[string]`. A name without a wrapper is
/// returned as is.
pub fn nested_type_name(type_name: &str) -> &str {
    split_enclosing(type_name)
        .map(|(_, inner)| inner)
        .unwrap_or(type_name)
}

/// Strips every wrapper: `map[[string]]` becomes `string`.
pub fn base_type_name(type_name: &str) -> &str {
    let mut current = type_name;
    while let Some((_, inner)) = split_enclosing(current) {
        current = inner;
    }
    current
}

/// Whether the *base* type of `type_name` is primitive. Note that `map[string]` and `[[uuid]]`
/// qualify even though their values are collections.
pub fn is_primitive_type_name(type_name: &str) -> bool {
    is_primitive_kind_name(base_type_name(type_name))
}
