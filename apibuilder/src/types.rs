use std::fmt;

use tracing::trace;

use super::{
    ast::{EnclosingKind, TypeName},
    builtins::PrimitiveKind,
    enumeration::Enum,
    error::ApiBuilderError,
    model::Model,
    qualified_name::QualifiedName,
    union::Union,
};

/// A model, enum or union: the types a service declares by name.
pub trait Declared {
    const DISPLAY_NAME: &'static str;

    fn qualified_name(&self) -> &QualifiedName;

    fn full_name(&self) -> &str {
        self.qualified_name().full_name()
    }

    fn short_name(&self) -> &str {
        self.qualified_name().short_name()
    }

    fn package_name(&self) -> &str {
        self.qualified_name().package_name()
    }
}

/// A reference to a declared type, as returned by [`TypeLookup::find_type_by_name`].
#[derive(Copy, Clone, Debug)]
pub enum NamedType<'a> {
    Model(&'a Model),
    Enum(&'a Enum),
    Union(&'a Union),
}

impl<'a> NamedType<'a> {
    pub fn qualified_name(&self) -> &'a QualifiedName {
        match *self {
            Self::Model(model) => model.qualified_name(),
            Self::Enum(enumeration) => enumeration.qualified_name(),
            Self::Union(union) => union.qualified_name(),
        }
    }

    pub fn full_name(&self) -> &'a str {
        self.qualified_name().full_name()
    }

    pub fn short_name(&self) -> &'a str {
        self.qualified_name().short_name()
    }
}

impl<'a> From<NamedType<'a>> for Type<'a> {
    fn from(named: NamedType<'a>) -> Self {
        match named {
            NamedType::Model(model) => Type::Model(model),
            NamedType::Enum(enumeration) => Type::Enum(enumeration),
            NamedType::Union(union) => Type::Union(union),
        }
    }
}

/// A schema document in which custom type names can be looked up.
///
/// The `Display` implementation identifies the document in error messages.
pub trait TypeLookup: fmt::Display {
    fn declared_models(&self) -> &[Model];
    fn declared_enums(&self) -> &[Enum];
    fn declared_unions(&self) -> &[Union];

    /// Finds the type called `name`, which may be fully qualified or a short name.
    fn find_type_by_name(&self, name: &str) -> Option<NamedType<'_>>;
}

/// The broad category of a resolved [`Type`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Array,
    Map,
    Model,
    Enum,
    Union,
}

impl TypeKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Array => "array",
            Self::Map => "map",
            Self::Model => "model",
            Self::Enum => "enum",
            Self::Union => "union",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved type. Named variants borrow the declaration from the document they were found in.
#[derive(Clone, Debug)]
pub enum Type<'a> {
    Primitive(QualifiedName),
    Array(Box<Type<'a>>),
    Map(Box<Type<'a>>),
    Model(&'a Model),
    Enum(&'a Enum),
    Union(&'a Union),
}

impl<'a> Type<'a> {
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive(_) => TypeKind::Primitive,
            Self::Array(_) => TypeKind::Array,
            Self::Map(_) => TypeKind::Map,
            Self::Model(_) => TypeKind::Model,
            Self::Enum(_) => TypeKind::Enum,
            Self::Union(_) => TypeKind::Union,
        }
    }

    pub fn is_enclosing(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Map(_))
    }

    /// The type enclosed by an array or map.
    pub fn of_type(&self) -> Option<&Type<'a>> {
        match self {
            Self::Array(inner) | Self::Map(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }

    /// The innermost type, after unwrapping every array and map.
    pub fn base_type(&self) -> &Type<'a> {
        let mut current = self;
        while let Some(inner) = current.of_type() {
            current = inner;
        }
        current
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(name) => name.primitive_kind(),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&'a Model> {
        match *self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&'a Enum> {
        match *self {
            Self::Enum(enumeration) => Some(enumeration),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&'a Union> {
        match *self {
            Self::Union(union) => Some(union),
            _ => None,
        }
    }
}

/// Named types compare by fully qualified name, so the same declaration reached through two
/// lookups is one type.
impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => a.base_type_name() == b.base_type_name(),
            (Self::Array(a), Self::Array(b)) | (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Model(a), Self::Model(b)) => a.full_name() == b.full_name(),
            (Self::Enum(a), Self::Enum(b)) => a.full_name() == b.full_name(),
            (Self::Union(a), Self::Union(b)) => a.full_name() == b.full_name(),
            _ => false,
        }
    }
}

impl Eq for Type<'_> {}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(name) => f.write_str(name.base_type_name()),
            Self::Array(inner) => write!(f, "[{inner}]"),
            Self::Map(inner) => write!(f, "map[{inner}]"),
            Self::Model(model) => f.write_str(model.full_name()),
            Self::Enum(enumeration) => f.write_str(enumeration.full_name()),
            Self::Union(union) => f.write_str(union.full_name()),
        }
    }
}

/// Resolves a parsed type name against `document`.
///
/// Primitive names never need the document. Any other leaf is looked up with
/// [`TypeLookup::find_type_by_name`]; failing that, the whole resolution fails with
/// [`ApiBuilderError::UnresolvedType`].
pub fn resolve_type<'a, L>(type_name: &TypeName, document: &'a L) -> Result<Type<'a>, ApiBuilderError>
where
    L: TypeLookup + ?Sized,
{
    match type_name {
        TypeName::Enclosing {
            kind: EnclosingKind::Map,
            inner,
        } => Ok(Type::Map(Box::new(resolve_type(inner, document)?))),
        TypeName::Enclosing {
            kind: EnclosingKind::Array,
            inner,
        } => Ok(Type::Array(Box::new(resolve_type(inner, document)?))),
        TypeName::Leaf { name } if type_name.is_primitive() => {
            trace!(%name, "resolved primitive type");
            Ok(Type::Primitive(QualifiedName::new(name.as_str())?))
        }
        TypeName::Leaf { name } => document
            .find_type_by_name(name)
            .map(Type::from)
            .ok_or_else(|| ApiBuilderError::UnresolvedType {
                name: name.clone(),
                service: document.to_string(),
            }),
    }
}
