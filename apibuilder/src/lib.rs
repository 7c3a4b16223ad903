pub mod ast;
pub mod builtins;
pub mod enumeration;
pub mod error;
pub mod import;
pub mod invocation_form;
pub mod model;
pub mod naming;
pub mod qualified_name;
pub mod resource;
pub mod service;
pub mod shared;
pub mod types;
pub mod union;

mod symbols;

pub use ast::{is_primitive_type_name, EnclosingKind, TypeName};
pub use builtins::PrimitiveKind;
pub use enumeration::{Enum, EnumValue};
pub use error::ApiBuilderError;
pub use import::Import;
pub use invocation_form::InvocationForm;
pub use model::{Field, Model};
pub use qualified_name::QualifiedName;
pub use resource::{Body, Header, Method, Operation, Parameter, ParameterLocation, Resource, Response};
pub use service::Service;
pub use shared::Deprecated;
pub use types::{resolve_type, Declared, NamedType, Type, TypeKind, TypeLookup};
pub use union::{Union, UnionType};

/// Parses `type_name` and resolves it against `document`.
pub fn resolve<'a, L>(type_name: &str, document: &'a L) -> Result<Type<'a>, ApiBuilderError>
where
    L: TypeLookup + ?Sized,
{
    resolve_type(&TypeName::parse(type_name), document)
}
