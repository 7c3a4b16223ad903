use serde::Deserialize;

use super::{
    error::ApiBuilderError,
    naming::{constant_case, pascal_case, pluralize},
    qualified_name::QualifiedName,
    service::Service,
    shared::{impl_deprecated, Attribute, Deprecation},
    types::{Declared, Type},
    union::{containing_unions, shared_discriminator, shared_discriminator_value, Union},
};

/// The definition of an enum as it appears in a service.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EnumDefinition {
    pub name: String,
    #[serde(default)]
    pub plural: String,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    #[serde(default)]
    pub values: Vec<EnumValue>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EnumValue {
    pub name: String,
    /// The serialized value, when it differs from the name.
    pub value: Option<String>,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl EnumValue {
    /// `no_remaining_balance` becomes `NO_REMAINING_BALANCE`.
    pub fn nickname(&self) -> String {
        constant_case(&self.name)
    }

    /// The value on the wire; defaults to the name.
    pub fn serialized_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.name)
    }
}

impl_deprecated!(EnumValue => deprecation);

/// An enum declared in a service, or a stub for one declared in an import.
#[derive(Clone, Debug, PartialEq)]
pub struct Enum {
    qualified_name: QualifiedName,
    definition: EnumDefinition,
}

impl Enum {
    pub const SEGMENT: &'static str = "enums";

    /// Binds `definition` to `namespace`, giving it the name `<namespace>.enums.<name>`.
    pub fn new(mut definition: EnumDefinition, namespace: &str) -> Result<Self, ApiBuilderError> {
        let qualified_name =
            QualifiedName::declared(namespace, Self::SEGMENT, &definition.name, Self::DISPLAY_NAME)?;
        if definition.plural.is_empty() {
            definition.plural = pluralize(&definition.name);
        }
        Ok(Self {
            qualified_name,
            definition,
        })
    }

    /// An enum known only by name, as listed by an import.
    pub(crate) fn stub(name: &str, namespace: &str) -> Result<Self, ApiBuilderError> {
        Self::new(
            EnumDefinition {
                name: name.to_string(),
                ..Default::default()
            },
            namespace,
        )
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// An identifier for this enum suited for generated code, e.g. `ParameterLocation`.
    pub fn nickname(&self) -> String {
        pascal_case(&self.definition.name)
    }

    pub fn plural(&self) -> &str {
        &self.definition.plural
    }

    pub fn description(&self) -> Option<&str> {
        self.definition.description.as_deref()
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.definition.values
    }

    pub fn value_by_name(&self, name: &str) -> Option<&EnumValue> {
        self.definition.values.iter().find(|value| value.name == name)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.definition.attributes
    }

    /// The unions of `service` that list this enum among their types.
    pub fn unions<'a>(&self, service: &'a Service) -> Result<Vec<&'a Union>, ApiBuilderError> {
        containing_unions(service, &Type::Enum(self))
    }

    /// The discriminator field of the unions containing this enum, or `None` outside any union.
    /// Fails when those unions name different fields.
    pub fn discriminator<'a>(
        &self,
        service: &'a Service,
    ) -> Result<Option<&'a str>, ApiBuilderError> {
        shared_discriminator(service, &Type::Enum(self))
    }

    /// The value identifying this enum in the unions containing it.
    pub fn discriminator_value<'a>(
        &self,
        service: &'a Service,
    ) -> Result<Option<&'a str>, ApiBuilderError> {
        shared_discriminator_value(service, &Type::Enum(self))
    }
}

impl Declared for Enum {
    const DISPLAY_NAME: &'static str = "enum";

    fn qualified_name(&self) -> &QualifiedName {
        &self.qualified_name
    }
}

impl_deprecated!(Enum => definition.deprecation);
