use serde::Deserialize;

use super::{
    ast::TypeName,
    error::ApiBuilderError,
    naming::{pascal_case, pluralize},
    qualified_name::QualifiedName,
    service::Service,
    shared::{impl_deprecated, Attribute, Deprecation},
    types::{resolve_type, Declared, Type, TypeLookup},
    union::{containing_unions, shared_discriminator, shared_discriminator_value, Union},
};

/// The definition of a model as it appears in a service.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ModelDefinition {
    pub name: String,
    #[serde(default)]
    pub plural: String,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    pub default: Option<String>,
    #[serde(default = "required_by_default")]
    pub required: bool,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub example: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub annotations: Vec<String>,
}

fn required_by_default() -> bool {
    true
}

impl Field {
    pub fn type_name(&self) -> TypeName {
        TypeName::parse(&self.type_name)
    }

    /// Resolves the field's type against the service that declares it.
    pub fn resolve_type<'a, L>(&self, document: &'a L) -> Result<Type<'a>, ApiBuilderError>
    where
        L: TypeLookup + ?Sized,
    {
        resolve_type(&self.type_name(), document)
    }
}

impl_deprecated!(Field => deprecation);

/// A model declared in a service, or a stub for one declared in an import.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    qualified_name: QualifiedName,
    definition: ModelDefinition,
}

impl Model {
    pub const SEGMENT: &'static str = "models";

    /// Binds `definition` to `namespace`, giving it the name `<namespace>.models.<name>`.
    pub fn new(mut definition: ModelDefinition, namespace: &str) -> Result<Self, ApiBuilderError> {
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

    pub(crate) fn stub(name: &str, namespace: &str) -> Result<Self, ApiBuilderError> {
        Self::new(
            ModelDefinition {
                name: name.to_string(),
                ..Default::default()
            },
            namespace,
        )
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn nickname(&self) -> String {
        pascal_case(&self.definition.name)
    }

    pub fn plural(&self) -> &str {
        &self.definition.plural
    }

    pub fn description(&self) -> Option<&str> {
        self.definition.description.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.definition.fields
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.definition.fields.iter().find(|field| field.name == name)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.definition.attributes
    }

    pub fn interfaces(&self) -> &[String] {
        &self.definition.interfaces
    }

    /// The unions of `service` that list this model among their types.
    pub fn unions<'a>(&self, service: &'a Service) -> Result<Vec<&'a Union>, ApiBuilderError> {
        containing_unions(service, &Type::Model(self))
    }

    /// The discriminator field of the unions containing this model, or `None` outside any union.
    /// Fails when those unions name different fields.
    pub fn discriminator<'a>(
        &self,
        service: &'a Service,
    ) -> Result<Option<&'a str>, ApiBuilderError> {
        shared_discriminator(service, &Type::Model(self))
    }

    /// The value identifying this model in the unions containing it.
    pub fn discriminator_value<'a>(
        &self,
        service: &'a Service,
    ) -> Result<Option<&'a str>, ApiBuilderError> {
        shared_discriminator_value(service, &Type::Model(self))
    }
}

impl Declared for Model {
    const DISPLAY_NAME: &'static str = "model";

    fn qualified_name(&self) -> &QualifiedName {
        &self.qualified_name
    }
}

impl_deprecated!(Model => definition.deprecation);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Deprecated;
    use serde_json::json;

    fn healthcheck() -> Model {
        let definition: ModelDefinition = serde_json::from_value(json!({
            "name": "healthcheck",
            "plural": "healthchecks",
            "description": "Service status",
            "deprecation": { "description": "use /_internal_/ping" },
            "fields": [
                { "name": "status", "type": "string", "required": true, "example": "healthy" },
                {
                    "name": "checks",
                    "type": "map[[string]]",
                    "required": false,
                    "minimum": 0,
                    "attributes": [{ "name": "hint", "value": {} }]
                }
            ]
        }))
        .unwrap();
        Model::new(definition, "io.flow.healthcheck.v0").unwrap()
    }

    #[test]
    fn exposes_definition() {
        let model = healthcheck();
        assert_eq!(model.name(), "healthcheck");
        assert_eq!(model.nickname(), "Healthcheck");
        assert_eq!(model.full_name(), "io.flow.healthcheck.v0.models.healthcheck");
        assert_eq!(model.description(), Some("Service status"));
        assert!(model.is_deprecated());
        assert_eq!(model.deprecation_reason(), Some("use /_internal_/ping"));
    }

    #[test]
    fn fields_keep_raw_type_names() {
        let model = healthcheck();
        let checks = model.field_by_name("checks").unwrap();
        assert!(!checks.required);
        assert_eq!(checks.minimum, Some(0));
        assert_eq!(checks.attributes.len(), 1);
        assert_eq!(checks.type_name().to_string(), "map[[string]]");
        assert_eq!(
            model.field_by_name("status").unwrap().example.as_deref(),
            Some("healthy")
        );
    }

    #[test]
    fn missing_plural_is_derived() {
        let model = Model::stub("address", "io.flow.v0").unwrap();
        assert_eq!(model.plural(), "addresses");
        assert!(model.fields().is_empty());
    }
}
