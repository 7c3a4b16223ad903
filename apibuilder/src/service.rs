use std::fmt;

use serde::Deserialize;
use tracing::debug;

use super::{
    ast::TypeName,
    enumeration::{Enum, EnumDefinition},
    error::ApiBuilderError,
    import::Import,
    model::{Model, ModelDefinition},
    resource::{Header, Resource},
    shared::{Annotation, Apidoc, Application, Attribute, Info, Organization},
    symbols::SymbolTable,
    types::{resolve_type, NamedType, Type, TypeLookup},
    union::{Union, UnionDefinition},
};

/// A service definition as serialized by API Builder.
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceDefinition {
    pub apidoc: Apidoc,
    pub name: String,
    pub organization: Organization,
    pub application: Application,
    pub namespace: String,
    pub version: String,
    pub base_url: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub enums: Vec<EnumDefinition>,
    #[serde(default)]
    pub unions: Vec<UnionDefinition>,
    #[serde(default)]
    pub models: Vec<ModelDefinition>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// A service and everything it declares, with the types it imports from other services.
///
/// Named types are looked up in the service itself first, by fully qualified name and then by
/// short name, and then in each import in the order the imports are declared. The first match
/// wins.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "ServiceDefinition")]
pub struct Service {
    apidoc: Apidoc,
    name: String,
    organization: Organization,
    application: Application,
    namespace: String,
    version: String,
    base_url: Option<String>,
    description: Option<String>,
    info: Info,
    headers: Vec<Header>,
    imports: Vec<Import>,
    enums: Vec<Enum>,
    models: Vec<Model>,
    unions: Vec<Union>,
    resources: Vec<Resource>,
    attributes: Vec<Attribute>,
    annotations: Vec<Annotation>,
    symbols: SymbolTable,
}

impl TryFrom<ServiceDefinition> for Service {
    type Error = ApiBuilderError;

    fn try_from(definition: ServiceDefinition) -> Result<Self, Self::Error> {
        let namespace = definition.namespace;
        let enums = definition
            .enums
            .into_iter()
            .map(|enumeration| Enum::new(enumeration, &namespace))
            .collect::<Result<Vec<_>, _>>()?;
        let models = definition
            .models
            .into_iter()
            .map(|model| Model::new(model, &namespace))
            .collect::<Result<Vec<_>, _>>()?;
        let unions = definition
            .unions
            .into_iter()
            .map(|union| Union::new(union, &namespace))
            .collect::<Result<Vec<_>, _>>()?;

        let scope = format!("{}@{}", definition.application.key, definition.version);
        let symbols = SymbolTable::for_service(&scope, &models, &enums, &unions);
        debug!(
            service = %scope,
            %namespace,
            models = models.len(),
            enums = enums.len(),
            unions = unions.len(),
            imports = definition.imports.len(),
            "loaded service"
        );

        Ok(Self {
            apidoc: definition.apidoc,
            name: definition.name,
            organization: definition.organization,
            application: definition.application,
            namespace,
            version: definition.version,
            base_url: definition.base_url,
            description: definition.description,
            info: definition.info,
            headers: definition.headers,
            imports: definition.imports,
            enums,
            models,
            unions,
            resources: definition.resources,
            attributes: definition.attributes,
            annotations: definition.annotations,
            symbols,
        })
    }
}

impl Service {
    pub fn from_json(json: &str) -> Result<Self, ApiBuilderError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ApiBuilderError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn apidoc_version(&self) -> &str {
        &self.apidoc.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn organization_key(&self) -> &str {
        &self.organization.key
    }

    pub fn application_key(&self) -> &str {
        &self.application.key
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Enums declared by this service.
    pub fn internal_enums(&self) -> &[Enum] {
        &self.enums
    }

    pub fn internal_models(&self) -> &[Model] {
        &self.models
    }

    pub fn internal_unions(&self) -> &[Union] {
        &self.unions
    }

    /// Enums exposed by the imports, in import order.
    pub fn external_enums(&self) -> impl Iterator<Item = &Enum> + '_ {
        self.imports.iter().flat_map(Import::enums)
    }

    pub fn external_models(&self) -> impl Iterator<Item = &Model> + '_ {
        self.imports.iter().flat_map(Import::models)
    }

    pub fn external_unions(&self) -> impl Iterator<Item = &Union> + '_ {
        self.imports.iter().flat_map(Import::unions)
    }

    /// Internal enums followed by external ones.
    pub fn enums(&self) -> impl Iterator<Item = &Enum> + '_ {
        self.enums.iter().chain(self.external_enums())
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> + '_ {
        self.models.iter().chain(self.external_models())
    }

    pub fn unions(&self) -> impl Iterator<Item = &Union> + '_ {
        self.unions.iter().chain(self.external_unions())
    }

    /// Parses and resolves `type_name` against this service.
    pub fn resolve(&self, type_name: &str) -> Result<Type<'_>, ApiBuilderError> {
        resolve_type(&TypeName::parse(type_name), self)
    }
}

impl TypeLookup for Service {
    fn declared_models(&self) -> &[Model] {
        &self.models
    }

    fn declared_enums(&self) -> &[Enum] {
        &self.enums
    }

    fn declared_unions(&self) -> &[Union] {
        &self.unions
    }

    fn find_type_by_name(&self, name: &str) -> Option<NamedType<'_>> {
        if let Some(found) = self
            .symbols
            .lookup(name)
            .and_then(|symbol| symbol.get(&self.models, &self.enums, &self.unions))
        {
            debug!(name, service = %self, full_name = found.full_name(), "resolved internal type");
            return Some(found);
        }

        let found = self.imports.iter().find_map(|import| {
            let found = import.find_type_by_name(name)?;
            debug!(name, service = %self, %import, full_name = found.full_name(), "resolved imported type");
            Some(found)
        });
        if found.is_none() {
            debug!(name, service = %self, "type not found");
        }
        found
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.application.key, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{types::TypeKind, Declared};
    use serde_json::json;

    fn service() -> Service {
        Service::from_value(json!({
            "apidoc": { "version": "0.11.76" },
            "name": "Inventory",
            "organization": { "key": "acme" },
            "application": { "key": "inventory" },
            "namespace": "com.acme.inventory.v0",
            "version": "1.2.0",
            "base_url": "https://inventory.acme.com",
            "imports": [
                {
                    "uri": "https://app.apibuilder.io/acme/common/1.0.0/service.json",
                    "namespace": "com.acme.common.v0",
                    "organization": { "key": "acme" },
                    "application": { "key": "common" },
                    "version": "1.0.0",
                    "models": ["item", "money"],
                    "enums": ["currency"]
                }
            ],
            "enums": [{ "name": "warehouse_status", "values": [{ "name": "open" }] }],
            "models": [{
                "name": "item",
                "fields": [{ "name": "price", "type": "money", "required": true }]
            }],
            "unions": [{ "name": "stock_event", "types": [{ "type": "item" }] }],
            "resources": [{
                "type": "item",
                "plural": "items",
                "operations": [{
                    "method": "GET",
                    "path": "/items",
                    "responses": [{ "code": { "integer": { "value": 200 } }, "type": "[item]" }]
                }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn identifies_itself() {
        let service = service();
        assert_eq!(service.to_string(), "inventory@1.2.0");
        assert_eq!(service.name(), "Inventory");
        assert_eq!(service.apidoc_version(), "0.11.76");
        assert_eq!(service.organization_key(), "acme");
        assert_eq!(service.info(), &Info::default());
    }

    #[test]
    fn lists_internal_then_external_types() {
        let service = service();
        let models: Vec<&str> = service.models().map(Declared::full_name).collect();
        assert_eq!(
            models,
            [
                "com.acme.inventory.v0.models.item",
                "com.acme.common.v0.models.item",
                "com.acme.common.v0.models.money",
            ]
        );
        assert_eq!(service.external_enums().count(), 1);
        assert_eq!(service.internal_unions().len(), 1);
        assert_eq!(service.unions().count(), 1);
    }

    #[test]
    fn internal_declaration_shadows_import() {
        let service = service();
        let item = service.resolve("item").unwrap();
        assert_eq!(item.to_string(), "com.acme.inventory.v0.models.item");

        let imported = service.resolve("com.acme.common.v0.models.item").unwrap();
        assert_eq!(imported.kind(), TypeKind::Model);
        assert_ne!(item, imported);
    }

    #[test]
    fn field_types_reach_into_imports() {
        let service = service();
        let price = &service.internal_models()[0].fields()[0];
        assert_eq!(
            price.resolve_type(&service).unwrap().to_string(),
            "com.acme.common.v0.models.money"
        );
        assert_eq!(
            service.resolve("map[currency]").unwrap().to_string(),
            "map[com.acme.common.v0.enums.currency]"
        );
    }

    #[test]
    fn operation_url_and_response_type() {
        let service = service();
        let operation = &service.resources()[0].operations[0];
        assert_eq!(operation.url(&service), "https://inventory.acme.com/items");
        let response = operation
            .response_type_by_code(200, false, &service)
            .unwrap()
            .unwrap();
        assert_eq!(response.to_string(), "[com.acme.inventory.v0.models.item]");
        assert!(operation
            .response_type_by_code(500, true, &service)
            .unwrap()
            .is_none());
    }

    #[test]
    fn imported_enum_wins_a_short_name_collision() {
        let service = Service::from_value(json!({
            "apidoc": { "version": "0.11.76" },
            "name": "Generator",
            "organization": { "key": "acme" },
            "application": { "key": "generator" },
            "namespace": "com.acme.generator.v0",
            "version": "0.1.0",
            "imports": [{
                "uri": "https://app.apibuilder.io/bryzek/apidoc-spec/0.9.6/service.json",
                "namespace": "com.bryzek.apidoc.spec.v0",
                "organization": { "key": "bryzek" },
                "application": { "key": "apidoc-spec" },
                "version": "0.9.6",
                "models": ["method"],
                "enums": ["method"]
            }],
            "models": [{ "name": "route", "fields": [{ "name": "method", "type": "method" }] }]
        }))
        .unwrap();

        let method = service.resolve("method").unwrap();
        assert_eq!(method.kind(), TypeKind::Enum);
        assert_eq!(method.to_string(), "com.bryzek.apidoc.spec.v0.enums.method");
        assert_eq!(
            service
                .resolve("com.bryzek.apidoc.spec.v0.models.method")
                .unwrap()
                .kind(),
            TypeKind::Model
        );
    }

    #[test]
    fn unresolved_names_the_service() {
        let service = service();
        let err = service.resolve("[widget]").unwrap_err();
        assert_eq!(
            err.to_string(),
            "widget is not a type defined in inventory@1.2.0 service"
        );
    }

    #[test]
    fn shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Service>();
        assert_send_sync::<Type<'static>>();
    }

    #[test]
    fn invalid_declaration_is_rejected() {
        let err = Service::from_value(json!({
            "apidoc": { "version": "0.11.76" },
            "name": "Broken",
            "organization": { "key": "acme" },
            "application": { "key": "broken" },
            "namespace": "com.acme.broken.v0",
            "version": "0.0.1",
            "models": [{ "name": "string" }]
        }))
        .unwrap_err();
        assert!(matches!(err, ApiBuilderError::Json(_)));
    }
}
