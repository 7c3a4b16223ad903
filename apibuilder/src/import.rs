use std::fmt;

use serde::Deserialize;
use tracing::debug;

use super::{
    enumeration::Enum,
    error::ApiBuilderError,
    model::Model,
    shared::{Annotation, Application, Organization},
    symbols::SymbolTable,
    types::{Declared, NamedType, TypeLookup},
    union::Union,
};

/// An import as it appears in a service: the other service's identity and the names it declares.
#[derive(Clone, Debug, Deserialize)]
pub struct ImportDefinition {
    pub uri: String,
    pub namespace: String,
    pub organization: Organization,
    pub application: Application,
    pub version: String,
    #[serde(default)]
    pub enums: Vec<String>,
    #[serde(default)]
    pub unions: Vec<String>,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// A service imported by another one.
///
/// An import only lists the names of its types, so every enum, model and union it exposes is a
/// stub: qualified under the import's namespace, with an empty body.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "ImportDefinition")]
pub struct Import {
    uri: String,
    namespace: String,
    organization: Organization,
    application: Application,
    version: String,
    enums: Vec<Enum>,
    models: Vec<Model>,
    unions: Vec<Union>,
    annotations: Vec<Annotation>,
    symbols: SymbolTable,
}

impl TryFrom<ImportDefinition> for Import {
    type Error = ApiBuilderError;

    fn try_from(definition: ImportDefinition) -> Result<Self, Self::Error> {
        let namespace = definition.namespace;
        let enums = definition
            .enums
            .iter()
            .map(|name| Enum::stub(name, &namespace))
            .collect::<Result<Vec<_>, _>>()?;
        let models = definition
            .models
            .iter()
            .map(|name| Model::stub(name, &namespace))
            .collect::<Result<Vec<_>, _>>()?;
        let unions = definition
            .unions
            .iter()
            .map(|name| Union::stub(name, &namespace))
            .collect::<Result<Vec<_>, _>>()?;

        let scope = format!("{}@{}", definition.application.key, definition.version);
        let symbols = SymbolTable::for_import(&scope, &models, &enums, &unions);
        debug!(
            import = %scope,
            %namespace,
            models = models.len(),
            enums = enums.len(),
            unions = unions.len(),
            "loaded import"
        );

        Ok(Self {
            uri: definition.uri,
            namespace,
            organization: definition.organization,
            application: definition.application,
            version: definition.version,
            enums,
            models,
            unions,
            annotations: definition.annotations,
            symbols,
        })
    }
}

impl Import {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn organization(&self) -> &str {
        &self.organization.key
    }

    pub fn application(&self) -> &str {
        &self.application.key
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn enums(&self) -> &[Enum] {
        &self.enums
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn unions(&self) -> &[Union] {
        &self.unions
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Finds an enum by fully qualified name, or failing that by short name.
    ///
    /// Unlike [`TypeLookup::find_type_by_name`], a model or union sharing the short name does
    /// not hide the enum.
    pub fn find_enum_by_name(&self, name: &str) -> Option<&Enum> {
        match self.find_type_by_name(name) {
            Some(NamedType::Enum(enumeration)) => Some(enumeration),
            _ => find_declared(&self.enums, name),
        }
    }

    /// Finds a model by fully qualified name, or failing that by short name.
    pub fn find_model_by_name(&self, name: &str) -> Option<&Model> {
        match self.find_type_by_name(name) {
            Some(NamedType::Model(model)) => Some(model),
            _ => find_declared(&self.models, name),
        }
    }

    /// Finds a union by fully qualified name, or failing that by short name.
    pub fn find_union_by_name(&self, name: &str) -> Option<&Union> {
        match self.find_type_by_name(name) {
            Some(NamedType::Union(union)) => Some(union),
            _ => find_declared(&self.unions, name),
        }
    }
}

fn find_declared<'a, D: Declared>(declared: &'a [D], name: &str) -> Option<&'a D> {
    declared
        .iter()
        .find(|d| d.full_name() == name)
        .or_else(|| declared.iter().find(|d| d.short_name() == name))
}

impl TypeLookup for Import {
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
        self.symbols
            .lookup(name)
            .and_then(|symbol| symbol.get(&self.models, &self.enums, &self.unions))
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.application.key, self.version)
    }
}
