use serde::Deserialize;

use super::{error::ApiBuilderError, service::Service};

/// A generator option passed alongside the service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GeneratorAttribute {
    pub name: String,
    pub value: String,
}

/// The envelope API Builder sends to a code generator: the service to generate for, plus the
/// full definitions of the services it imports.
#[derive(Clone, Debug, Deserialize)]
pub struct InvocationForm {
    pub service: Service,
    #[serde(default)]
    pub attributes: Vec<GeneratorAttribute>,
    pub user_agent: Option<String>,
    #[serde(default)]
    pub imported_services: Vec<Service>,
}

impl InvocationForm {
    pub fn from_json(json: &str) -> Result<Self, ApiBuilderError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    /// The full definition of an imported service, by namespace.
    pub fn imported_service(&self, namespace: &str) -> Option<&Service> {
        self.imported_services
            .iter()
            .find(|service| service.namespace() == namespace)
    }
}
