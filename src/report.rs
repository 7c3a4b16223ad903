use std::fmt;

use serde::Serialize;

use dt_apibuilder::{resolve, Declared, Service};

/// The outcome of resolving one type reference.
#[derive(Debug, Serialize)]
pub struct Resolution {
    /// Where the reference was found, e.g. `model application, field audit`.
    pub context: String,
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Resolution {
    fn new(service: &Service, context: String, type_name: &str) -> Self {
        match resolve(type_name, service) {
            Ok(resolved) => Self {
                context,
                type_name: type_name.to_string(),
                kind: Some(resolved.kind().name()),
                resolved: Some(resolved.to_string()),
                error: None,
            },
            Err(err) => Self {
                context,
                type_name: type_name.to_string(),
                resolved: None,
                kind: None,
                error: Some(err.to_string()),
            },
        }
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.resolved, &self.kind, &self.error) {
            (Some(resolved), Some(kind), _) => write!(
                f,
                "{}: {} => {resolved} ({kind})",
                self.context, self.type_name
            ),
            (_, _, Some(error)) => write!(f, "{}: {}: {error}", self.context, self.type_name),
            _ => write!(f, "{}: {}", self.context, self.type_name),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub service: String,
    pub resolutions: Vec<Resolution>,
}

impl Report {
    pub fn new(service: &Service) -> Self {
        Self {
            service: service.to_string(),
            resolutions: Vec::new(),
        }
    }

    pub fn failures(&self) -> usize {
        self.resolutions.iter().filter(|r| r.is_err()).count()
    }

    pub fn add(&mut self, service: &Service, context: impl Into<String>, type_name: &str) {
        self.resolutions
            .push(Resolution::new(service, context.into(), type_name));
    }

    /// Resolves every type reference in the service: headers, model fields, union members,
    /// resources and everything their operations refer to.
    pub fn add_all(&mut self, service: &Service) {
        for header in service.headers() {
            self.add(service, format!("header {}", header.name), &header.type_name);
        }
        for model in service.internal_models() {
            for field in model.fields() {
                self.add(
                    service,
                    format!("model {}, field {}", model.short_name(), field.name),
                    &field.type_name,
                );
            }
        }
        for union in service.internal_unions() {
            for member in union.types() {
                self.add(
                    service,
                    format!("union {}, type {}", union.short_name(), member.discriminator_value()),
                    &member.type_name,
                );
            }
        }
        for resource in service.resources() {
            self.add(
                service,
                format!("resource {}", resource.plural),
                &resource.type_name,
            );
            for operation in &resource.operations {
                let operation_context = format!("{} {}", operation.method, operation.path);
                if let Some(body) = &operation.body {
                    self.add(service, format!("{operation_context}, body"), &body.type_name);
                }
                for parameter in &operation.parameters {
                    self.add(
                        service,
                        format!("{operation_context}, parameter {}", parameter.name),
                        &parameter.type_name,
                    );
                }
                for response in &operation.responses {
                    self.add(
                        service,
                        format!(
                            "{operation_context}, response {}",
                            response.response_code()
                        ),
                        response.type_name(),
                    );
                }
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.service)?;
        for resolution in &self.resolutions {
            writeln!(f, "  {resolution}")?;
        }
        Ok(())
    }
}
