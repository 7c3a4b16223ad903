use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiBuilderError {
    #[error(
        "{0:?} is not a valid fully qualified name. A fully qualified name may be the name of a \
         primitive type, or a package name followed by the base short name \
         (e.g. \"com.bryzek.apidoc.common.v0.models.reference\")"
    )]
    InvalidName(String),
    #[error("{name} is not a type defined in {service} service")]
    UnresolvedType { name: String, service: String },
    #[error("{kind} name {name} is {reason}")]
    InvalidNamedType {
        name: String,
        kind: &'static str,
        reason: &'static str,
    },
    #[error(
        "unions containing {name} disagree on the discriminator field ({})",
        .discriminators.join(", ")
    )]
    InconsistentDiscriminator {
        name: String,
        discriminators: Vec<String>,
    },
    #[error(
        "unions containing {name} disagree on its discriminator value ({})",
        .values.join(", ")
    )]
    InconsistentDiscriminatorValue { name: String, values: Vec<String> },
    #[error("{0} is not a valid response code")]
    InvalidResponseCode(String),
    #[error("the service definition failed to parse")]
    Json(#[from] serde_json::Error),
}
