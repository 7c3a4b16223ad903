use std::fmt;

use serde::Deserialize;

use super::{
    ast::TypeName,
    error::ApiBuilderError,
    naming::pascal_case,
    service::Service,
    shared::{impl_deprecated, Attribute, Deprecation},
    types::{resolve_type, Type, TypeLookup},
};

fn required_by_default() -> bool {
    true
}

/// A header a service expects on every request.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Header {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    #[serde(default = "required_by_default")]
    pub required: bool,
    pub default: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Header {
    pub fn resolve_type<'a, L>(&self, document: &'a L) -> Result<Type<'a>, ApiBuilderError>
    where
        L: TypeLookup + ?Sized,
    {
        resolve_type(&TypeName::parse(&self.type_name), document)
    }
}

impl_deprecated!(Header => deprecation);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum ParameterLocation {
    Path,
    Query,
    Form,
    Header,
}

impl ParameterLocation {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Path => "Path",
            Self::Query => "Query",
            Self::Form => "Form",
            Self::Header => "Header",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub location: ParameterLocation,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    #[serde(default = "required_by_default")]
    pub required: bool,
    pub default: Option<String>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub example: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Parameter {
    pub fn resolve_type<'a, L>(&self, document: &'a L) -> Result<Type<'a>, ApiBuilderError>
    where
        L: TypeLookup + ?Sized,
    {
        resolve_type(&TypeName::parse(&self.type_name), document)
    }
}

impl_deprecated!(Parameter => deprecation);

/// The request body of an operation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Body {
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Body {
    pub fn resolve_type<'a, L>(&self, document: &'a L) -> Result<Type<'a>, ApiBuilderError>
    where
        L: TypeLookup + ?Sized,
    {
        resolve_type(&TypeName::parse(&self.type_name), document)
    }
}

impl_deprecated!(Body => deprecation);

#[derive(Clone, Debug, Deserialize)]
struct IntegerCode {
    value: u16,
}

/// The JSON encodings of a response code: the union wrapped under its member's name, or the
/// discriminated form with the member named by `discriminator`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum ResponseCodeRepr {
    Integer {
        integer: IntegerCode,
    },
    Option {
        response_code_option: String,
    },
    Discriminated {
        discriminator: String,
        value: serde_json::Value,
    },
}

/// The status code a [`Response`] applies to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ResponseCodeRepr")]
pub enum ResponseCode {
    Integer(u16),
    /// A `response_code_option` value. `Default` stands for every code the operation does not
    /// list individually.
    Option(String),
}

impl ResponseCode {
    pub const DEFAULT_OPTION: &'static str = "Default";
}

impl TryFrom<ResponseCodeRepr> for ResponseCode {
    type Error = ApiBuilderError;

    fn try_from(repr: ResponseCodeRepr) -> Result<Self, Self::Error> {
        match repr {
            ResponseCodeRepr::Integer { integer } => Ok(Self::Integer(integer.value)),
            ResponseCodeRepr::Option {
                response_code_option,
            } => Ok(Self::Option(response_code_option)),
            ResponseCodeRepr::Discriminated {
                discriminator,
                value,
            } => match (discriminator.as_str(), &value) {
                ("integer", serde_json::Value::Number(number)) => number
                    .as_u64()
                    .and_then(|code| u16::try_from(code).ok())
                    .map(Self::Integer)
                    .ok_or_else(|| ApiBuilderError::InvalidResponseCode(value.to_string())),
                ("response_code_option", serde_json::Value::String(option)) => {
                    Ok(Self::Option(option.clone()))
                }
                _ => Err(ApiBuilderError::InvalidResponseCode(format!(
                    "{discriminator}: {value}"
                ))),
            },
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(code) => write!(f, "{code}"),
            Self::Option(option) => f.write_str(option),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Response {
    code: ResponseCode,
    #[serde(rename = "type")]
    type_name: Option<String>,
    #[serde(default)]
    pub headers: Vec<Header>,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Response {
    pub const DEFAULT_TYPE: &'static str = "unit";

    pub fn response_code(&self) -> &ResponseCode {
        &self.code
    }

    /// The HTTP status code, unless this response is keyed by an option.
    pub fn code(&self) -> Option<u16> {
        match self.code {
            ResponseCode::Integer(code) => Some(code),
            ResponseCode::Option(_) => None,
        }
    }

    /// Whether this response covers every code not listed individually by its operation.
    pub fn is_default(&self) -> bool {
        matches!(&self.code, ResponseCode::Option(option) if option == ResponseCode::DEFAULT_OPTION)
    }

    pub fn type_name(&self) -> &str {
        self.type_name.as_deref().unwrap_or(Self::DEFAULT_TYPE)
    }

    pub fn resolve_type<'a, L>(&self, document: &'a L) -> Result<Type<'a>, ApiBuilderError>
    where
        L: TypeLookup + ?Sized,
    {
        resolve_type(&TypeName::parse(self.type_name()), document)
    }
}

impl_deprecated!(Response => deprecation);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Connect,
    Options,
    Trace,
}

impl Method {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Operation {
    pub method: Method,
    pub path: String,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    pub body: Option<Body>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub responses: Vec<Response>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Operation {
    pub fn url(&self, service: &Service) -> String {
        format!("{}{}", service.base_url().unwrap_or_default(), self.path)
    }

    /// A method name for this operation in generated clients, e.g. `getByOrgKey` for
    /// `GET /:orgKey` or `postMoveByOrgKey` for `POST /:orgKey/move`. The resource path is
    /// left out.
    pub fn nickname(&self, resource: &Resource) -> String {
        let mut path = self.path.as_str();
        let relative;
        if let Some(prefix) = resource.path.as_deref().filter(|p| !p.is_empty()) {
            relative = path.replacen(prefix, "", 1);
            path = &relative;
        }
        let path = path.strip_prefix('/').unwrap_or(path);

        let (dynamic, fixed): (Vec<&str>, Vec<&str>) =
            path.split('/').partition(|part| part.starts_with(':'));
        let fixed = fixed.iter().enumerate().map(|(index, part)| {
            let prefix = if index == 0 { "" } else { "And" };
            format!("{prefix}{}", pascal_case(part))
        });
        let dynamic = dynamic.iter().enumerate().map(|(index, part)| {
            let prefix = if index == 0 { "By" } else { "And" };
            format!("{prefix}{}", pascal_case(part))
        });

        let mut nickname = self.method.name().to_ascii_lowercase();
        nickname.extend(fixed.chain(dynamic));
        nickname
    }

    /// Finds the response for `code`, falling back to the default response when `use_default`
    /// is set and no response lists `code` itself.
    pub fn response_by_code(&self, code: u16, use_default: bool) -> Option<&Response> {
        self.responses
            .iter()
            .find(|response| response.code() == Some(code))
            .or_else(|| {
                use_default
                    .then(|| self.responses.iter().find(|response| response.is_default()))
                    .flatten()
            })
    }

    pub fn response_type_by_code<'a, L>(
        &self,
        code: u16,
        use_default: bool,
        document: &'a L,
    ) -> Result<Option<Type<'a>>, ApiBuilderError>
    where
        L: TypeLookup + ?Sized,
    {
        self.response_by_code(code, use_default)
            .map(|response| response.resolve_type(document))
            .transpose()
    }
}

impl_deprecated!(Operation => deprecation);

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub type_name: String,
    pub plural: String,
    pub path: Option<String>,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    #[serde(default)]
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Resource {
    pub fn resolve_type<'a, L>(&self, document: &'a L) -> Result<Type<'a>, ApiBuilderError>
    where
        L: TypeLookup + ?Sized,
    {
        resolve_type(&TypeName::parse(&self.type_name), document)
    }
}

impl_deprecated!(Resource => deprecation);
