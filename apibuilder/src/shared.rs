use serde::Deserialize;

/// Marks an element as deprecated in the API.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Deprecation {
    pub description: Option<String>,
}

/// Additional metadata attached to an element. Attributes do not define the API; they are
/// hints for the generators that understand them.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Organization {
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Application {
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Apidoc {
    pub version: String,
}

/// General metadata about a service.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Info {
    pub license: Option<License>,
    pub contact: Option<Contact>,
}

/// The primary contact for a service.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct License {
    pub name: String,
    pub url: Option<String>,
}

/// An element that may carry a [`Deprecation`].
pub trait Deprecated {
    fn deprecation(&self) -> Option<&Deprecation>;

    fn is_deprecated(&self) -> bool {
        self.deprecation().is_some()
    }

    /// The reason given for the deprecation, if any.
    fn deprecation_reason(&self) -> Option<&str> {
        self.deprecation()
            .and_then(|deprecation| deprecation.description.as_deref())
    }
}

/// Implements [`Deprecated`] for a type whose deprecation is reachable through `$($path).+`.
macro_rules! impl_deprecated {
    ($type_name:ty => $($path:ident).+) => {
        impl $crate::shared::Deprecated for $type_name {
            fn deprecation(&self) -> Option<&$crate::shared::Deprecation> {
                self.$($path).+.as_ref()
            }
        }
    };
}

pub(crate) use impl_deprecated;

impl_deprecated!(Attribute => deprecation);
impl_deprecated!(Annotation => deprecation);
