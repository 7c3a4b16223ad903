use std::fmt;
use std::str::FromStr;

use super::{
    ast::{self, TypeName},
    builtins::PrimitiveKind,
    error::ApiBuilderError,
};

/// A type name that is either primitive or carries a package, possibly wrapped in arrays and
/// maps, e.g. `string`, `[string]` or `map[com.bryzek.apidoc.common.v0.models.reference]`.
///
/// All properties are derived from the name it was created from, which is never modified.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    raw: String,
}

impl QualifiedName {
    /// Fails with [`ApiBuilderError::InvalidName`] unless `name` is primitive or its base type
    /// name contains a package.
    pub fn new(name: impl Into<String>) -> Result<Self, ApiBuilderError> {
        let raw = name.into();
        if ast::is_primitive_type_name(&raw) || ast::base_type_name(&raw).contains('.') {
            Ok(Self { raw })
        } else {
            Err(ApiBuilderError::InvalidName(raw))
        }
    }

    /// The qualified name of a model, enum or union called `name` declared in `namespace`.
    /// `segment` is the kind's package segment (`models`, `enums` or `unions`), and `kind` the
    /// singular used in error messages.
    pub(crate) fn declared(
        namespace: &str,
        segment: &str,
        name: &str,
        kind: &'static str,
    ) -> Result<Self, ApiBuilderError> {
        let qualified = Self::new(format!("{namespace}.{segment}.{name}"))?;

        let reason = if qualified.is_enclosing_type() || ast::is_enclosing_type_name(name) {
            Some("an enclosing type")
        } else if ast::is_primitive_type_name(name) {
            Some("a primitive type")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ApiBuilderError::InvalidNamedType {
                name: name.to_string(),
                kind,
                reason,
            }),
            None => Ok(qualified),
        }
    }

    /// The name exactly as given, wrappers and package included.
    pub fn full_name(&self) -> &str {
        &self.raw
    }

    pub fn base_type_name(&self) -> &str {
        ast::base_type_name(&self.raw)
    }

    /// The name with exactly one wrapper removed. Only arrays and maps enclose another type.
    pub fn nested_type_name(&self) -> &str {
        ast::nested_type_name(&self.raw)
    }

    /// The base type name without its package.
    pub fn short_name(&self) -> &str {
        let base = self.base_type_name();
        match base.rsplit_once('.') {
            Some((_, short)) => short,
            None => base,
        }
    }

    /// The package of the base type, empty for primitive types.
    pub fn package_name(&self) -> &str {
        if self.is_primitive_type() {
            return "";
        }
        self.base_type_name()
            .rsplit_once('.')
            .map(|(package, _)| package)
            .unwrap_or("")
    }

    pub fn is_array_type(&self) -> bool {
        ast::is_array_type_name(&self.raw)
    }

    pub fn is_map_type(&self) -> bool {
        ast::is_map_type_name(&self.raw)
    }

    pub fn is_enclosing_type(&self) -> bool {
        self.is_array_type() || self.is_map_type()
    }

    /// Whether the *base* type is primitive; `[string]` counts.
    pub fn is_primitive_type(&self) -> bool {
        ast::is_primitive_type_name(&self.raw)
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        PrimitiveKind::from_name(self.base_type_name())
    }

    pub fn type_name(&self) -> TypeName {
        TypeName::parse(&self.raw)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for QualifiedName {
    type Err = ApiBuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = ApiBuilderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for QualifiedName {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "com.bryzek.apidoc.common.v0.models.reference";

    fn wrapped(base: &str) -> [String; 3] {
        [base.to_string(), format!("[{base}]"), format!("map[{base}]")]
    }

    #[test]
    fn primitive_names_have_no_package() {
        for kind in PrimitiveKind::ALL {
            for name in wrapped(kind.name()) {
                let qualified = QualifiedName::new(name.as_str()).unwrap();
                assert_eq!(qualified.base_type_name(), kind.name());
                assert_eq!(qualified.short_name(), kind.name());
                assert_eq!(qualified.package_name(), "");
                assert!(qualified.is_primitive_type());
                assert_eq!(qualified.primitive_kind(), Some(kind));
            }
        }
    }

    #[test]
    fn custom_names_split_package_and_short_name() {
        for name in wrapped(BASE) {
            let qualified: QualifiedName = name.parse().unwrap();
            assert_eq!(qualified.base_type_name(), BASE);
            assert_eq!(qualified.short_name(), "reference");
            assert_eq!(qualified.package_name(), "com.bryzek.apidoc.common.v0.models");
            assert!(!qualified.is_primitive_type());
            assert_eq!(qualified.primitive_kind(), None);
        }
    }

    #[test]
    fn bare_custom_name_is_rejected() {
        let err = QualifiedName::new("widget").unwrap_err();
        assert!(matches!(err, ApiBuilderError::InvalidName(ref name) if name == "widget"));
        assert!(QualifiedName::new("[widget]").is_err());

        let qualified = QualifiedName::new("org.pkg.models.widget").unwrap();
        assert_eq!(qualified.short_name(), "widget");
        assert_eq!(qualified.package_name(), "org.pkg.models");
    }

    #[test]
    fn nested_type_names() {
        let cases = [
            ("map[string]", "string"),
            ("[string]", "string"),
            ("map[[string]]", "[string]"),
            ("[io.flow.v0.models.experience]", "io.flow.v0.models.experience"),
            ("map[io.flow.v0.models.experience]", "io.flow.v0.models.experience"),
            ("string", "string"),
            ("io.flow.v0.models.experience", "io.flow.v0.models.experience"),
        ];
        for (name, nested) in cases {
            assert_eq!(QualifiedName::new(name).unwrap().nested_type_name(), nested);
        }
    }

    #[test]
    fn enclosing_classification_uses_outer_wrapper() {
        let array = QualifiedName::new(format!("[{BASE}]")).unwrap();
        assert!(array.is_array_type());
        assert!(!array.is_map_type());
        assert!(array.is_enclosing_type());

        let map = QualifiedName::new("map[[string]]").unwrap();
        assert!(map.is_map_type());
        assert!(!map.is_array_type());
        assert!(map.is_enclosing_type());

        let plain = QualifiedName::new(BASE).unwrap();
        assert!(!plain.is_enclosing_type());
    }

    #[test]
    fn display_keeps_raw_name() {
        let qualified = QualifiedName::new("map[[string]]").unwrap();
        assert_eq!(qualified.to_string(), "map[[string]]");
        assert_eq!(qualified.type_name().to_string(), "map[[string]]");
    }

    #[test]
    fn declared_names_follow_kind_segment() {
        let model = QualifiedName::declared("com.example.v0", "models", "user", "model").unwrap();
        assert_eq!(model.full_name(), "com.example.v0.models.user");
        assert_eq!(model.short_name(), "user");

        let err = QualifiedName::declared("[com", "models", "user]", "model").unwrap_err();
        assert!(matches!(err, ApiBuilderError::InvalidNamedType { kind: "model", .. }));

        let err = QualifiedName::declared("com.example.v0", "enums", "[user]", "enum").unwrap_err();
        assert_eq!(
            err.to_string(),
            "enum name [user] is an enclosing type"
        );

        let err = QualifiedName::declared("com.example.v0", "unions", "uuid", "union").unwrap_err();
        assert!(matches!(
            err,
            ApiBuilderError::InvalidNamedType { reason: "a primitive type", .. }
        ));
    }
}
