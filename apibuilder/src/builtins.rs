use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The closed set of primitive kinds known to API Builder.
///
/// A type name whose [base type](crate::ast::base_type_name) is one of these never needs to be
/// looked up in a service.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    DateIso8601,
    DateTimeIso8601,
    Decimal,
    Double,
    Integer,
    Json,
    Long,
    Object,
    String,
    Unit,
    Uuid,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 12] = [
        Self::Boolean,
        Self::DateIso8601,
        Self::DateTimeIso8601,
        Self::Decimal,
        Self::Double,
        Self::Integer,
        Self::Json,
        Self::Long,
        Self::Object,
        Self::String,
        Self::Unit,
        Self::Uuid,
    ];

    /// The name of this kind as it is spelled in a service definition.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::DateIso8601 => "date-iso8601",
            Self::DateTimeIso8601 => "date-time-iso8601",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Integer => "integer",
            Self::Json => "json",
            Self::Long => "long",
            Self::Object => "object",
            Self::String => "string",
            Self::Unit => "unit",
            Self::Uuid => "uuid",
        }
    }

    /// Looks up the kind with exactly this name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
#[error("{0:?} is not a primitive type")]
pub struct UnknownPrimitiveKind(pub String);

impl FromStr for PrimitiveKind {
    type Err = UnknownPrimitiveKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownPrimitiveKind(s.to_string()))
    }
}

/// Whether `name` is exactly the name of a primitive kind (no wrappers allowed).
pub fn is_primitive_kind_name(name: &str) -> bool {
    PrimitiveKind::from_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(kind.name().parse::<PrimitiveKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(PrimitiveKind::from_name("String"), None);
        assert_eq!(PrimitiveKind::from_name("string"), Some(PrimitiveKind::String));
    }

    #[test]
    fn dated_kinds_use_dashes() {
        assert!(is_primitive_kind_name("date-iso8601"));
        assert!(is_primitive_kind_name("date-time-iso8601"));
        assert!(!is_primitive_kind_name("date_time_iso8601"));
    }

    #[test]
    fn wrapped_names_are_not_kind_names() {
        assert!(!is_primitive_kind_name("[string]"));
        assert_eq!(
            "map[string]".parse::<PrimitiveKind>(),
            Err(UnknownPrimitiveKind("map[string]".into()))
        );
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = "uuidv4".parse::<PrimitiveKind>().unwrap_err();
        assert_eq!(err.to_string(), "\"uuidv4\" is not a primitive type");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }
}
