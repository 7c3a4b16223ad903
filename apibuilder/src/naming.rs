use heck::{ToShoutySnakeCase, ToUpperCamelCase};

/// `parameter_location` becomes `ParameterLocation`.
pub fn pascal_case(name: &str) -> String {
    name.to_upper_camel_case()
}

/// `parameter_location` becomes `PARAMETER_LOCATION`.
pub fn constant_case(name: &str) -> String {
    name.to_shouty_snake_case()
}

/// English plural of a type name, used for imported types that only carry their name.
pub fn pluralize(name: &str) -> String {
    pluralizer::pluralize(name, 2, false)
}
