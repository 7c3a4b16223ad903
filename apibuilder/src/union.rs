use serde::Deserialize;
use tracing::debug;

use super::{
    ast::TypeName,
    error::ApiBuilderError,
    naming::{pascal_case, pluralize},
    qualified_name::QualifiedName,
    service::Service,
    shared::{impl_deprecated, Attribute, Deprecation},
    types::{resolve_type, Declared, Type, TypeLookup},
};

/// The definition of a union as it appears in a service.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct UnionDefinition {
    pub name: String,
    #[serde(default)]
    pub plural: String,
    pub discriminator: Option<String>,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    #[serde(default)]
    pub types: Vec<UnionType>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

/// One member of a union.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UnionType {
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
    /// Whether this member is assumed when the discriminator is absent.
    pub default: Option<bool>,
    pub discriminator_value: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl UnionType {
    pub fn type_name(&self) -> TypeName {
        TypeName::parse(&self.type_name)
    }

    pub fn resolve_type<'a, L>(&self, document: &'a L) -> Result<Type<'a>, ApiBuilderError>
    where
        L: TypeLookup + ?Sized,
    {
        resolve_type(&self.type_name(), document)
    }

    /// The discriminator value identifying this member; defaults to the type name.
    pub fn discriminator_value(&self) -> &str {
        self.discriminator_value
            .as_deref()
            .unwrap_or(&self.type_name)
    }

    pub fn is_default(&self) -> bool {
        self.default.unwrap_or(false)
    }
}

impl_deprecated!(UnionType => deprecation);

/// A union declared in a service, or a stub for one declared in an import.
#[derive(Clone, Debug, PartialEq)]
pub struct Union {
    qualified_name: QualifiedName,
    definition: UnionDefinition,
}

impl Union {
    pub const SEGMENT: &'static str = "unions";

    /// Field carrying the discriminator value when a union does not name one.
    pub const DEFAULT_DISCRIMINATOR: &'static str = "discriminator";

    pub fn new(mut definition: UnionDefinition, namespace: &str) -> Result<Self, ApiBuilderError> {
        let qualified_name =
            QualifiedName::declared(namespace, Self::SEGMENT, &definition.name, Self::DISPLAY_NAME)?;
        if definition.plural.is_empty() {
            definition.plural = pluralize(&definition.name);
        }
        Ok(Self {
            qualified_name,
            definition,
        })
    }

    pub(crate) fn stub(name: &str, namespace: &str) -> Result<Self, ApiBuilderError> {
        Self::new(
            UnionDefinition {
                name: name.to_string(),
                ..Default::default()
            },
            namespace,
        )
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn nickname(&self) -> String {
        pascal_case(&self.definition.name)
    }

    pub fn plural(&self) -> &str {
        &self.definition.plural
    }

    pub fn discriminator(&self) -> &str {
        self.definition
            .discriminator
            .as_deref()
            .unwrap_or(Self::DEFAULT_DISCRIMINATOR)
    }

    pub fn description(&self) -> Option<&str> {
        self.definition.description.as_deref()
    }

    pub fn types(&self) -> &[UnionType] {
        &self.definition.types
    }

    /// The member assumed when a payload carries no discriminator.
    pub fn default_type(&self) -> Option<&UnionType> {
        self.definition.types.iter().find(|member| member.is_default())
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.definition.attributes
    }

    pub fn interfaces(&self) -> &[String] {
        &self.definition.interfaces
    }
}

impl Declared for Union {
    const DISPLAY_NAME: &'static str = "union";

    fn qualified_name(&self) -> &QualifiedName {
        &self.qualified_name
    }
}

impl_deprecated!(Union => definition.deprecation);

/// The unions of `service` with a member resolving to `target`, each with those members.
fn memberships<'a>(
    service: &'a Service,
    target: &Type<'_>,
) -> Result<Vec<(&'a Union, Vec<&'a UnionType>)>, ApiBuilderError> {
    let mut found = Vec::new();
    for union in service.internal_unions() {
        let mut members = Vec::new();
        for member in union.types() {
            if member.resolve_type(service)? == *target {
                members.push(member);
            }
        }
        if !members.is_empty() {
            found.push((union, members));
        }
    }
    debug!(service = %service, %target, unions = found.len(), "collected union memberships");
    Ok(found)
}

fn distinct<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut distinct = Vec::new();
    for value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    distinct
}

pub(crate) fn containing_unions<'a>(
    service: &'a Service,
    target: &Type<'_>,
) -> Result<Vec<&'a Union>, ApiBuilderError> {
    Ok(memberships(service, target)?
        .into_iter()
        .map(|(union, _)| union)
        .collect())
}

/// The discriminator field shared by every union containing `target`.
pub(crate) fn shared_discriminator<'a>(
    service: &'a Service,
    target: &Type<'_>,
) -> Result<Option<&'a str>, ApiBuilderError> {
    let memberships = memberships(service, target)?;
    let discriminators = distinct(memberships.iter().map(|&(union, _)| union.discriminator()));
    match discriminators.as_slice() {
        [] => Ok(None),
        [discriminator] => Ok(Some(*discriminator)),
        _ => Err(ApiBuilderError::InconsistentDiscriminator {
            name: target.to_string(),
            discriminators: discriminators.iter().map(|d| d.to_string()).collect(),
        }),
    }
}

/// The discriminator value `target` carries in every union containing it.
pub(crate) fn shared_discriminator_value<'a>(
    service: &'a Service,
    target: &Type<'_>,
) -> Result<Option<&'a str>, ApiBuilderError> {
    let memberships = memberships(service, target)?;
    let values = distinct(
        memberships
            .iter()
            .flat_map(|(_, members)| members.iter().copied().map(UnionType::discriminator_value)),
    );
    match values.as_slice() {
        [] => Ok(None),
        [value] => Ok(Some(*value)),
        _ => Err(ApiBuilderError::InconsistentDiscriminatorValue {
            name: target.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn members_default_discriminator_to_type() {
        let definition: UnionDefinition = serde_json::from_value(json!({
            "name": "response_code",
            "plural": "response_codes",
            "discriminator": "type",
            "types": [
                { "type": "integer", "discriminator_value": "int" },
                { "type": "response_code_option", "default": true }
            ]
        }))
        .unwrap();
        let union = Union::new(definition, "com.bryzek.apidoc.spec.v0").unwrap();

        assert_eq!(union.full_name(), "com.bryzek.apidoc.spec.v0.unions.response_code");
        assert_eq!(union.nickname(), "ResponseCode");
        assert_eq!(union.discriminator(), "type");
        assert_eq!(
            Union::stub("event", "io.example.v0").unwrap().discriminator(),
            "discriminator"
        );

        let values: Vec<&str> = union
            .types()
            .iter()
            .map(UnionType::discriminator_value)
            .collect();
        assert_eq!(values, ["int", "response_code_option"]);
        assert_eq!(
            union.default_type().map(|member| member.type_name.as_str()),
            Some("response_code_option")
        );
    }

    fn payments() -> Service {
        Service::from_value(json!({
            "apidoc": { "version": "0.11.76" },
            "name": "Payments",
            "organization": { "key": "acme" },
            "application": { "key": "payments" },
            "namespace": "com.acme.payments.v0",
            "version": "1.0.0",
            "enums": [{ "name": "card_type", "values": [{ "name": "visa" }] }],
            "models": [
                { "name": "card" },
                { "name": "bank_account" },
                { "name": "voucher" },
                { "name": "customer" }
            ],
            "unions": [
                {
                    "name": "payment_method",
                    "discriminator": "kind",
                    "types": [
                        { "type": "card", "discriminator_value": "credit_card" },
                        { "type": "bank_account" }
                    ]
                },
                {
                    "name": "stored_method",
                    "discriminator": "kind",
                    "types": [
                        { "type": "card", "discriminator_value": "credit_card" },
                        { "type": "card_type" }
                    ]
                },
                {
                    "name": "legacy_method",
                    "types": [
                        { "type": "voucher" },
                        { "type": "bank_account", "discriminator_value": "ach" }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    fn model<'a>(service: &'a Service, name: &str) -> &'a crate::model::Model {
        service
            .internal_models()
            .iter()
            .find(|model| model.name() == name)
            .unwrap()
    }

    #[test]
    fn model_agrees_across_its_unions() {
        let service = payments();
        let card = model(&service, "card");
        let unions: Vec<&str> = card
            .unions(&service)
            .unwrap()
            .into_iter()
            .map(Union::name)
            .collect();
        assert_eq!(unions, ["payment_method", "stored_method"]);
        assert_eq!(card.discriminator(&service).unwrap(), Some("kind"));
        assert_eq!(card.discriminator_value(&service).unwrap(), Some("credit_card"));
    }

    #[test]
    fn enum_members_default_to_their_type_name() {
        let service = payments();
        let card_type = &service.internal_enums()[0];
        assert_eq!(card_type.unions(&service).unwrap().len(), 1);
        assert_eq!(card_type.discriminator(&service).unwrap(), Some("kind"));
        assert_eq!(card_type.discriminator_value(&service).unwrap(), Some("card_type"));
    }

    #[test]
    fn unnamed_discriminator_falls_back() {
        let service = payments();
        let voucher = model(&service, "voucher");
        assert_eq!(voucher.discriminator(&service).unwrap(), Some("discriminator"));
        assert_eq!(voucher.discriminator_value(&service).unwrap(), Some("voucher"));
    }

    #[test]
    fn types_outside_unions_have_no_discriminator() {
        let service = payments();
        let customer = model(&service, "customer");
        assert!(customer.unions(&service).unwrap().is_empty());
        assert_eq!(customer.discriminator(&service).unwrap(), None);
        assert_eq!(customer.discriminator_value(&service).unwrap(), None);
    }

    #[test]
    fn disagreeing_unions_are_errors() {
        let service = payments();
        let bank_account = model(&service, "bank_account");
        assert_eq!(bank_account.unions(&service).unwrap().len(), 2);

        let err = bank_account.discriminator(&service).unwrap_err();
        assert!(matches!(err, ApiBuilderError::InconsistentDiscriminator { .. }));
        assert_eq!(
            err.to_string(),
            "unions containing com.acme.payments.v0.models.bank_account disagree on the \
             discriminator field (kind, discriminator)"
        );

        match bank_account.discriminator_value(&service).unwrap_err() {
            ApiBuilderError::InconsistentDiscriminatorValue { name, values } => {
                assert_eq!(name, "com.acme.payments.v0.models.bank_account");
                assert_eq!(values, ["bank_account", "ach"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unresolved_member_fails_the_lookup() {
        let service = Service::from_value(json!({
            "apidoc": { "version": "0.11.76" },
            "name": "Broken",
            "organization": { "key": "acme" },
            "application": { "key": "broken" },
            "namespace": "com.acme.broken.v0",
            "version": "0.0.1",
            "models": [{ "name": "user" }],
            "unions": [{ "name": "party", "types": [{ "type": "user" }, { "type": "group" }] }]
        }))
        .unwrap();
        let user = &service.internal_models()[0];
        assert!(matches!(
            user.unions(&service),
            Err(ApiBuilderError::UnresolvedType { .. })
        ));
    }
}
