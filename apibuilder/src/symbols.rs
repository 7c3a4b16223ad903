use std::collections::hash_map::{Entry, HashMap};

use tracing::warn;

use super::{
    enumeration::Enum,
    model::Model,
    types::{Declared, NamedType},
    union::Union,
};

/// Index of a declaration within its owner's model, enum or union list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SymbolRef {
    Model(usize),
    Enum(usize),
    Union(usize),
}

impl SymbolRef {
    pub(crate) fn get<'a>(
        self,
        models: &'a [Model],
        enums: &'a [Enum],
        unions: &'a [Union],
    ) -> Option<NamedType<'a>> {
        match self {
            Self::Model(index) => models.get(index).map(NamedType::Model),
            Self::Enum(index) => enums.get(index).map(NamedType::Enum),
            Self::Union(index) => unions.get(index).map(NamedType::Union),
        }
    }
}

/// Name lookup for the declarations of one document.
///
/// Built once when the document is constructed and read-only afterwards. A service registers
/// models, then enums, then unions; an import registers enums first. When two declarations share
/// a name, the first one registered keeps it.
#[derive(Clone, Debug, Default)]
pub(crate) struct SymbolTable {
    full_names: HashMap<String, SymbolRef>,
    short_names: HashMap<String, SymbolRef>,
}

impl SymbolTable {
    /// Table for a service's own declarations. `scope` identifies the service in log messages.
    pub(crate) fn for_service(
        scope: &str,
        models: &[Model],
        enums: &[Enum],
        unions: &[Union],
    ) -> Self {
        let mut table = Self::default();
        table.register_models(scope, models);
        table.register_enums(scope, enums);
        table.register_unions(scope, unions);
        table
    }

    /// Table for the names an import lists: enums, then models, then unions.
    pub(crate) fn for_import(
        scope: &str,
        models: &[Model],
        enums: &[Enum],
        unions: &[Union],
    ) -> Self {
        let mut table = Self::default();
        table.register_enums(scope, enums);
        table.register_models(scope, models);
        table.register_unions(scope, unions);
        table
    }

    fn register_models(&mut self, scope: &str, models: &[Model]) {
        for (index, model) in models.iter().enumerate() {
            self.register(scope, model, SymbolRef::Model(index));
        }
    }

    fn register_enums(&mut self, scope: &str, enums: &[Enum]) {
        for (index, enumeration) in enums.iter().enumerate() {
            self.register(scope, enumeration, SymbolRef::Enum(index));
        }
    }

    fn register_unions(&mut self, scope: &str, unions: &[Union]) {
        for (index, union) in unions.iter().enumerate() {
            self.register(scope, union, SymbolRef::Union(index));
        }
    }

    fn register<D: Declared>(&mut self, scope: &str, declared: &D, symbol: SymbolRef) {
        match self.full_names.entry(declared.full_name().to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(symbol);
            }
            Entry::Occupied(_) => {
                warn!(
                    scope,
                    name = declared.full_name(),
                    kind = D::DISPLAY_NAME,
                    "duplicate declaration is unreachable"
                );
                return;
            }
        }

        match self.short_names.entry(declared.short_name().to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(symbol);
            }
            Entry::Occupied(_) => warn!(
                scope,
                name = declared.full_name(),
                kind = D::DISPLAY_NAME,
                "short name is already taken; this type can only be referenced by its full name"
            ),
        }
    }

    /// Matches `name` against fully qualified names first, then against short names.
    pub(crate) fn lookup(&self, name: &str) -> Option<SymbolRef> {
        self.full_names
            .get(name)
            .or_else(|| self.short_names.get(name))
            .copied()
    }
}
