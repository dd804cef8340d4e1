use std::collections::HashMap;

use indexmap::IndexMap;

use factoria_core::{AssociationSignal, ModelDefinition, Table};

const DEFAULT_OWNER_KEY: &str = "id";

/// Source of association signals for one model.
///
/// Scanners are best-effort: associations they cannot resolve are omitted
/// rather than reported as errors.
pub trait AssociationScanner {
    fn scan(&self, model: &ModelDefinition, table: &Table) -> Vec<AssociationSignal>;
}

/// Signals from the `belongs_to` entries of the model manifest.
///
/// An absent owner key defaults to the related model's primary key, or
/// `id` when the related model is not in the manifest.
#[derive(Debug, Clone)]
pub struct DeclaredAssociations {
    namespace: String,
    primary_keys: HashMap<String, String>,
}

impl DeclaredAssociations {
    pub fn new(namespace: impl Into<String>, models: &[ModelDefinition]) -> Self {
        let namespace = namespace.into();
        let primary_keys = models
            .iter()
            .map(|model| (qualify(&namespace, &model.name), model.primary_key.clone()))
            .collect();
        Self {
            namespace,
            primary_keys,
        }
    }
}

impl AssociationScanner for DeclaredAssociations {
    fn scan(&self, model: &ModelDefinition, _table: &Table) -> Vec<AssociationSignal> {
        model
            .belongs_to
            .iter()
            .map(|relation| {
                let related = qualify(&self.namespace, &relation.related);
                let related_key = self
                    .primary_keys
                    .get(&related)
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_OWNER_KEY);
                let owner_key = relation.owner_key(related_key).to_string();
                AssociationSignal::new(relation.foreign_key(), related, owner_key)
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
struct KnownTable {
    schema: String,
    table: String,
    model: String,
}

/// Signals inferred from single-column foreign key constraints.
///
/// A foreign key only yields a signal when its referenced table belongs to
/// one of the known models. Unqualified model tables resolve against
/// `default_schema`, the same way the schema providers resolve them.
#[derive(Debug, Clone)]
pub struct ForeignKeyAssociations {
    known: Vec<KnownTable>,
}

impl ForeignKeyAssociations {
    pub fn new(
        namespace: &str,
        default_schema: &str,
        table_prefix: &str,
        models: &[ModelDefinition],
    ) -> Self {
        let known = models
            .iter()
            .map(|model| {
                let table_name = model.table_name();
                let (schema, table) = match table_name.split_once('.') {
                    Some((schema, table)) => (schema.to_string(), table.to_string()),
                    None => (default_schema.to_string(), table_name),
                };
                KnownTable {
                    schema,
                    table: format!("{table_prefix}{table}"),
                    model: qualify(namespace, &model.name),
                }
            })
            .collect();
        Self { known }
    }

    fn model_for(&self, schema: &str, table: &str) -> Option<&str> {
        self.known
            .iter()
            .find(|item| item.table == table && item.schema == schema)
            .map(|item| item.model.as_str())
    }
}

impl AssociationScanner for ForeignKeyAssociations {
    fn scan(&self, _model: &ModelDefinition, table: &Table) -> Vec<AssociationSignal> {
        table
            .foreign_keys()
            .filter_map(|fk| {
                let [column] = fk.columns.as_slice() else {
                    return None;
                };
                let [referenced] = fk.referenced_columns.as_slice() else {
                    return None;
                };
                let related = self.model_for(&fk.referenced_schema, &fk.referenced_table)?;
                Some(AssociationSignal::new(column, related, referenced))
            })
            .collect()
    }
}

/// Runs scanners in order and concatenates their signals.
///
/// Earlier scanners take precedence under first-match-wins.
#[derive(Default)]
pub struct ScannerChain {
    scanners: Vec<Box<dyn AssociationScanner + Send + Sync>>,
}

impl ScannerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, scanner: impl AssociationScanner + Send + Sync + 'static) -> Self {
        self.scanners.push(Box::new(scanner));
        self
    }

    pub fn len(&self) -> usize {
        self.scanners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scanners.is_empty()
    }
}

impl AssociationScanner for ScannerChain {
    fn scan(&self, model: &ModelDefinition, table: &Table) -> Vec<AssociationSignal> {
        self.scanners
            .iter()
            .flat_map(|scanner| scanner.scan(model, table))
            .collect()
    }
}

/// Association signals keyed by local field, first signal per field wins.
#[derive(Debug, Clone, Default)]
pub struct AssociationSet {
    by_field: IndexMap<String, AssociationSignal>,
}

impl AssociationSet {
    pub fn from_signals<I>(signals: I) -> Self
    where
        I: IntoIterator<Item = AssociationSignal>,
    {
        let mut by_field: IndexMap<String, AssociationSignal> = IndexMap::new();
        for signal in signals {
            if let Some(kept) = by_field.get(&signal.field_name) {
                tracing::debug!(
                    event = "signal_shadowed",
                    field = %signal.field_name,
                    kept = %kept.related_entity,
                    dropped = %signal.related_entity,
                );
                continue;
            }
            by_field.insert(signal.field_name.clone(), signal);
        }
        Self { by_field }
    }

    pub fn get(&self, field: &str) -> Option<&AssociationSignal> {
        self.by_field.get(field)
    }

    pub fn signals(&self) -> impl Iterator<Item = &AssociationSignal> {
        self.by_field.values()
    }

    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }
}

/// Qualify a class name with the namespace unless it already carries one.
pub fn qualify(namespace: &str, name: &str) -> String {
    if name.contains('\\') || namespace.is_empty() {
        name.trim_start_matches('\\').to_string()
    } else {
        format!("{}\\{name}", namespace.trim_end_matches('\\'))
    }
}
