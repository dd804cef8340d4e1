use factoria_core::{
    AssociationSignal, ColumnDescriptor, FactorySpec, GeneratorDescriptor, GeneratorKind,
};

use crate::associations::AssociationSet;
use crate::registry::GeneratorRegistry;

/// Field Classification Engine.
///
/// Assigns every eligible column exactly one generator descriptor using a
/// fixed precedence: relation, then field name, then declared type, then
/// the registry fallback. The engine holds no state besides the injected
/// registry, so one instance can classify any number of models.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationEngine<'a> {
    registry: &'a GeneratorRegistry,
}

impl<'a> ClassificationEngine<'a> {
    pub fn new(registry: &'a GeneratorRegistry) -> Self {
        Self { registry }
    }

    /// Classify one column.
    ///
    /// A signal for a different field is ignored. Callers are expected to
    /// filter out ineligible columns; see [`ClassificationEngine::classify_model`].
    pub fn classify_field(
        &self,
        column: &ColumnDescriptor,
        signal: Option<&AssociationSignal>,
    ) -> GeneratorDescriptor {
        let (kind, expression) = match signal.filter(|signal| signal.field_name == column.name) {
            Some(signal) => (GeneratorKind::Relation, relation_expression(signal)),
            None => self.heuristic(column),
        };

        GeneratorDescriptor {
            field_name: column.name.clone(),
            kind,
            expression,
        }
    }

    /// Classify every eligible column of a model, preserving column order.
    ///
    /// Auto keys and managed timestamps are skipped. Signals naming no
    /// eligible column are dropped; for repeated fields the first wins.
    pub fn classify_model(
        &self,
        model: &str,
        table: &str,
        columns: &[ColumnDescriptor],
        signals: &[AssociationSignal],
    ) -> FactorySpec {
        let associations = AssociationSet::from_signals(signals.iter().cloned());
        for signal in associations.signals() {
            let applies = columns
                .iter()
                .any(|column| column.is_eligible() && column.name == signal.field_name);
            if !applies {
                tracing::debug!(
                    event = "signal_ignored",
                    model = %model,
                    field = %signal.field_name,
                    related = %signal.related_entity,
                );
            }
        }

        let mut spec = FactorySpec::new(model, table);
        for column in columns.iter().filter(|column| column.is_eligible()) {
            let descriptor = self.classify_field(column, associations.get(&column.name));
            tracing::debug!(
                event = "field_classified",
                model = %model,
                field = %descriptor.field_name,
                kind = descriptor.kind.as_str(),
            );
            spec.fields.insert(descriptor.field_name.clone(), descriptor);
        }
        spec
    }

    fn heuristic(&self, column: &ColumnDescriptor) -> (GeneratorKind, String) {
        if let Some(expression) = self.registry.lookup_by_name(&column.name) {
            return (GeneratorKind::NameHeuristic, expression);
        }
        if let Some(expression) = self
            .registry
            .lookup_by_type(column.declared_type, &column.enum_values)
        {
            return (GeneratorKind::TypeHeuristic, expression);
        }
        (GeneratorKind::Fallback, self.registry.fallback().to_string())
    }
}

/// Expression creating the related entity and reading its key.
pub fn relation_expression(signal: &AssociationSignal) -> String {
    format!(
        "factory({}::class)->create()->{}",
        signal.related_entity, signal.related_key_field
    )
}
