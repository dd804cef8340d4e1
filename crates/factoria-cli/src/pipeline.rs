use factoria_classify::{
    AssociationScanner, ClassificationEngine, DeclaredAssociations, ForeignKeyAssociations,
    GeneratorRegistry, ScannerChain,
};
use factoria_core::{FactorySpec, ModelDefinition};
use factoria_introspect::{
    ProviderOptions, SchemaProvider, TableRef, TypeOverrides, describe_columns,
};

use crate::config::FactoriaConfig;
use crate::error::CliError;

/// Wires a schema provider, the association scanners and the
/// classification engine for one run.
pub struct Pipeline<'a> {
    config: &'a FactoriaConfig,
    provider: &'a dyn SchemaProvider,
    registry: GeneratorRegistry,
    overrides: TypeOverrides,
    scanners: ScannerChain,
    options: ProviderOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a FactoriaConfig, provider: &'a dyn SchemaProvider) -> Result<Self, CliError> {
        let registry = config
            .names
            .iter()
            .fold(GeneratorRegistry::standard(), |registry, (name, expression)| {
                registry.with_name_override(name, expression.clone())
            });
        let overrides = TypeOverrides::from_tags(config.types.iter())?;

        let mut scanners = ScannerChain::new()
            .with(DeclaredAssociations::new(&config.namespace, &config.models));
        if config.infer_relations {
            scanners = scanners.with(ForeignKeyAssociations::new(
                &config.namespace,
                &config.default_schema,
                &config.table_prefix,
                &config.models,
            ));
        }

        Ok(Self {
            config,
            provider,
            registry,
            overrides,
            scanners,
            options: config.provider_options(),
        })
    }

    fn table_ref(&self, model: &ModelDefinition) -> TableRef {
        TableRef::parse(&model.table_name(), &self.options)
    }

    /// Describe the model's table and classify its fields.
    pub async fn classify(&self, model: &ModelDefinition) -> Result<FactorySpec, CliError> {
        let table_ref = self.table_ref(model);
        let described = self.provider.describe_table(&table_ref).await?;

        let columns = describe_columns(&described, model, &self.overrides);
        let signals = self.scanners.scan(model, &described.table);

        let engine = ClassificationEngine::new(&self.registry);
        Ok(engine.classify_model(
            &self.config.qualified_name(model),
            &described.qualified_name(),
            &columns,
            &signals,
        ))
    }
}
