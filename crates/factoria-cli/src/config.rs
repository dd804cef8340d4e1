use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use factoria_classify::qualify;
use factoria_core::ModelDefinition;
use factoria_introspect::ProviderOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Contents of `factoria.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactoriaConfig {
    /// Namespace prepended to unqualified model class names.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Directory receiving `<Model>Factory.php` files.
    #[serde(default = "default_factories_dir")]
    pub factories_dir: PathBuf,
    #[serde(default = "default_schema")]
    pub default_schema: String,
    #[serde(default)]
    pub table_prefix: String,
    /// Derive relations from foreign key constraints in addition to `belongs_to`.
    #[serde(default = "default_true")]
    pub infer_relations: bool,
    /// Driver type name -> declared type tag.
    #[serde(default)]
    pub types: BTreeMap<String, String>,
    /// Field name -> generator expression, checked before the stock name table.
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    #[serde(default)]
    pub models: Vec<ModelDefinition>,
}

impl Default for FactoriaConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            factories_dir: default_factories_dir(),
            default_schema: default_schema(),
            table_prefix: String::new(),
            infer_relations: true,
            types: BTreeMap::new(),
            names: BTreeMap::new(),
            models: Vec::new(),
        }
    }
}

impl FactoriaConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FactoriaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for model in &self.models {
            if model.name.trim().is_empty() {
                return Err(ConfigError::Invalid("model name must not be empty".to_string()));
            }
            if !seen.insert(self.qualified_name(model)) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate model: {}",
                    model.name
                )));
            }
        }
        Ok(())
    }

    pub fn provider_options(&self) -> ProviderOptions {
        ProviderOptions {
            default_schema: self.default_schema.clone(),
            table_prefix: self.table_prefix.clone(),
        }
    }

    pub fn qualified_name(&self, model: &ModelDefinition) -> String {
        qualify(&self.namespace, &model.name)
    }

    /// Models matching `names` by class or qualified name; all models when empty.
    ///
    /// Names that match nothing are returned separately.
    pub fn select_models<'a>(&'a self, names: &[String]) -> (Vec<&'a ModelDefinition>, Vec<String>) {
        if names.is_empty() {
            return (self.models.iter().collect(), Vec::new());
        }

        let mut selected: Vec<&ModelDefinition> = Vec::new();
        let mut unknown = Vec::new();
        for name in names {
            let found = self.models.iter().find(|model| {
                model.name == *name
                    || model.base_name() == name
                    || self.qualified_name(model) == name.trim_start_matches('\\')
            });
            match found {
                Some(model) => {
                    if !selected.iter().any(|item| std::ptr::eq(*item, model)) {
                        selected.push(model);
                    }
                }
                None => unknown.push(name.clone()),
            }
        }
        (selected, unknown)
    }
}

pub fn load_config(path: &Path) -> Result<FactoriaConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FactoriaConfig::from_toml(&content)
}

fn default_namespace() -> String {
    "App".to_string()
}

fn default_factories_dir() -> PathBuf {
    PathBuf::from("database/factories")
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_true() -> bool {
    true
}
