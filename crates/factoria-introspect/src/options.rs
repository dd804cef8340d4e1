/// Options that control how table identifiers are resolved.
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Schema used for unqualified table names.
    pub default_schema: String,
    /// Prefix prepended to every table name (e.g. `app_`).
    pub table_prefix: String,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            default_schema: "public".to_string(),
            table_prefix: String::new(),
        }
    }
}
