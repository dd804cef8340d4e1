use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Formatted and raw driver type metadata for a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnType {
    /// User-friendly formatted type (e.g. `character varying(255)`).
    pub data_type: String,
    /// Namespace of the underlying type.
    pub udt_schema: String,
    /// Name of the underlying type (e.g. `varchar`, `int8`, a user enum).
    pub udt_name: String,
}

impl ColumnType {
    pub fn new(
        data_type: impl Into<String>,
        udt_schema: impl Into<String>,
        udt_name: impl Into<String>,
    ) -> Self {
        Self {
            data_type: data_type.into(),
            udt_schema: udt_schema.into(),
            udt_name: udt_name.into(),
        }
    }

    /// Builtin type living in `pg_catalog`.
    pub fn builtin(data_type: impl Into<String>, udt_name: impl Into<String>) -> Self {
        Self::new(data_type, "pg_catalog", udt_name)
    }
}

/// Identity generation strategy for columns using `GENERATED ... AS IDENTITY`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IdentityGeneration {
    Always,
    ByDefault,
}

/// User-defined enumerated type and its labels in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnumType {
    pub schema: String,
    pub name: String,
    pub labels: Vec<String>,
}
