use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constraints::{Constraint, ForeignKey, PrimaryKey};
use crate::types::{ColumnType, EnumType, IdentityGeneration};

/// Top-level schema snapshot (`schema.json`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DatabaseSchema {
    /// Contract version for this snapshot format.
    pub snapshot_version: String,
    /// Database engine identifier (e.g. `postgres`).
    pub engine: String,
    /// Database name when available.
    pub database: Option<String>,
    /// Namespaces captured from the database.
    pub schemas: Vec<Schema>,
    /// Enum types used by captured columns.
    pub enums: Vec<EnumType>,
}

impl DatabaseSchema {
    pub fn find_table(&self, schema: &str, table: &str) -> Option<&Table> {
        self.schemas
            .iter()
            .find(|item| item.name == schema)
            .and_then(|item| item.tables.iter().find(|candidate| candidate.name == table))
    }

    /// Enum types referenced by the columns of `table`.
    pub fn enums_for(&self, table: &Table) -> Vec<EnumType> {
        self.enums
            .iter()
            .filter(|en| {
                table.columns.iter().any(|column| {
                    column.column_type.udt_schema == en.schema
                        && column.column_type.udt_name == en.name
                })
            })
            .cloned()
            .collect()
    }
}

/// A namespace containing tables.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<Table>,
}

/// A table backing one model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl Table {
    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.constraints.iter().find_map(|constraint| match constraint {
            Constraint::PrimaryKey(pk) => Some(pk),
            _ => None,
        })
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.constraints.iter().filter_map(|constraint| match constraint {
            Constraint::ForeignKey(fk) => Some(fk),
            _ => None,
        })
    }
}

/// Column metadata in physical order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub ordinal_position: i16,
    pub name: String,
    pub column_type: ColumnType,
    pub is_nullable: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub identity: Option<IdentityGeneration>,
}

impl Column {
    /// Whether the database fills this column on insert (identity or sequence).
    pub fn is_auto_generated(&self) -> bool {
        self.identity.is_some()
            || self
                .default
                .as_deref()
                .is_some_and(|default| default.starts_with("nextval("))
    }
}

/// Schema Provider output for a single table.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Namespace the table was resolved in.
    pub schema: String,
    pub table: Table,
    /// Enum types used by the table's columns.
    pub enums: Vec<EnumType>,
}

impl TableSchema {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table.name)
    }
}

/// JSON Schema describing the snapshot format.
pub fn snapshot_json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(DatabaseSchema)
}
