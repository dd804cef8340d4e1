use std::fmt;

use async_trait::async_trait;

use factoria_core::{DatabaseSchema, EnumType, Result, SNAPSHOT_VERSION, Schema, TableSchema};

use crate::options::ProviderOptions;

/// Schema-qualified table identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableRef {
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Resolve `schema.table` or a bare `table` against the options.
    ///
    /// The table prefix applies to the table part only.
    pub fn parse(raw: &str, opts: &ProviderOptions) -> Self {
        let (schema, table) = match raw.split_once('.') {
            Some((schema, table)) => (schema.to_string(), table),
            None => (opts.default_schema.clone(), raw),
        };
        Self {
            schema,
            table: format!("{}{table}", opts.table_prefix),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// Source of physical table metadata.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Load columns, constraints and used enum types for one table.
    async fn describe_table(&self, table: &TableRef) -> Result<TableSchema>;
}

/// Describe every table in `tables` and assemble a snapshot.
///
/// Schemas and tables are sorted by name; enum types are deduplicated.
pub async fn introspect_tables<P>(
    provider: &P,
    database: Option<String>,
    tables: &[TableRef],
) -> Result<DatabaseSchema>
where
    P: SchemaProvider + ?Sized,
{
    let mut schemas: Vec<Schema> = Vec::new();
    let mut enums: Vec<EnumType> = Vec::new();

    for table_ref in tables {
        let described = provider.describe_table(table_ref).await?;
        for en in described.enums {
            if !enums.contains(&en) {
                enums.push(en);
            }
        }

        match schemas.iter_mut().find(|item| item.name == described.schema) {
            Some(schema) => {
                if !schema.tables.iter().any(|item| item.name == described.table.name) {
                    schema.tables.push(described.table);
                }
            }
            None => schemas.push(Schema {
                name: described.schema,
                tables: vec![described.table],
            }),
        }
    }

    for schema in &mut schemas {
        schema.tables.sort_by(|left, right| left.name.cmp(&right.name));
    }
    schemas.sort_by(|left, right| left.name.cmp(&right.name));
    enums.sort_by(|left, right| {
        left.schema
            .cmp(&right.schema)
            .then_with(|| left.name.cmp(&right.name))
    });

    Ok(DatabaseSchema {
        snapshot_version: SNAPSHOT_VERSION.to_string(),
        engine: provider.engine().to_string(),
        database,
        schemas,
        enums,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_qualified_and_bare_names() {
        let opts = ProviderOptions::default();
        assert_eq!(
            TableRef::parse("users", &opts),
            TableRef::new("public", "users")
        );
        assert_eq!(
            TableRef::parse("crm.contacts", &opts),
            TableRef::new("crm", "contacts")
        );
    }

    #[test]
    fn applies_prefix_to_table_part() {
        let opts = ProviderOptions {
            default_schema: "app".to_string(),
            table_prefix: "wp_".to_string(),
        };
        let parsed = TableRef::parse("billing.invoices", &opts);
        assert_eq!(parsed.to_string(), "billing.wp_invoices");
        assert_eq!(TableRef::parse("posts", &opts).to_string(), "app.wp_posts");
    }
}
