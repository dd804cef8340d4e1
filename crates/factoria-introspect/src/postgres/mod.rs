use async_trait::async_trait;
use sqlx::PgPool;

use factoria_core::{Error, Result, TableSchema};

use crate::provider::{SchemaProvider, TableRef};

mod mapper;
mod queries;

/// Schema provider backed by a live PostgreSQL catalog.
#[derive(Debug, Clone)]
pub struct PostgresProvider {
    pool: PgPool,
}

impl PostgresProvider {
    /// Create a new provider using a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn database_name(&self) -> Result<String> {
        queries::fetch_database_name(&self.pool).await
    }
}

#[async_trait]
impl SchemaProvider for PostgresProvider {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn describe_table(&self, table_ref: &TableRef) -> Result<TableSchema> {
        let raw_table = queries::find_table(&self.pool, &table_ref.schema, &table_ref.table)
            .await?
            .ok_or_else(|| Error::NotFound(format!("table {table_ref}")))?;

        let mut table = mapper::map_table(raw_table);
        table.columns = mapper::map_columns(
            queries::list_columns(&self.pool, &table_ref.schema, &table_ref.table).await?,
        );

        let pk = queries::get_primary_key(&self.pool, &table_ref.schema, &table_ref.table).await?;
        let fks =
            queries::list_foreign_keys(&self.pool, &table_ref.schema, &table_ref.table).await?;
        table.constraints = mapper::map_constraints(pk, fks);

        let enums = mapper::map_enums(
            queries::list_column_enums(&self.pool, &table_ref.schema, &table_ref.table).await?,
        );

        tracing::debug!(
            event = "table_described",
            table = %table_ref,
            columns = table.columns.len(),
            enums = enums.len(),
        );

        Ok(TableSchema {
            schema: table_ref.schema.clone(),
            table,
            enums,
        })
    }
}
