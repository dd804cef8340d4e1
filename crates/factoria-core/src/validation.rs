use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::{DatabaseSchema, Table};

/// Validate internal consistency of a schema snapshot.
///
/// This checks:
/// - duplicate schemas, tables and columns
/// - primary key columns exist
/// - foreign key local columns exist and match the referenced column count
pub fn validate_snapshot(snapshot: &DatabaseSchema) -> Result<()> {
    let mut schema_names = BTreeSet::new();
    for db_schema in &snapshot.schemas {
        if !schema_names.insert(db_schema.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate schema name: {}",
                db_schema.name
            )));
        }

        let mut table_names = BTreeSet::new();
        for table in &db_schema.tables {
            if !table_names.insert(table.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate table name: {}.{}",
                    db_schema.name, table.name
                )));
            }
            validate_table(&db_schema.name, table)?;
        }
    }

    Ok(())
}

fn validate_table(schema: &str, table: &Table) -> Result<()> {
    let mut columns = BTreeSet::new();
    for column in &table.columns {
        if !columns.insert(column.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate column name: {schema}.{}.{}",
                table.name, column.name
            )));
        }
    }

    if let Some(pk) = table.primary_key() {
        for column in &pk.columns {
            if !columns.contains(column.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "primary key column missing: {schema}.{}.{column}",
                    table.name
                )));
            }
        }
    }

    for fk in table.foreign_keys() {
        if fk.columns.len() != fk.referenced_columns.len() {
            return Err(Error::InvalidSchema(format!(
                "foreign key column count mismatch on {schema}.{}",
                table.name
            )));
        }
        for column in &fk.columns {
            if !columns.contains(column.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "foreign key column missing: {schema}.{}.{column}",
                    table.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{Constraint, PrimaryKey};
    use crate::schema::{Column, Schema};
    use crate::types::ColumnType;

    fn column(name: &str) -> Column {
        Column {
            ordinal_position: 1,
            name: name.to_string(),
            column_type: ColumnType::builtin("integer", "int4"),
            is_nullable: false,
            default: None,
            identity: None,
        }
    }

    fn snapshot(table: Table) -> DatabaseSchema {
        DatabaseSchema {
            snapshot_version: "0.1".to_string(),
            engine: "postgres".to_string(),
            database: None,
            schemas: vec![Schema {
                name: "public".to_string(),
                tables: vec![table],
            }],
            enums: Vec::new(),
        }
    }

    #[test]
    fn rejects_duplicate_columns() {
        let table = Table {
            name: "users".to_string(),
            comment: None,
            columns: vec![column("id"), column("id")],
            constraints: Vec::new(),
        };
        let err = validate_snapshot(&snapshot(table)).unwrap_err();
        assert!(err.to_string().contains("duplicate column name"));
    }

    #[test]
    fn rejects_missing_primary_key_column() {
        let table = Table {
            name: "users".to_string(),
            comment: None,
            columns: vec![column("email")],
            constraints: vec![Constraint::PrimaryKey(PrimaryKey {
                name: Some("users_pkey".to_string()),
                columns: vec!["id".to_string()],
            })],
        };
        assert!(validate_snapshot(&snapshot(table)).is_err());
    }

    #[test]
    fn accepts_consistent_table() {
        let table = Table {
            name: "users".to_string(),
            comment: None,
            columns: vec![column("id"), column("email")],
            constraints: vec![Constraint::PrimaryKey(PrimaryKey {
                name: Some("users_pkey".to_string()),
                columns: vec!["id".to_string()],
            })],
        };
        validate_snapshot(&snapshot(table)).expect("valid snapshot");
    }
}
