use factoria_core::{
    Column, ColumnType, Constraint, EnumType, ForeignKey, IdentityGeneration, PrimaryKey, Table,
};

use super::queries::{RawColumn, RawEnumType, RawForeignKey, RawPrimaryKey, RawTable};

pub fn map_table(raw: RawTable) -> Table {
    Table {
        name: raw.name,
        comment: raw.comment,
        columns: Vec::new(),
        constraints: Vec::new(),
    }
}

pub fn map_columns(raw: Vec<RawColumn>) -> Vec<Column> {
    raw.into_iter()
        .map(|col| Column {
            ordinal_position: col.ordinal_position,
            name: col.name,
            column_type: ColumnType {
                data_type: col.data_type,
                udt_schema: col.udt_schema,
                udt_name: col.udt_name,
            },
            is_nullable: col.is_nullable,
            default: col.default,
            identity: identity_from_text(col.identity_generation.as_deref()),
        })
        .collect()
}

pub fn map_constraints(pk: Option<RawPrimaryKey>, fks: Vec<RawForeignKey>) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    if let Some(pk) = pk {
        constraints.push(Constraint::PrimaryKey(PrimaryKey {
            name: Some(pk.name),
            columns: pk.columns,
        }));
    }
    constraints.extend(fks.into_iter().map(|fk| {
        Constraint::ForeignKey(ForeignKey {
            name: Some(fk.name),
            columns: fk.columns,
            referenced_schema: fk.referenced_schema,
            referenced_table: fk.referenced_table,
            referenced_columns: fk.referenced_columns,
        })
    }));
    constraints
}

pub fn map_enums(raw: Vec<RawEnumType>) -> Vec<EnumType> {
    raw.into_iter()
        .map(|en| EnumType {
            schema: en.schema,
            name: en.name,
            labels: en.labels,
        })
        .collect()
}

fn identity_from_text(value: Option<&str>) -> Option<IdentityGeneration> {
    match value {
        Some("ALWAYS") => Some(IdentityGeneration::Always),
        Some("BY DEFAULT") => Some(IdentityGeneration::ByDefault),
        _ => None,
    }
}
