use std::collections::BTreeMap;

use factoria_core::{
    ColumnDescriptor, ColumnType, DeclaredType, EnumType, Error, ModelDefinition, Result,
    TableSchema,
};

/// User-configured mapping from driver type names to declared types.
///
/// Keys are compared in lower case against the column's `udt_name` first,
/// then against its formatted `data_type` without modifiers.
#[derive(Debug, Clone, Default)]
pub struct TypeOverrides {
    map: BTreeMap<String, DeclaredType>,
}

impl TypeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build overrides from `driver type -> declared type tag` pairs.
    pub fn from_tags<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut overrides = Self::new();
        for (driver_type, tag) in pairs {
            let declared = DeclaredType::from_tag(tag).ok_or_else(|| {
                Error::Other(format!(
                    "unknown declared type '{tag}' for driver type '{driver_type}'"
                ))
            })?;
            overrides.insert(driver_type, declared);
        }
        Ok(overrides)
    }

    pub fn insert(&mut self, driver_type: &str, declared: DeclaredType) {
        self.map.insert(driver_type.to_lowercase(), declared);
    }

    pub fn get(&self, column_type: &ColumnType) -> Option<DeclaredType> {
        self.map
            .get(&column_type.udt_name.to_lowercase())
            .or_else(|| self.map.get(&base_type(&column_type.data_type)))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Normalize a driver type into the closed declared-type set.
///
/// Returns the enum labels alongside `Enumerated`; every other type gets an
/// empty list. Unsupported types map to `Unknown`.
pub fn normalize_type(
    column_type: &ColumnType,
    enums: &[EnumType],
    overrides: &TypeOverrides,
) -> (DeclaredType, Vec<String>) {
    let user_enum = enums.iter().find(|en| {
        en.schema == column_type.udt_schema && en.name == column_type.udt_name
    });

    let declared = overrides.get(column_type).unwrap_or_else(|| {
        if user_enum.is_some() {
            DeclaredType::Enumerated
        } else {
            builtin_type(&column_type.udt_name.to_lowercase())
                .or_else(|| builtin_type(&base_type(&column_type.data_type)))
                .unwrap_or(DeclaredType::Unknown)
        }
    });

    if declared != DeclaredType::Enumerated {
        return (declared, Vec::new());
    }

    let labels = match user_enum {
        Some(en) => en.labels.clone(),
        None => inline_enum_labels(&column_type.data_type),
    };
    (declared, labels)
}

/// Build the column descriptors for a model's table in column order.
pub fn describe_columns(
    described: &TableSchema,
    model: &ModelDefinition,
    overrides: &TypeOverrides,
) -> Vec<ColumnDescriptor> {
    described
        .table
        .columns
        .iter()
        .map(|column| {
            let (mut declared_type, mut enum_values) =
                normalize_type(&column.column_type, &described.enums, overrides);

            if model.is_date(&column.name) {
                declared_type = DeclaredType::Timestamp;
                enum_values.clear();
            }

            if declared_type == DeclaredType::Unknown {
                tracing::debug!(
                    event = "type_unknown",
                    table = %described.qualified_name(),
                    column = %column.name,
                    data_type = %column.column_type.data_type,
                );
            }

            let is_primary_auto_key = column.name == model.primary_key
                && model
                    .incrementing
                    .unwrap_or_else(|| column.is_auto_generated());

            ColumnDescriptor {
                name: column.name.clone(),
                declared_type,
                is_primary_auto_key,
                is_managed_timestamp: model.is_managed_timestamp(&column.name),
                enum_values,
            }
        })
        .collect()
}

fn builtin_type(name: &str) -> Option<DeclaredType> {
    let declared = match name {
        "varchar" | "bpchar" | "char" | "character varying" | "character" | "citext"
        | "name" | "string" => DeclaredType::String,
        "text" | "tinytext" | "mediumtext" | "longtext" => DeclaredType::Text,
        "date" => DeclaredType::Date,
        "time" | "timetz" | "time without time zone" | "time with time zone" => {
            DeclaredType::Time
        }
        "timestamptz" | "timestamp with time zone" | "datetimetz" => DeclaredType::TimestampTz,
        "timestamp" | "timestamp without time zone" | "datetime" => DeclaredType::Timestamp,
        "int2" | "int4" | "int8" | "smallint" | "integer" | "int" | "bigint" | "tinyint"
        | "mediumint" | "smallserial" | "serial" | "bigserial" => DeclaredType::Integer,
        "numeric" | "decimal" | "float4" | "float8" | "real" | "double precision" | "float"
        | "double" | "money" => DeclaredType::Decimal,
        "bool" | "boolean" => DeclaredType::Boolean,
        "uuid" | "guid" => DeclaredType::Guid,
        "enum" => DeclaredType::Enumerated,
        _ => return None,
    };
    Some(declared)
}

/// Lower-cased type name without modifiers: `character varying(255)` -> `character varying`.
fn base_type(data_type: &str) -> String {
    data_type
        .split('(')
        .next()
        .unwrap_or(data_type)
        .trim()
        .to_lowercase()
}

/// Labels of an inline enum declaration such as `enum('draft','published')`.
fn inline_enum_labels(data_type: &str) -> Vec<String> {
    data_type
        .split('\'')
        .skip(1)
        .step_by(2)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}
