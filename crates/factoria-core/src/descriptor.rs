use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Closed set of schema type categories understood by the classifier.
///
/// Driver-specific type names are normalized into this set before a column
/// reaches the engine. Anything that cannot be normalized is tagged
/// [`DeclaredType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeclaredType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "timestamp-with-zone")]
    TimestampTz,
    #[serde(rename = "timestamp")]
    Timestamp,
    #[serde(rename = "integer-family")]
    Integer,
    #[serde(rename = "decimal-family")]
    Decimal,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "enumerated")]
    Enumerated,
    #[serde(rename = "guid")]
    Guid,
    #[serde(rename = "unknown")]
    Unknown,
}

impl DeclaredType {
    pub const ALL: [DeclaredType; 12] = [
        DeclaredType::String,
        DeclaredType::Text,
        DeclaredType::Date,
        DeclaredType::Time,
        DeclaredType::TimestampTz,
        DeclaredType::Timestamp,
        DeclaredType::Integer,
        DeclaredType::Decimal,
        DeclaredType::Boolean,
        DeclaredType::Enumerated,
        DeclaredType::Guid,
        DeclaredType::Unknown,
    ];

    /// Canonical tag, as used in configuration files and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            DeclaredType::String => "string",
            DeclaredType::Text => "text",
            DeclaredType::Date => "date",
            DeclaredType::Time => "time",
            DeclaredType::TimestampTz => "timestamp-with-zone",
            DeclaredType::Timestamp => "timestamp",
            DeclaredType::Integer => "integer-family",
            DeclaredType::Decimal => "decimal-family",
            DeclaredType::Boolean => "boolean",
            DeclaredType::Enumerated => "enumerated",
            DeclaredType::Guid => "guid",
            DeclaredType::Unknown => "unknown",
        }
    }

    /// Parse a canonical tag. Comparison is exact.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == tag)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized view of one physical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub declared_type: DeclaredType,
    #[serde(default)]
    pub is_primary_auto_key: bool,
    #[serde(default)]
    pub is_managed_timestamp: bool,
    /// Permitted values, only populated for enumerated columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

impl ColumnDescriptor {
    /// Plain column with no key or timestamp flags.
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            is_primary_auto_key: false,
            is_managed_timestamp: false,
            enum_values: Vec::new(),
        }
    }

    /// Enumerated column with its permitted values in declaration order.
    pub fn enumerated(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            enum_values: values,
            ..Self::new(name, DeclaredType::Enumerated)
        }
    }

    /// Whether the column takes part in classification.
    ///
    /// Auto keys and managed timestamps are filled by the persistence layer.
    pub fn is_eligible(&self) -> bool {
        !self.is_primary_auto_key && !self.is_managed_timestamp
    }
}

/// A detected foreign-key relationship between two models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationSignal {
    /// Local column acting as the foreign key.
    pub field_name: String,
    /// Identifier of the target model type.
    pub related_entity: String,
    /// Field on the related entity referenced by the foreign key.
    pub related_key_field: String,
}

impl AssociationSignal {
    pub fn new(
        field_name: impl Into<String>,
        related_entity: impl Into<String>,
        related_key_field: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            related_entity: related_entity.into(),
            related_key_field: related_key_field.into(),
        }
    }
}

/// Which rule produced a generator descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Relation,
    NameHeuristic,
    TypeHeuristic,
    Fallback,
}

impl GeneratorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GeneratorKind::Relation => "relation",
            GeneratorKind::NameHeuristic => "name_heuristic",
            GeneratorKind::TypeHeuristic => "type_heuristic",
            GeneratorKind::Fallback => "fallback",
        }
    }
}

/// Classification output for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorDescriptor {
    pub field_name: String,
    pub kind: GeneratorKind,
    /// Opaque expression handed verbatim to the renderer.
    pub expression: String,
}

/// Per-model synthetic value specification.
///
/// `fields` keeps the schema's column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorySpec {
    pub model: String,
    pub table: String,
    pub fields: IndexMap<String, GeneratorDescriptor>,
}

impl FactorySpec {
    pub fn new(model: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            table: table.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&GeneratorDescriptor> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &GeneratorDescriptor> {
        self.fields.values()
    }

    /// Number of descriptors produced by the given rule.
    pub fn count_kind(&self, kind: GeneratorKind) -> usize {
        self.descriptors().filter(|item| item.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_type_tags_are_exact() {
        for item in DeclaredType::ALL {
            assert_eq!(DeclaredType::from_tag(item.as_str()), Some(item));
        }
        assert_eq!(DeclaredType::from_tag("STRING"), None);
        assert_eq!(DeclaredType::from_tag("varchar"), None);
    }

    #[test]
    fn declared_type_serializes_as_tag() {
        let json = serde_json::to_string(&DeclaredType::TimestampTz).unwrap();
        assert_eq!(json, "\"timestamp-with-zone\"");
        let parsed: DeclaredType = serde_json::from_str("\"integer-family\"").unwrap();
        assert_eq!(parsed, DeclaredType::Integer);
    }

    #[test]
    fn flagged_columns_are_not_eligible() {
        let mut id = ColumnDescriptor::new("id", DeclaredType::Integer);
        assert!(id.is_eligible());
        id.is_primary_auto_key = true;
        assert!(!id.is_eligible());

        let mut created = ColumnDescriptor::new("created_at", DeclaredType::Timestamp);
        created.is_managed_timestamp = true;
        assert!(!created.is_eligible());
    }
}
