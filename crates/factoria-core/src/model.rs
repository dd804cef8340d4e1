use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

/// Model entry from the factoria manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Class name, optionally namespace-qualified (`App\Models\Post`).
    pub name: String,
    /// Backing table; derived from the class name when absent.
    ///
    /// Derivation covers regular and common irregular English plurals.
    /// Anything else needs an explicit table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    /// Whether the primary key is auto-generated. Inferred from the schema when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incrementing: Option<bool>,
    #[serde(default = "default_true")]
    pub timestamps: bool,
    #[serde(default)]
    pub soft_deletes: bool,
    #[serde(default = "default_created_at")]
    pub created_at_column: String,
    #[serde(default = "default_updated_at")]
    pub updated_at_column: String,
    #[serde(default = "default_deleted_at")]
    pub deleted_at_column: String,
    /// Columns treated as timestamps regardless of their physical type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub belongs_to: Vec<BelongsTo>,
}

/// Declared `belongs_to` association.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BelongsTo {
    /// Related model class name.
    pub related: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_key: Option<String>,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            primary_key: default_primary_key(),
            incrementing: None,
            timestamps: true,
            soft_deletes: false,
            created_at_column: default_created_at(),
            updated_at_column: default_updated_at(),
            deleted_at_column: default_deleted_at(),
            dates: Vec::new(),
            belongs_to: Vec::new(),
        }
    }

    /// Class name without its namespace.
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    /// Backing table name, without schema or prefix.
    pub fn table_name(&self) -> String {
        match &self.table {
            Some(table) => table.clone(),
            None => pluralize(&self.base_name().to_case(Case::Snake)),
        }
    }

    /// Columns maintained by the persistence layer for this model.
    pub fn managed_timestamps(&self) -> Vec<&str> {
        let mut columns = Vec::new();
        if self.timestamps {
            columns.push(self.created_at_column.as_str());
            columns.push(self.updated_at_column.as_str());
        }
        if self.soft_deletes {
            columns.push(self.deleted_at_column.as_str());
        }
        columns
    }

    pub fn is_managed_timestamp(&self, column: &str) -> bool {
        self.managed_timestamps().contains(&column)
    }

    pub fn is_date(&self, column: &str) -> bool {
        self.dates.iter().any(|item| item == column)
    }
}

impl BelongsTo {
    /// Local foreign key column, `<snake(related)>_id` unless overridden.
    pub fn foreign_key(&self) -> String {
        match &self.foreign_key {
            Some(value) => value.clone(),
            None => format!("{}_id", base_name(&self.related).to_case(Case::Snake)),
        }
    }

    /// Key read on the related model, `related_primary_key` unless overridden.
    pub fn owner_key<'a>(&'a self, related_primary_key: &'a str) -> &'a str {
        self.owner_key.as_deref().unwrap_or(related_primary_key)
    }
}

fn base_name(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

const UNCOUNTABLE: &[&str] = &[
    "audio", "data", "deer", "equipment", "feedback", "fish", "information", "media",
    "metadata", "money", "news", "rice", "series", "sheep", "species", "staff",
];

/// Plural of a snake_case name; only the last word is inflected.
fn pluralize(name: &str) -> String {
    let (head, word) = match name.rfind('_') {
        Some(index) => name.split_at(index + 1),
        None => ("", name),
    };
    format!("{head}{}", pluralize_word(word))
}

fn pluralize_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(singular, _)| *singular == word) {
        return plural.to_string();
    }
    if let Some(stem) = word.strip_suffix('y')
        && !stem.is_empty()
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{stem}ies");
    }
    if word.ends_with(['s', 'x', 'z']) || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{word}es");
    }
    format!("{word}s")
}

fn default_primary_key() -> String {
    "id".to_string()
}

fn default_true() -> bool {
    true
}

fn default_created_at() -> String {
    "created_at".to_string()
}

fn default_updated_at() -> String {
    "updated_at".to_string()
}

fn default_deleted_at() -> String {
    "deleted_at".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_table_from_class_name() {
        assert_eq!(ModelDefinition::new("User").table_name(), "users");
        assert_eq!(ModelDefinition::new("App\\BlogPost").table_name(), "blog_posts");
        assert_eq!(ModelDefinition::new("Category").table_name(), "categories");
        assert_eq!(ModelDefinition::new("Address").table_name(), "addresses");
        assert_eq!(ModelDefinition::new("Survey").table_name(), "surveys");
    }

    #[test]
    fn derives_irregular_and_uncountable_tables() {
        assert_eq!(ModelDefinition::new("Person").table_name(), "people");
        assert_eq!(ModelDefinition::new("Child").table_name(), "children");
        assert_eq!(ModelDefinition::new("App\\SalesPerson").table_name(), "sales_people");
        assert_eq!(ModelDefinition::new("Equipment").table_name(), "equipment");
        assert_eq!(ModelDefinition::new("PostMetadata").table_name(), "post_metadata");
        assert_eq!(ModelDefinition::new("Human").table_name(), "humans");
        assert_eq!(ModelDefinition::new("Box").table_name(), "boxes");
    }

    #[test]
    fn explicit_table_wins() {
        let mut model = ModelDefinition::new("Person");
        model.table = Some("crm.contacts".to_string());
        assert_eq!(model.table_name(), "crm.contacts");
    }

    #[test]
    fn managed_timestamps_follow_flags() {
        let mut model = ModelDefinition::new("Post");
        assert_eq!(model.managed_timestamps(), vec!["created_at", "updated_at"]);

        model.soft_deletes = true;
        assert!(model.is_managed_timestamp("deleted_at"));

        model.timestamps = false;
        assert_eq!(model.managed_timestamps(), vec!["deleted_at"]);
    }

    #[test]
    fn belongs_to_defaults() {
        let relation = BelongsTo {
            related: "App\\BlogAuthor".to_string(),
            foreign_key: None,
            owner_key: None,
        };
        assert_eq!(relation.foreign_key(), "blog_author_id");
        assert_eq!(relation.owner_key("id"), "id");
        assert_eq!(relation.owner_key("uuid"), "uuid");

        let explicit = BelongsTo {
            owner_key: Some("code".to_string()),
            ..relation
        };
        assert_eq!(explicit.owner_key("uuid"), "code");
    }
}
