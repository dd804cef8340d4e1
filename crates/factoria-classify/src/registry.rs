use std::collections::{BTreeMap, HashMap};

use factoria_core::DeclaredType;

/// Placeholder replaced by the quoted enum value list in type templates.
pub const ENUM_VALUES_PLACEHOLDER: &str = "{values}";

/// Expression used when neither table matches.
pub const FALLBACK_EXPRESSION: &str = "$faker->word";

/// Generators keyed by declared type.
pub const TYPE_TABLE: &[(DeclaredType, &str)] = &[
    (DeclaredType::String, "$faker->word"),
    (DeclaredType::Text, "$faker->text"),
    (DeclaredType::Date, "$faker->date()"),
    (DeclaredType::Time, "$faker->time()"),
    (DeclaredType::TimestampTz, "$faker->dateTime()"),
    (DeclaredType::Timestamp, "$faker->dateTime()"),
    (DeclaredType::Integer, "$faker->randomNumber()"),
    (DeclaredType::Decimal, "$faker->randomFloat()"),
    (DeclaredType::Boolean, "$faker->boolean"),
    (DeclaredType::Enumerated, "$faker->randomElement({values})"),
    (DeclaredType::Guid, "$faker->uuid"),
];

/// Generators keyed by exact, lower-cased field name.
pub const NAME_TABLE: &[(&str, &str)] = &[
    ("address1", "$faker->streetAddress"),
    ("address2", "$faker->secondaryAddress"),
    ("city", "$faker->city"),
    ("company", "$faker->company"),
    ("country", "$faker->country"),
    ("description", "$faker->text"),
    ("email", "$faker->safeEmail"),
    ("first_name", "$faker->firstName"),
    ("firstname", "$faker->firstName"),
    ("guid", "$faker->uuid"),
    ("last_name", "$faker->lastName"),
    ("lastname", "$faker->lastName"),
    ("lat", "$faker->latitude"),
    ("latitude", "$faker->latitude"),
    ("lng", "$faker->longitude"),
    ("longitude", "$faker->longitude"),
    ("name", "$faker->name"),
    ("password", "bcrypt($faker->password)"),
    ("phone", "$faker->phoneNumber"),
    ("phone_number", "$faker->phoneNumber"),
    ("postal_code", "$faker->postcode"),
    ("postcode", "$faker->postcode"),
    ("remember_token", "Str::random(10)"),
    ("slug", "$faker->slug"),
    ("street", "$faker->streetName"),
    ("summary", "$faker->text"),
    ("url", "$faker->url"),
    ("user_name", "$faker->userName"),
    ("username", "$faker->userName"),
    ("uuid", "$faker->uuid"),
    ("zip", "$faker->postcode"),
];

/// Immutable name and type lookup tables consulted by the classifier.
///
/// [`GeneratorRegistry::standard`] builds the stock tables; overrides
/// produce a new registry and never touch the shared constants.
#[derive(Debug, Clone)]
pub struct GeneratorRegistry {
    names: HashMap<String, String>,
    types: BTreeMap<DeclaredType, String>,
    fallback: String,
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl GeneratorRegistry {
    pub fn standard() -> Self {
        Self {
            names: NAME_TABLE
                .iter()
                .map(|(name, expression)| (name.to_string(), expression.to_string()))
                .collect(),
            types: TYPE_TABLE
                .iter()
                .map(|(declared, expression)| (*declared, expression.to_string()))
                .collect(),
            fallback: FALLBACK_EXPRESSION.to_string(),
        }
    }

    /// Registry with no entries; every field falls back.
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
            types: BTreeMap::new(),
            fallback: FALLBACK_EXPRESSION.to_string(),
        }
    }

    pub fn with_name_override(mut self, name: &str, expression: impl Into<String>) -> Self {
        self.names.insert(name.to_lowercase(), expression.into());
        self
    }

    pub fn with_type_override(mut self, declared: DeclaredType, expression: impl Into<String>) -> Self {
        self.types.insert(declared, expression.into());
        self
    }

    pub fn with_fallback(mut self, expression: impl Into<String>) -> Self {
        self.fallback = expression.into();
        self
    }

    /// Exact match on the lower-cased field name.
    pub fn lookup_by_name(&self, name: &str) -> Option<String> {
        self.names.get(&name.to_lowercase()).cloned()
    }

    /// Exact match on the declared type tag.
    ///
    /// `Unknown` never matches. Enum templates receive the quoted value list.
    pub fn lookup_by_type(&self, declared: DeclaredType, enum_values: &[String]) -> Option<String> {
        if declared == DeclaredType::Unknown {
            return None;
        }
        let template = self.types.get(&declared)?;
        if declared == DeclaredType::Enumerated {
            return Some(template.replace(ENUM_VALUES_PLACEHOLDER, &quote_list(enum_values)));
        }
        Some(template.clone())
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

/// Render values as a single-quoted list literal: `['a', 'b']`.
pub fn quote_list(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|value| format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect();
    format!("[{}]", quoted.join(", "))
}
