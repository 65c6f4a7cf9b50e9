//! Memory records: short stories visitors share about a recipe.
//!
//! The JSON field names match the blob persisted under the
//! `saborDeCasaMemories` storage key, so existing collections keep loading.

use chrono::{DateTime, TimeZone};
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Known category slugs and their display names.
pub const CATEGORIES: [(&str, &str); 6] = [
    ("appetizer", "Appetizer"),
    ("main-course", "Main Course"),
    ("dessert", "Dessert"),
    ("beverage", "Beverage"),
    ("side-dish", "Side Dish"),
    ("holiday-special", "Holiday Special"),
];

/// Map a category slug to its display name.  Unknown slugs pass through.
pub fn format_category(category: &str) -> String {
    CATEGORIES
        .iter()
        .find(|(slug, _)| *slug == category)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| category.to_string())
}

/// Format a creation date the way memory cards show it, e.g. `"Oct 19, 2026"`.
pub fn format_display_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%b %-d, %Y").to_string()
}

/// A required field of the share form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MemoryField {
    Name,
    Recipe,
    Memory,
    Category,
}

impl MemoryField {
    /// Validation order.
    pub const REQUIRED: [MemoryField; 4] = [
        MemoryField::Name,
        MemoryField::Recipe,
        MemoryField::Memory,
        MemoryField::Category,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryField::Name => "name",
            MemoryField::Recipe => "recipe",
            MemoryField::Memory => "memory",
            MemoryField::Category => "category",
        }
    }
}

impl fmt::Display for MemoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The share-form payload.  Also the shape handed to the confirmation view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MemorySubmission {
    pub name: String,
    pub recipe: String,
    pub memory: String,
    pub category: String,
    #[serde(default)]
    pub ingredients: String,
}

impl MemorySubmission {
    /// Copy of this submission with every field trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            recipe: self.recipe.trim().to_string(),
            memory: self.memory.trim().to_string(),
            category: self.category.trim().to_string(),
            ingredients: self.ingredients.trim().to_string(),
        }
    }

    fn field(&self, field: MemoryField) -> &str {
        match field {
            MemoryField::Name => &self.name,
            MemoryField::Recipe => &self.recipe,
            MemoryField::Memory => &self.memory,
            MemoryField::Category => &self.category,
        }
    }

    /// Required fields that are empty after trimming, in form order.
    pub fn missing_fields(&self) -> Vec<MemoryField> {
        MemoryField::REQUIRED
            .into_iter()
            .filter(|f| self.field(*f).trim().is_empty())
            .collect()
    }
}

/// A persisted memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    /// Creation time in milliseconds since the Unix epoch; doubles as the id.
    pub id: i64,
    pub user_name: String,
    pub recipe_name: String,
    /// The story itself.
    pub memory: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    /// Display-formatted creation date.
    pub date: String,
    /// Sortable creation timestamp (milliseconds).
    pub timestamp: i64,
}

impl MemoryRecord {
    pub fn category_label(&self) -> String {
        format_category(&self.category)
    }

    /// Full text shown when a memory card is opened.
    pub fn detail_text(&self) -> String {
        let mut text = format!(
            "Memory from {}\n\nRecipe: {}\n\nStory:\n{}\n\nCategory: {}",
            self.user_name, self.recipe_name, self.memory, self.category
        );
        if let Some(ingredients) = self.ingredients.as_deref().filter(|s| !s.is_empty()) {
            text.push_str("\nIngredients: ");
            text.push_str(ingredients);
        }
        text
    }
}

/// JSON Schema of the persisted memory collection.
pub fn memory_record_schema() -> RootSchema {
    schema_for!(Vec<MemoryRecord>)
}
