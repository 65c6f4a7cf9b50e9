//! `sabor-types` – shared vocabulary for the Sabor de Casa crates.
//!
//! - [`recipe`] – the normalized [`Recipe`] shape every catalog source is
//!   adapted into, plus its [`Step`] and [`Ingredient`] children.
//! - [`memory`] – user-submitted [`MemoryRecord`]s and the
//!   [`MemorySubmission`] form payload they are built from.
//! - [`country`] – the [`Country`] facts shown next to a recipe's cuisine.

pub mod country;
pub mod memory;
pub mod recipe;

pub use country::Country;
pub use memory::{
    format_category, format_display_date, memory_record_schema, MemoryField, MemoryRecord,
    MemorySubmission, CATEGORIES,
};
pub use recipe::{Ingredient, Recipe, RecipeOrigin, Step};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Umbrella error surfaced to front-ends.
///
/// Each library crate keeps its own detailed error enum and converts into this
/// one at the boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaborError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Memory not found: {0}")]
    MemoryNotFound(i64),

    #[error("Please fill in all required fields: {}", join_fields(.0))]
    InvalidSubmission(Vec<MemoryField>),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Cooking session error: {0}")]
    Session(String),
}

fn join_fields(fields: &[MemoryField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_submission_lists_every_field() {
        let err = SaborError::InvalidSubmission(vec![MemoryField::Name, MemoryField::Category]);
        let msg = err.to_string();
        assert!(msg.contains("name"));
        assert!(msg.contains("category"));
    }

    #[test]
    fn sabor_error_display() {
        let err = SaborError::RecipeNotFound("52772".to_string());
        assert!(err.to_string().contains("52772"));

        let err = SaborError::MemoryNotFound(1_700_000_000_000);
        assert!(err.to_string().contains("1700000000000"));
    }

    #[test]
    fn sabor_error_serializes() {
        let err = SaborError::Storage("disk full".to_string());
        let json = serde_json::to_string(&err).unwrap();
        let back: SaborError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
