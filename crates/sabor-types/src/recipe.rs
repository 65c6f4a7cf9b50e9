//! Normalized recipe model.
//!
//! The static JSON catalog and the recipe-catalog API describe the same dish
//! with different field names.  Both are adapted into [`Recipe`] by
//! `sabor-catalog`, so everything downstream handles a single shape.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which catalog a [`Recipe`] was adapted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecipeOrigin {
    /// The bundled `recipes.json` catalog.
    Static,
    /// The third-party recipe catalog API.
    MealApi,
}

/// One instruction unit in a recipe's checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Step {
    /// 1-based ordinal position; contiguous and unique within a recipe.
    pub position: u32,
    /// Instruction text.
    pub text: String,
    /// Optional duration label (e.g. `"10 min"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl Step {
    pub fn new(position: u32, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            duration: None,
        }
    }

    /// Label shown next to the step checkbox, e.g. `"Step 3"`.
    pub fn label(&self) -> String {
        format!("Step {}", self.position)
    }
}

/// An ingredient line: an amount and a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Ingredient {
    pub amount: String,
    pub name: String,
}

impl Ingredient {
    pub fn new(amount: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.amount.trim(), self.name.trim()) {
            ("", name) => write!(f, "{name}"),
            (amount, "") => write!(f, "{amount}"),
            (amount, name) => write!(f, "{amount} {name}"),
        }
    }
}

/// A recipe as every front-end sees it, regardless of the catalog it came
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Image base name (static catalog) or full thumbnail URL (API).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub category: String,
    /// Cuisine or area of origin (e.g. `"Mexican"`).
    #[serde(default)]
    pub cuisine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Cooking-time bucket used by the filter panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_context: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<Step>,
    pub origin: RecipeOrigin,
}

impl Recipe {
    /// Ranking score used by the landing-page spotlight.
    pub fn popularity(&self) -> u64 {
        self.likes.saturating_add(self.views)
    }

    /// `true` when step positions run `1..=N` without gaps or repeats.
    pub fn steps_are_contiguous(&self) -> bool {
        self.steps
            .iter()
            .enumerate()
            .all(|(i, s)| s.position as usize == i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe_with_steps(positions: &[u32]) -> Recipe {
        Recipe {
            id: "1".into(),
            title: "Flan".into(),
            description: String::new(),
            author: None,
            image: None,
            category: "dessert".into(),
            cuisine: "Spanish".into(),
            difficulty: None,
            time: None,
            total_time: None,
            servings: None,
            views: 10,
            likes: 5,
            tags: vec![],
            cultural_context: None,
            ingredients: vec![],
            steps: positions.iter().map(|p| Step::new(*p, "stir")).collect(),
            origin: RecipeOrigin::Static,
        }
    }

    #[test]
    fn ingredient_display_joins_amount_and_name() {
        assert_eq!(Ingredient::new("2 cups", "milk").to_string(), "2 cups milk");
        assert_eq!(Ingredient::new("", "salt").to_string(), "salt");
        assert_eq!(Ingredient::new(" 1 ", " ").to_string(), "1");
    }

    #[test]
    fn step_label_uses_position() {
        assert_eq!(Step::new(4, "bake").label(), "Step 4");
    }

    #[test]
    fn popularity_sums_likes_and_views() {
        assert_eq!(recipe_with_steps(&[]).popularity(), 15);
    }

    #[test]
    fn contiguous_step_positions() {
        assert!(recipe_with_steps(&[1, 2, 3]).steps_are_contiguous());
        assert!(recipe_with_steps(&[]).steps_are_contiguous());
        assert!(!recipe_with_steps(&[1, 3]).steps_are_contiguous());
        assert!(!recipe_with_steps(&[1, 1]).steps_are_contiguous());
    }

    #[test]
    fn origin_serializes_snake_case() {
        let json = serde_json::to_string(&RecipeOrigin::MealApi).unwrap();
        assert_eq!(json, "\"meal_api\"");
    }
}
