//! Recipe catalog API source.
//!
//! Talks to a TheMealDB-style JSON API:
//!
//! | call | endpoint |
//! |---|---|
//! | catalog | `GET {base}/search.php?s=` |
//! | search  | `GET {base}/search.php?s={query}` |
//! | by id   | `GET {base}/lookup.php?i={id}` |
//!
//! Every response is an envelope `{"meals": [...]}` where `null` means "no
//! results".  A meal spreads its ingredients over numbered
//! `strIngredientN` / `strMeasureN` slots (N = 1..=20), many of them blank.

use std::collections::HashMap;

use async_trait::async_trait;
use sabor_types::{Ingredient, Recipe, RecipeOrigin, Step};
use serde::Deserialize;
use tracing::debug;

use crate::source::{CatalogError, RecipeSource};

pub const DEFAULT_MEAL_API_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Number of ingredient/measure slot pairs on a meal.
pub const INGREDIENT_SLOTS: usize = 20;

const DESCRIPTION_LIMIT: usize = 140;

// ─────────────────────────────────────────────────────────────────────────────
// Raw shapes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MealEnvelope {
    meals: Option<Vec<Meal>>,
}

#[derive(Debug, Deserialize)]
struct Meal {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    title: String,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strTags", default)]
    tags: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    /// Everything else, including the numbered ingredient slots.
    #[serde(flatten)]
    slots: HashMap<String, serde_json::Value>,
}

impl Meal {
    fn slot(&self, prefix: &str, n: usize) -> &str {
        self.slots
            .get(&format!("{prefix}{n}"))
            .and_then(|v| v.as_str())
            .map(str::trim)
            .unwrap_or("")
    }

    fn ingredients(&self) -> Vec<Ingredient> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|n| {
                let name = self.slot("strIngredient", n);
                if name.is_empty() {
                    None
                } else {
                    Some(Ingredient::new(self.slot("strMeasure", n), name))
                }
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Adapter
// ─────────────────────────────────────────────────────────────────────────────

/// `true` for bare section headers such as `"STEP 2"` or `"Step 3:"`.
fn is_step_header(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    let Some(rest) = lower.strip_prefix("step") else {
        return false;
    };
    let rest = rest.trim().trim_end_matches([':', '.']);
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}

/// Drop a leading `"3."` / `"3)"` numbering prefix.
fn strip_numbering(line: &str) -> &str {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return line;
    }
    match line[digits..].strip_prefix(['.', ')']) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// Split free-text instructions into numbered steps, one per non-blank line.
pub fn split_instructions(text: &str) -> Vec<Step> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_step_header(line))
        .map(strip_numbering)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| Step::new((i + 1) as u32, line))
        .collect()
}

fn summarize(steps: &[Step]) -> String {
    let Some(first) = steps.first() else {
        return String::new();
    };
    if first.text.chars().count() <= DESCRIPTION_LIMIT {
        return first.text.clone();
    }
    let cut: String = first.text.chars().take(DESCRIPTION_LIMIT).collect();
    format!("{}…", cut.trim_end())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn from_meal(meal: Meal) -> Recipe {
    let ingredients = meal.ingredients();
    let steps = split_instructions(meal.instructions.as_deref().unwrap_or(""));
    let tags = meal
        .tags
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    Recipe {
        id: meal.id.trim().to_string(),
        title: meal.title,
        description: summarize(&steps),
        author: None,
        image: non_blank(meal.thumbnail),
        category: non_blank(meal.category).unwrap_or_default(),
        cuisine: non_blank(meal.area).unwrap_or_default(),
        difficulty: None,
        time: None,
        total_time: None,
        servings: None,
        views: 0,
        likes: 0,
        tags,
        cultural_context: None,
        ingredients,
        steps,
        origin: RecipeOrigin::MealApi,
    }
}

/// Parse one API envelope into recipes.  `{"meals": null}` yields an empty
/// list.
pub fn parse_meal_envelope(raw: &str) -> Result<Vec<Recipe>, CatalogError> {
    let envelope: MealEnvelope = serde_json::from_str(raw)?;
    Ok(envelope
        .meals
        .unwrap_or_default()
        .into_iter()
        .map(from_meal)
        .collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// MealApiSource
// ─────────────────────────────────────────────────────────────────────────────

/// [`RecipeSource`] backed by the recipe catalog API.
pub struct MealApiSource {
    base_url: String,
    client: reqwest::Client,
}

impl MealApiSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Vec<Recipe>, CatalogError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let body = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let recipes = parse_meal_envelope(&body)?;
        debug!(%url, count = recipes.len(), "fetched meals");
        Ok(recipes)
    }
}

impl Default for MealApiSource {
    fn default() -> Self {
        Self::new(DEFAULT_MEAL_API_URL)
    }
}

#[async_trait]
impl RecipeSource for MealApiSource {
    fn name(&self) -> &'static str {
        "meal-api"
    }

    async fn recipes(&self) -> Result<Vec<Recipe>, CatalogError> {
        self.fetch("search.php", &[("s", "")]).await
    }

    async fn recipe(&self, id: &str) -> Result<Option<Recipe>, CatalogError> {
        let found = self.fetch("lookup.php", &[("i", id.trim())]).await?;
        Ok(found.into_iter().next())
    }

    async fn search(&self, query: &str) -> Result<Vec<Recipe>, CatalogError> {
        self.fetch("search.php", &[("s", query.trim())]).await
    }
}
