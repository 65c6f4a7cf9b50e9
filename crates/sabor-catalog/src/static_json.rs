//! Static JSON catalog (`data/recipes.json`).
//!
//! Record shape:
//!
//! ```json
//! {
//!   "id": 1, "title": "Mole Poblano", "description": "...", "author": "Rosa",
//!   "views": 1200, "likes": 310, "tags": ["sauce"], "category": "main-course",
//!   "cuisine": "mexican", "difficulty": "hard", "time": "long",
//!   "totalTime": "3 hours", "servings": 6, "image": "mole-poblano",
//!   "culturalContext": "...",
//!   "detailedIngredients": [{ "amount": "4", "name": "ancho chiles" }],
//!   "steps": [{ "step": 1, "time": "10 min", "description": "Toast the chiles." }]
//! }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sabor_types::{Ingredient, Recipe, RecipeOrigin, Step};
use serde::Deserialize;
use tracing::debug;

use crate::source::{CatalogError, RecipeSource};

/// Default catalog location, relative to the working directory.
pub const DEFAULT_RECIPES_PATH: &str = "data/recipes.json";

// ─────────────────────────────────────────────────────────────────────────────
// Raw record shape
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawIngredient {
    #[serde(default)]
    amount: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaticRecipe {
    id: RawId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    views: u64,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    category: String,
    #[serde(default)]
    cuisine: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    total_time: Option<String>,
    #[serde(default)]
    servings: Option<u32>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    cultural_context: Option<String>,
    #[serde(default)]
    detailed_ingredients: Vec<RawIngredient>,
    #[serde(default)]
    steps: Vec<RawStep>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Adapter
// ─────────────────────────────────────────────────────────────────────────────

/// Adapt one static catalog record.  Steps are renumbered `1..=N` in file
/// order, whatever the file says.
fn from_static(raw: StaticRecipe) -> Recipe {
    let steps = raw
        .steps
        .into_iter()
        .enumerate()
        .map(|(i, s)| Step {
            position: (i + 1) as u32,
            text: s.description,
            duration: s.time.filter(|t| !t.trim().is_empty()),
        })
        .collect();
    let ingredients = raw
        .detailed_ingredients
        .into_iter()
        .filter(|i| !i.name.trim().is_empty())
        .map(|i| Ingredient::new(i.amount.trim(), i.name.trim()))
        .collect();

    Recipe {
        id: raw.id.into_string(),
        title: raw.title,
        description: raw.description,
        author: raw.author,
        image: raw.image.filter(|s| !s.is_empty()),
        category: raw.category,
        cuisine: raw.cuisine,
        difficulty: raw.difficulty,
        time: raw.time,
        total_time: raw.total_time,
        servings: raw.servings,
        views: raw.views,
        likes: raw.likes,
        tags: raw.tags,
        cultural_context: raw.cultural_context.filter(|s| !s.trim().is_empty()),
        ingredients,
        steps,
        origin: RecipeOrigin::Static,
    }
}

/// Parse a whole static catalog document.
pub fn parse_static_catalog(raw: &str) -> Result<Vec<Recipe>, CatalogError> {
    let records: Vec<StaticRecipe> = serde_json::from_str(raw)?;
    Ok(records.into_iter().map(from_static).collect())
}

/// Ids in the static catalog are numbers; `"007"` and `"7"` name the same
/// recipe.
fn ids_match(recipe_id: &str, wanted: &str) -> bool {
    let wanted = wanted.trim();
    if recipe_id == wanted {
        return true;
    }
    match (recipe_id.parse::<u64>(), wanted.parse::<u64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StaticJsonSource
// ─────────────────────────────────────────────────────────────────────────────

/// [`RecipeSource`] reading a JSON file on every call.
#[derive(Debug, Clone)]
pub struct StaticJsonSource {
    path: PathBuf,
}

impl StaticJsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for StaticJsonSource {
    fn default() -> Self {
        Self::new(DEFAULT_RECIPES_PATH)
    }
}

#[async_trait]
impl RecipeSource for StaticJsonSource {
    fn name(&self) -> &'static str {
        "static-json"
    }

    async fn recipes(&self) -> Result<Vec<Recipe>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;
        let recipes = parse_static_catalog(&raw)?;
        debug!(path = %self.path.display(), count = recipes.len(), "loaded static catalog");
        Ok(recipes)
    }

    async fn recipe(&self, id: &str) -> Result<Option<Recipe>, CatalogError> {
        let recipes = self.recipes().await?;
        Ok(recipes.into_iter().find(|r| ids_match(&r.id, id)))
    }
}
