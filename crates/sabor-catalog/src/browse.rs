//! Browse operations over an already-loaded catalog.
//!
//! Everything here is a pure function of its inputs, except the production
//! randomness behind [`random_index`].

use std::collections::BTreeSet;
use std::str::FromStr;

use sabor_types::Recipe;
use uuid::Uuid;

/// Spotlight cards on the landing page.
pub const SPOTLIGHT_COUNT: usize = 3;
/// Most popular recipes the spotlight draws from.
pub const SPOTLIGHT_POOL: usize = 8;

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

/// Case-insensitive substring search on title or description.
///
/// A blank query returns the whole catalog.
pub fn search(recipes: &[Recipe], query: &str) -> Vec<Recipe> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return recipes.to_vec();
    }
    recipes
        .iter()
        .filter(|r| {
            r.title.to_lowercase().contains(&query)
                || r.description.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Filters
// ─────────────────────────────────────────────────────────────────────────────

/// A filterable recipe attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Category,
    Cuisine,
    Difficulty,
    Time,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Category, Facet::Cuisine, Facet::Difficulty, Facet::Time];

    pub fn label(&self) -> &'static str {
        match self {
            Facet::Category => "Category",
            Facet::Cuisine => "Cuisine",
            Facet::Difficulty => "Difficulty",
            Facet::Time => "Cooking Time",
        }
    }

    fn value<'a>(&self, recipe: &'a Recipe) -> Option<&'a str> {
        match self {
            Facet::Category => Some(recipe.category.as_str()),
            Facet::Cuisine => Some(recipe.cuisine.as_str()),
            Facet::Difficulty => recipe.difficulty.as_deref(),
            Facet::Time => recipe.time.as_deref(),
        }
    }
}

impl FromStr for Facet {
    type Err = String;

    /// Accepts facet names and filter-panel labels (`"cooking time"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s.contains("category") {
            Ok(Facet::Category)
        } else if s.contains("cuisine") {
            Ok(Facet::Cuisine)
        } else if s.contains("difficulty") {
            Ok(Facet::Difficulty)
        } else if s == "time" || s.contains("cooking time") {
            Ok(Facet::Time)
        } else {
            Err(format!("unknown filter facet: {s}"))
        }
    }
}

/// Accepted values per facet.  An empty facet accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub category: Vec<String>,
    pub cuisine: Vec<String>,
    pub difficulty: Vec<String>,
    pub time: Vec<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values accepted for `facet`; empty means "any".
    pub fn for_facet(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Category => &self.category,
            Facet::Cuisine => &self.cuisine,
            Facet::Difficulty => &self.difficulty,
            Facet::Time => &self.time,
        }
    }

    fn values_mut(&mut self, facet: Facet) -> &mut Vec<String> {
        match facet {
            Facet::Category => &mut self.category,
            Facet::Cuisine => &mut self.cuisine,
            Facet::Difficulty => &mut self.difficulty,
            Facet::Time => &mut self.time,
        }
    }

    /// Accept `value` for `facet` (checking one more box).
    pub fn select(&mut self, facet: Facet, value: impl Into<String>) {
        let value = value.into();
        let values = self.values_mut(facet);
        if !values.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
            values.push(value);
        }
    }

    /// Uncheck every box.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|f| self.for_facet(*f).is_empty())
    }

    /// `true` when every facet accepts `recipe`.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        Facet::ALL.iter().all(|facet| {
            let accepted = self.for_facet(*facet);
            if accepted.is_empty() {
                return true;
            }
            match facet.value(recipe) {
                Some(v) => accepted.iter().any(|a| a.eq_ignore_ascii_case(v)),
                None => false,
            }
        })
    }

    pub fn apply(&self, recipes: &[Recipe]) -> Vec<Recipe> {
        recipes.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Distinct facet values present in a catalog, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub cuisines: Vec<String>,
    pub difficulties: Vec<String>,
    pub times: Vec<String>,
}

impl FilterOptions {
    pub fn from_recipes(recipes: &[Recipe]) -> Self {
        Self {
            categories: distinct(recipes, Facet::Category),
            cuisines: distinct(recipes, Facet::Cuisine),
            difficulties: distinct(recipes, Facet::Difficulty),
            times: distinct(recipes, Facet::Time),
        }
    }

    pub fn for_facet(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Category => &self.categories,
            Facet::Cuisine => &self.cuisines,
            Facet::Difficulty => &self.difficulties,
            Facet::Time => &self.times,
        }
    }
}

fn distinct(recipes: &[Recipe], facet: Facet) -> Vec<String> {
    let mut seen = BTreeSet::new();
    recipes
        .iter()
        .filter_map(|r| facet.value(r))
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(v.to_string()))
        .map(str::to_string)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Spotlight
// ─────────────────────────────────────────────────────────────────────────────

/// Uniform-ish index in `0..bound` drawn from UUID v4 randomness.
pub fn random_index(bound: usize) -> usize {
    if bound == 0 {
        return 0;
    }
    (Uuid::new_v4().as_u128() % bound as u128) as usize
}

/// Feature `count` recipes picked at random among the `pool_size` most
/// popular (likes + views).
///
/// `pick(bound)` must return an index in `0..bound`; it drives a
/// Fisher–Yates shuffle of the pool.
pub fn pick_spotlights(
    recipes: &[Recipe],
    count: usize,
    pool_size: usize,
    mut pick: impl FnMut(usize) -> usize,
) -> Vec<Recipe> {
    let mut pool = recipes.to_vec();
    pool.sort_by_key(|r| std::cmp::Reverse(r.popularity()));
    pool.truncate(pool_size);
    for i in (1..pool.len()).rev() {
        let j = pick(i + 1) % (i + 1);
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}

// ─────────────────────────────────────────────────────────────────────────────
// Labels
// ─────────────────────────────────────────────────────────────────────────────

/// `"3 of 12 recipes"`.
pub fn count_label(shown: usize, total: usize) -> String {
    format!("{shown} of {total} recipes")
}

/// Upper-case the first character: `"mexican"` → `"Mexican"`.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
