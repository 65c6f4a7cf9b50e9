//! `sabor-catalog` – where recipes come from and how visitors browse them.
//!
//! # Modules
//!
//! - [`source`] – the [`RecipeSource`][source::RecipeSource] trait.  Exactly
//!   one implementation is active at a time; both adapt their raw records
//!   into [`Recipe`][sabor_types::Recipe].
//! - [`static_json`] – [`StaticJsonSource`][static_json::StaticJsonSource]:
//!   the bundled `recipes.json` catalog.
//! - [`meal_api`] – [`MealApiSource`][meal_api::MealApiSource]: the public
//!   recipe-catalog REST API with its numbered ingredient/measure slots.
//! - [`browse`] – search, facet filters, filter options and the landing-page
//!   spotlight.
//! - [`country`] – [`CountryClient`][country::CountryClient] and the static
//!   cuisine-to-country table used to query it.

pub mod browse;
pub mod country;
pub mod meal_api;
pub mod source;
pub mod static_json;

pub use browse::{
    capitalize, count_label, pick_spotlights, random_index, search, Facet, FilterOptions,
    FilterSelection, SPOTLIGHT_COUNT, SPOTLIGHT_POOL,
};
pub use country::{country_query_for_origin, parse_countries, CountryClient, DEFAULT_COUNTRY_API_URL};
pub use meal_api::{parse_meal_envelope, split_instructions, MealApiSource, DEFAULT_MEAL_API_URL};
pub use source::{recipes_or_empty, CatalogError, RecipeSource};
pub use static_json::{parse_static_catalog, StaticJsonSource, DEFAULT_RECIPES_PATH};
