//! Country facts for a recipe's cuisine.
//!
//! Recipes name their origin with an adjective ("Mexican", "British") while
//! the country API wants a country name.  [`country_query_for_origin`] bridges
//! the two with a static table; origins not in the table are sent as-is.

use std::collections::BTreeMap;

use reqwest::{StatusCode, Url};
use sabor_types::Country;
use serde::Deserialize;
use tracing::debug;

use crate::source::CatalogError;

pub const DEFAULT_COUNTRY_API_URL: &str = "https://restcountries.com/v3.1";

const FIELDS: &str = "name,flags,capital,region,languages,currencies";

/// Cuisine adjective → country name, for origins whose name differs from the
/// country's.
const ORIGIN_TO_COUNTRY: &[(&str, &str)] = &[
    ("american", "United States"),
    ("argentinian", "Argentina"),
    ("british", "United Kingdom"),
    ("canadian", "Canada"),
    ("chinese", "China"),
    ("croatian", "Croatia"),
    ("dutch", "Netherlands"),
    ("egyptian", "Egypt"),
    ("filipino", "Philippines"),
    ("french", "France"),
    ("greek", "Greece"),
    ("indian", "India"),
    ("irish", "Ireland"),
    ("italian", "Italy"),
    ("jamaican", "Jamaica"),
    ("japanese", "Japan"),
    ("kenyan", "Kenya"),
    ("malaysian", "Malaysia"),
    ("mexican", "Mexico"),
    ("moroccan", "Morocco"),
    ("peruvian", "Peru"),
    ("polish", "Poland"),
    ("portuguese", "Portugal"),
    ("russian", "Russia"),
    ("spanish", "Spain"),
    ("thai", "Thailand"),
    ("tunisian", "Tunisia"),
    ("turkish", "Turkey"),
    ("ukrainian", "Ukraine"),
    ("uruguayan", "Uruguay"),
    ("vietnamese", "Vietnam"),
];

/// Country-name query for a cuisine origin.
///
/// Returns `None` for blank origins and the catalog's `"Unknown"` area.
pub fn country_query_for_origin(origin: &str) -> Option<String> {
    let origin = origin.trim();
    if origin.is_empty() || origin.eq_ignore_ascii_case("unknown") {
        return None;
    }
    let key = origin.to_lowercase();
    let mapped = ORIGIN_TO_COUNTRY
        .iter()
        .find(|(adjective, _)| *adjective == key)
        .map(|(_, country)| (*country).to_string());
    Some(mapped.unwrap_or_else(|| origin.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw response shape
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawName {
    common: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawFlags {
    #[serde(default)]
    png: String,
}

#[derive(Debug, Deserialize)]
struct RawCurrency {
    name: String,
    #[serde(default)]
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    name: RawName,
    #[serde(default)]
    flags: RawFlags,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    region: String,
    #[serde(default)]
    languages: BTreeMap<String, String>,
    #[serde(default)]
    currencies: BTreeMap<String, RawCurrency>,
}

impl From<RawCountry> for Country {
    fn from(raw: RawCountry) -> Self {
        let mut languages: Vec<String> = raw.languages.into_values().collect();
        languages.sort();
        let mut currencies: Vec<String> = raw
            .currencies
            .into_values()
            .map(|c| match c.symbol.filter(|s| !s.is_empty()) {
                Some(symbol) => format!("{} ({})", c.name, symbol),
                None => c.name,
            })
            .collect();
        currencies.sort();
        Country {
            name: raw.name.common,
            flag_url: raw.flags.png,
            capital: raw.capital.into_iter().next(),
            region: raw.region,
            languages,
            currencies,
        }
    }
}

/// Parse a country API response body; the first entry wins.
pub fn parse_countries(raw: &str) -> Result<Option<Country>, CatalogError> {
    let countries: Vec<RawCountry> = serde_json::from_str(raw)?;
    Ok(countries.into_iter().next().map(Country::from))
}

// ─────────────────────────────────────────────────────────────────────────────
// CountryClient
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the country lookup API.
pub struct CountryClient {
    base_url: String,
    client: reqwest::Client,
}

impl CountryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn name_url(&self, query: &str) -> Result<Url, CatalogError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CatalogError::BadResponse(format!("invalid country API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::BadResponse("country API URL cannot be a base".into()))?
            .pop_if_empty()
            .push("name")
            .push(query);
        url.query_pairs_mut().append_pair("fields", FIELDS);
        Ok(url)
    }

    /// Look up the country behind a cuisine origin.
    ///
    /// `Ok(None)` when the origin is blank or unknown, or the API has no
    /// match.
    pub async fn lookup(&self, origin: &str) -> Result<Option<Country>, CatalogError> {
        let Some(query) = country_query_for_origin(origin) else {
            return Ok(None);
        };
        let url = self.name_url(&query)?;
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(%query, "no country match");
            return Ok(None);
        }
        let body = response.error_for_status()?.text().await?;
        parse_countries(&body)
    }
}

impl Default for CountryClient {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY_API_URL)
    }
}
