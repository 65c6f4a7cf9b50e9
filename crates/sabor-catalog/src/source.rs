//! The recipe source seam.
//!
//! The site grew two ways of loading recipes: a bundled JSON file and a
//! third-party catalog API.  They are alternative strategies, so the rest of
//! the workspace holds a single `Box<dyn RecipeSource>` and never knows which
//! one it got.

use std::path::PathBuf;

use async_trait::async_trait;
use sabor_types::{Recipe, SaborError};
use thiserror::Error;
use tracing::warn;

use crate::browse;

/// Errors raised while loading recipes or country data.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse catalog data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    BadResponse(String),
}

impl From<CatalogError> for SaborError {
    fn from(err: CatalogError) -> Self {
        SaborError::Catalog(err.to_string())
    }
}

/// A catalog of recipes.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Short label for logs and status lines.
    fn name(&self) -> &'static str;

    /// Every recipe the source offers.
    async fn recipes(&self) -> Result<Vec<Recipe>, CatalogError>;

    /// One recipe by id, `None` when unknown.
    async fn recipe(&self, id: &str) -> Result<Option<Recipe>, CatalogError>;

    /// Recipes whose title or description contains `query`.
    ///
    /// The default filters [`recipes`][RecipeSource::recipes] locally; remote
    /// sources may push the query upstream instead.
    async fn search(&self, query: &str) -> Result<Vec<Recipe>, CatalogError> {
        let all = self.recipes().await?;
        Ok(browse::search(&all, query))
    }
}

/// Load the full catalog, degrading to an empty list on any failure.
pub async fn recipes_or_empty(source: &dyn RecipeSource) -> Vec<Recipe> {
    match source.recipes().await {
        Ok(recipes) => recipes,
        Err(e) => {
            warn!(source = source.name(), error = %e, "failed to load recipes; showing none");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    #[async_trait]
    impl RecipeSource for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }
        async fn recipes(&self) -> Result<Vec<Recipe>, CatalogError> {
            Err(CatalogError::BadResponse("offline".into()))
        }
        async fn recipe(&self, _id: &str) -> Result<Option<Recipe>, CatalogError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn recipes_or_empty_swallows_failures() {
        assert!(recipes_or_empty(&Broken).await.is_empty());
    }

    #[test]
    fn catalog_error_converts_to_sabor_error() {
        let err: SaborError = CatalogError::BadResponse("boom".into()).into();
        assert!(matches!(err, SaborError::Catalog(msg) if msg.contains("boom")));
    }
}
