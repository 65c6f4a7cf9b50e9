use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Facts about the country a cuisine comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Country {
    /// Common name, e.g. `"Mexico"`.
    pub name: String,
    /// PNG flag image URL.
    pub flag_url: String,
    pub capital: Option<String>,
    pub region: String,
    /// Language names, sorted.
    pub languages: Vec<String>,
    /// Currency labels such as `"Mexican peso ($)"`, sorted.
    pub currencies: Vec<String>,
}

impl Country {
    /// One-line summary used in recipe detail views.
    pub fn summary(&self) -> String {
        let capital = self.capital.as_deref().unwrap_or("n/a");
        format!(
            "{} ({}) – capital {}, speaks {}, pays in {}",
            self.name,
            self.region,
            capital,
            list_or_na(&self.languages),
            list_or_na(&self.currencies),
        )
    }
}

fn list_or_na(items: &[String]) -> String {
    if items.is_empty() {
        "n/a".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_handles_missing_capital() {
        let c = Country {
            name: "Antarctica".into(),
            flag_url: String::new(),
            capital: None,
            region: "Antarctic".into(),
            languages: vec![],
            currencies: vec![],
        };
        let s = c.summary();
        assert!(s.contains("capital n/a"));
        assert!(s.contains("speaks n/a"));
    }
}
