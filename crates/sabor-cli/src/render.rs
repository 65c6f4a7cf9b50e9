//! Terminal rendering of recipes, memories and cooking progress.

use colored::Colorize;
use sabor_catalog::{capitalize, Facet, FilterOptions, FilterSelection};
use sabor_types::{Country, MemoryRecord, Recipe};

const BAR_WIDTH: usize = 20;

/// `[########............]  40%`
pub fn progress_bar(percentage: f64) -> String {
    let pct = percentage.clamp(0.0, 100.0);
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        pct
    )
}

/// One line per recipe in listings.
pub fn recipe_line(recipe: &Recipe) -> String {
    let mut facets = vec![capitalize(&recipe.category), capitalize(&recipe.cuisine)];
    if let Some(difficulty) = &recipe.difficulty {
        facets.push(capitalize(difficulty));
    }
    facets.retain(|f| !f.is_empty());
    format!(
        "  {} {}  {}",
        format!("[{}]", recipe.id).dimmed(),
        recipe.title.bold(),
        facets.join(" · ").dimmed()
    )
}

pub fn recipe_detail(recipe: &Recipe, country: Option<&Country>) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", recipe.title.bold().underline()));
    if let Some(author) = &recipe.author {
        out.push_str(&format!("  by {author}\n"));
    }
    if !recipe.description.is_empty() {
        out.push_str(&format!("  {}\n", recipe.description));
    }

    let mut facts = Vec::new();
    if let Some(total) = &recipe.total_time {
        facts.push(format!("Time: {total}"));
    }
    if let Some(servings) = recipe.servings {
        facts.push(format!("Serves: {servings}"));
    }
    if let Some(difficulty) = &recipe.difficulty {
        facts.push(format!("Difficulty: {}", capitalize(difficulty)));
    }
    if !facts.is_empty() {
        out.push_str(&format!("  {}\n", facts.join("  |  ").dimmed()));
    }
    if !recipe.tags.is_empty() {
        out.push_str(&format!("  Tags: {}\n", recipe.tags.join(", ")));
    }

    out.push_str(&format!("\n{}\n", "Ingredients".bold()));
    if recipe.ingredients.is_empty() {
        out.push_str("  (none listed)\n");
    }
    for (i, ingredient) in recipe.ingredients.iter().enumerate() {
        out.push_str(&format!("  {:>2}. {}\n", i + 1, ingredient));
    }

    out.push_str(&format!("\n{}\n", "Instructions".bold()));
    if recipe.steps.is_empty() {
        out.push_str("  (no steps)\n");
    }
    for step in &recipe.steps {
        match &step.duration {
            Some(d) => out.push_str(&format!("  {} ({}) {}\n", step.label().cyan(), d, step.text)),
            None => out.push_str(&format!("  {} {}\n", step.label().cyan(), step.text)),
        }
    }

    if let Some(context) = &recipe.cultural_context {
        out.push_str(&format!("\n{}\n  {}\n", "Cultural context".bold(), context));
    }
    if let Some(country) = country {
        out.push_str(&format!("\n{}\n  {}\n", "Where it comes from".bold(), country.summary()));
        if !country.flag_url.is_empty() {
            out.push_str(&format!("  Flag: {}\n", country.flag_url.dimmed()));
        }
    }
    out
}

pub fn filter_options(options: &FilterOptions) -> String {
    let mut out = String::new();
    for facet in Facet::ALL {
        let values = options.for_facet(facet);
        let listed = if values.is_empty() {
            "(none)".to_string()
        } else {
            values.join(", ")
        };
        out.push_str(&format!("  {:<13} {}\n", format!("{}:", facet.label()).bold(), listed));
    }
    out
}

/// `Category: dessert, beverage · Cooking Time: quick`; facets without a
/// selection are left out.
pub fn active_filters(selection: &FilterSelection) -> String {
    Facet::ALL
        .into_iter()
        .filter(|facet| !selection.for_facet(*facet).is_empty())
        .map(|facet| format!("{}: {}", facet.label().bold(), selection.for_facet(facet).join(", ")))
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Memory card: `"Flan" – Ana (Dessert, Oct 19, 2026)` plus an excerpt.
pub fn memory_card(record: &MemoryRecord) -> String {
    let excerpt: String = record.memory.chars().take(80).collect();
    let ellipsis = if record.memory.chars().count() > 80 { "…" } else { "" };
    format!(
        "  {} \"{}\" – {} ({}, {})\n      {}{}",
        format!("[{}]", record.id).dimmed(),
        record.recipe_name.bold(),
        record.user_name,
        record.category_label(),
        record.date,
        excerpt.italic(),
        ellipsis
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        colored::control::set_override(false);
        assert_eq!(progress_bar(0.0), "[....................]   0%");
        assert_eq!(progress_bar(80.0), "[################....]  80%");
        assert_eq!(progress_bar(100.0), "[####################] 100%");
        assert_eq!(progress_bar(250.0), "[####################] 100%");
    }

    #[test]
    fn active_filters_lists_only_selected_facets() {
        colored::control::set_override(false);
        let mut selection = FilterSelection::new();
        assert_eq!(active_filters(&selection), "");

        selection.select(Facet::Category, "dessert");
        selection.select(Facet::Category, "beverage");
        selection.select(Facet::Time, "quick");
        assert_eq!(
            active_filters(&selection),
            "Category: dessert, beverage · Cooking Time: quick"
        );
    }

    #[test]
    fn memory_card_truncates_long_stories() {
        colored::control::set_override(false);
        let record = MemoryRecord {
            id: 1,
            user_name: "Ana".into(),
            recipe_name: "Flan".into(),
            memory: "x".repeat(100),
            category: "dessert".into(),
            ingredients: None,
            date: "Oct 19, 2026".into(),
            timestamp: 1,
        };
        let card = memory_card(&record);
        assert!(card.contains("\"Flan\" – Ana (Dessert, Oct 19, 2026)"));
        assert!(card.ends_with(&format!("{}…", "x".repeat(80))));
    }
}
