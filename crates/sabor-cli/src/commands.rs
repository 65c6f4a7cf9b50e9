//! Parsing of REPL input.  Everything here is pure so it can be tested
//! without a terminal.

use std::str::FromStr;

use sabor_catalog::{Facet, FilterSelection};
use sabor_types::CATEGORIES;

/// A top-level slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Recipes,
    Search(String),
    Filter(FilterSelection),
    ClearFilters,
    Filters,
    Spotlight,
    Recipe(String),
    Cook(String),
    Share,
    Thanks,
    Memories,
    Memory(i64),
    Schema,
    Quit,
    /// Known command, bad arguments.
    Usage(&'static str),
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "/help" => Command::Help,
        "/recipes" => Command::Recipes,
        "/search" => Command::Search(rest.to_string()),
        "/filter" if rest.is_empty() => Command::Usage("/filter <facet>=<value>[,<value>] ... | /filter clear"),
        "/filter" if rest.eq_ignore_ascii_case("clear") => Command::ClearFilters,
        "/filter" => match parse_filter_args(rest) {
            Ok(selection) => Command::Filter(selection),
            Err(_) => Command::Usage("/filter <facet>=<value>[,<value>] ... | /filter clear"),
        },
        "/filters" => Command::Filters,
        "/spotlight" => Command::Spotlight,
        "/recipe" if rest.is_empty() => Command::Usage("/recipe <id>"),
        "/recipe" => Command::Recipe(rest.to_string()),
        "/cook" if rest.is_empty() => Command::Usage("/cook <id>"),
        "/cook" => Command::Cook(rest.to_string()),
        "/share" => Command::Share,
        "/thanks" => Command::Thanks,
        "/memories" => Command::Memories,
        "/memory" => match rest.parse::<i64>() {
            Ok(id) => Command::Memory(id),
            Err(_) => Command::Usage("/memory <id>"),
        },
        "/schema" => Command::Schema,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Parse `category=dessert,beverage cuisine=mexican` into a selection.
///
/// Facet names follow [`Facet`]'s parser; `cooking-time` is accepted for
/// the time facet.
pub fn parse_filter_args(args: &str) -> Result<FilterSelection, String> {
    let mut selection = FilterSelection::new();
    for pair in args.split_whitespace() {
        let (facet, values) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected <facet>=<value>, got '{pair}'"))?;
        let facet = Facet::from_str(&facet.replace(['-', '_'], " "))?;
        for value in values.split(',').map(str::trim).filter(|v| !v.is_empty()) {
            selection.select(facet, value);
        }
    }
    if selection.is_empty() {
        return Err("no filter values given".to_string());
    }
    Ok(selection)
}

/// A command inside the `/cook` sub-prompt.  Numbers are 1-based on input
/// and stored 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookCommand {
    Check(usize),
    Uncheck(usize),
    Ingredient(usize),
    Next,
    Prev,
    Status,
    Reset,
    Done,
    Help,
    Usage(&'static str),
    Unknown,
}

fn one_based(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0).map(|n| n - 1)
}

pub fn parse_cook_command(line: &str) -> CookCommand {
    let line = line.trim().to_lowercase();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest),
        None => (line.as_str(), ""),
    };
    match head {
        "check" | "c" => one_based(rest).map_or(CookCommand::Usage("check <step>"), CookCommand::Check),
        "uncheck" | "u" => {
            one_based(rest).map_or(CookCommand::Usage("uncheck <step>"), CookCommand::Uncheck)
        }
        "ing" | "i" => {
            one_based(rest).map_or(CookCommand::Usage("ing <ingredient>"), CookCommand::Ingredient)
        }
        "next" | "n" => CookCommand::Next,
        "prev" | "p" => CookCommand::Prev,
        "status" | "s" => CookCommand::Status,
        "reset" => CookCommand::Reset,
        "done" | "back" | "quit" => CookCommand::Done,
        "help" | "?" => CookCommand::Help,
        _ => CookCommand::Unknown,
    }
}

/// Accept a category by menu number (`"3"`) or slug; anything else is
/// kept verbatim.
pub fn parse_category(input: &str) -> String {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>()
        && let Some((slug, _)) = n.checked_sub(1).and_then(|i| CATEGORIES.get(i))
    {
        return (*slug).to_string();
    }
    input.to_string()
}
