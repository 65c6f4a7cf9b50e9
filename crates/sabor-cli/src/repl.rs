//! REPL – Read-Eval-Print Loop for the Sabor de Casa shell.
//!
//! Supported slash-commands:
//!   /help                 – show this list
//!   /recipes              – list recipes (current filters applied)
//!   /search <text>        – search titles and descriptions
//!   /filter <f>=<v>,...   – set filters; `/filter clear` removes them
//!   /filters              – show the available filter values
//!   /spotlight            – a few popular recipes, picked at random
//!   /recipe <id>          – full recipe with country facts
//!   /cook <id>            – step-by-step cooking with progress tracking
//!   /share                – share a memory about a recipe
//!   /thanks               – show the last shared memory
//!   /memories             – list shared memories, newest first
//!   /memory <id>          – open one memory
//!   /schema               – JSON Schema of the stored memories
//!   /quit | /exit         – exit

use colored::Colorize;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sabor_catalog::{
    count_label, pick_spotlights, random_index, recipes_or_empty, CountryClient, FilterOptions,
    FilterSelection, MealApiSource, RecipeSource, StaticJsonSource, SPOTLIGHT_COUNT,
    SPOTLIGHT_POOL,
};
use sabor_memory::{
    FileBackend, InMemoryBackend, MemoryError, MemoryStore, SessionHandoff, SqliteBackend,
    StorageBackend, StorageError,
};
use sabor_runtime::{CookingSession, SessionEvent, ShareFlow};
use sabor_types::{memory_record_schema, MemorySubmission, SaborError, CATEGORIES};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::commands::{parse_category, parse_command, parse_cook_command, Command, CookCommand};
use crate::config::{Config, DataSource, StorageKind};
use crate::render;

// ─────────────────────────────────────────────────────────────────────────────
// Shutdown flag
// ─────────────────────────────────────────────────────────────────────────────

/// Set from the Ctrl-C handler thread; wakes whichever prompt is waiting.
#[derive(Default)]
pub struct Shutdown {
    flag: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        if !self.is_set() {
            self.notify.notified().await;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Input
// ─────────────────────────────────────────────────────────────────────────────

struct Input {
    lines: Lines<BufReader<Stdin>>,
    shutdown: Arc<Shutdown>,
}

impl Input {
    fn new(shutdown: Arc<Shutdown>) -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            shutdown,
        }
    }

    /// Print `prompt` and read one line.  `None` on EOF, read error or
    /// shutdown.
    async fn read_line(&mut self, prompt: &str) -> Option<String> {
        print_prompt(prompt);
        tokio::select! {
            _ = self.shutdown.wait() => None,
            line = self.lines.next_line() => match line {
                Ok(line) => line,
                Err(e) => {
                    eprintln!("{}: {}", "Read error".red(), e);
                    None
                }
            },
        }
    }

    /// Like [`read_line`][Self::read_line] but falls back to `default` on an
    /// empty answer.
    async fn prompt_str(&mut self, prompt: &str, default: &str) -> Option<String> {
        let line = self.read_line(prompt).await?;
        let trimmed = line.trim();
        Some(if trimmed.is_empty() { default.to_string() } else { trimmed.to_string() })
    }
}

fn print_prompt(prompt: &str) {
    print!("{} ", prompt);
    io::stdout().flush().ok();
}

/// Whether a prompt is sitting on the current terminal line.  Output that
/// arrives while waiting for input takes over that line instead of leaving
/// an empty prompt behind.
#[derive(Debug, Default)]
struct PromptLine {
    shown: bool,
}

impl PromptLine {
    /// Prompt text to print before reading, `None` if it is already up.
    fn show(&mut self, prompt: &str) -> Option<String> {
        if self.shown {
            return None;
        }
        self.shown = true;
        Some(format!("{prompt} "))
    }

    /// Prefix for asynchronous output: erases a visible prompt.
    fn take_over(&mut self) -> &'static str {
        if std::mem::take(&mut self.shown) { "\r\x1b[2K" } else { "" }
    }

    /// The user pressed Enter, so the cursor is on a fresh line.
    fn submitted(&mut self) {
        self.shown = false;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App state
// ─────────────────────────────────────────────────────────────────────────────

type Store = Box<dyn StorageBackend>;

pub struct App {
    cfg: Config,
    source: Box<dyn RecipeSource>,
    countries: CountryClient,
    share: ShareFlow<Store, InMemoryBackend>,
    filters: FilterSelection,
}

fn build_source(cfg: &Config) -> Box<dyn RecipeSource> {
    match cfg.data_source {
        DataSource::Static => Box::new(StaticJsonSource::new(&cfg.recipes_path)),
        DataSource::MealDb => Box::new(MealApiSource::new(cfg.meal_api_url.clone())),
    }
}

fn open_storage(cfg: &Config) -> Result<Store, StorageError> {
    let location = cfg.storage_location();
    let backend: Store = match cfg.storage {
        StorageKind::File => Box::new(FileBackend::open(&location)?),
        StorageKind::Sqlite => {
            if let Some(parent) = location.parent() {
                std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            Box::new(SqliteBackend::open(&location.to_string_lossy())?)
        }
        StorageKind::Memory => Box::new(InMemoryBackend::new()),
    };
    Ok(backend)
}

impl App {
    pub fn new(cfg: Config) -> Self {
        let backend = open_storage(&cfg).unwrap_or_else(|e| {
            warn!(error = %e, storage = %cfg.storage, "memory storage unavailable; keeping memories in memory only");
            Box::new(InMemoryBackend::new()) as Store
        });
        let share = ShareFlow::new(
            MemoryStore::new(backend),
            SessionHandoff::new(InMemoryBackend::new()),
            cfg.save_delay(),
        );
        info!(source = %cfg.data_source, storage = %cfg.storage, "app ready");
        Self {
            source: build_source(&cfg),
            countries: CountryClient::new(cfg.country_api_url.clone()),
            share,
            filters: FilterSelection::new(),
            cfg,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main loop
// ─────────────────────────────────────────────────────────────────────────────

/// Entry point for the interactive REPL.  Returns on `/quit`, EOF or
/// shutdown.
pub async fn run(app: &mut App, shutdown: Arc<Shutdown>) {
    let mut input = Input::new(shutdown.clone());

    loop {
        if shutdown.is_set() {
            break;
        }
        let prompt = "sabor>".bold().cyan().to_string();
        let Some(line) = input.read_line(&prompt).await else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let result = match parse_command(&line) {
            Command::Help => {
                cmd_help();
                Ok(())
            }
            Command::Recipes => cmd_recipes(app).await,
            Command::Search(query) => cmd_search(app, &query).await,
            Command::Filter(selection) => {
                app.filters = selection;
                cmd_recipes(app).await
            }
            Command::ClearFilters => {
                app.filters.clear();
                println!("{}", "Filters cleared.".green());
                Ok(())
            }
            Command::Filters => cmd_filters(app).await,
            Command::Spotlight => cmd_spotlight(app).await,
            Command::Recipe(id) => cmd_recipe(app, &id).await,
            Command::Cook(id) => cmd_cook(app, &mut input, &id).await,
            Command::Share => cmd_share(app, &mut input).await,
            Command::Thanks => {
                cmd_thanks(app);
                Ok(())
            }
            Command::Memories => {
                cmd_memories(app);
                Ok(())
            }
            Command::Memory(id) => cmd_memory(app, id),
            Command::Schema => cmd_schema(),
            Command::Quit => {
                println!("{}", "¡Buen provecho! Goodbye.".green());
                break;
            }
            Command::Usage(usage) => {
                println!("{} {}", "Usage:".yellow(), usage);
                Ok(())
            }
            Command::Unknown(other) => {
                println!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "/help".bold()
                );
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{} {}", "✗".red().bold(), e);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help() {
    println!();
    println!("{}", "Sabor de Casa Commands".bold().underline());
    println!("  {}           – list recipes", "/recipes".bold().cyan());
    println!("  {}     – search titles and descriptions", "/search <text>".bold().cyan());
    println!("  {} – e.g. /filter category=dessert cuisine=mexican", "/filter <f>=<v>,..".bold().cyan());
    println!("  {}      – remove all filters", "/filter clear".bold().cyan());
    println!("  {}           – available filter values", "/filters".bold().cyan());
    println!("  {}         – a few popular picks", "/spotlight".bold().cyan());
    println!("  {}       – full recipe", "/recipe <id>".bold().cyan());
    println!("  {}         – cook step by step", "/cook <id>".bold().cyan());
    println!("  {}             – share a memory", "/share".bold().cyan());
    println!("  {}            – your last shared memory", "/thanks".bold().cyan());
    println!("  {}          – shared memories", "/memories".bold().cyan());
    println!("  {}       – open one memory", "/memory <id>".bold().cyan());
    println!("  {}            – JSON Schema of stored memories", "/schema".bold().cyan());
    println!("  {}       – exit", "/quit  /exit".bold().cyan());
    println!();
}

async fn cmd_recipes(app: &App) -> Result<(), SaborError> {
    let all = recipes_or_empty(app.source.as_ref()).await;
    let shown = app.filters.apply(&all);
    print_recipe_list(&shown, all.len());
    Ok(())
}

async fn cmd_search(app: &App, query: &str) -> Result<(), SaborError> {
    let hits = match app.source.search(query).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!(error = %e, %query, "search failed; showing no results");
            Vec::new()
        }
    };
    let shown = app.filters.apply(&hits);
    print_recipe_list(&shown, hits.len());
    Ok(())
}

fn print_recipe_list(shown: &[sabor_types::Recipe], total: usize) {
    println!();
    if shown.is_empty() {
        println!("  {}", "No recipes found.".dimmed());
    }
    for recipe in shown {
        println!("{}", render::recipe_line(recipe));
    }
    println!("\n  {}\n", count_label(shown.len(), total).dimmed());
}

async fn cmd_filters(app: &App) -> Result<(), SaborError> {
    let all = recipes_or_empty(app.source.as_ref()).await;
    let options = FilterOptions::from_recipes(&all);
    println!();
    print!("{}", render::filter_options(&options));
    if !app.filters.is_empty() {
        println!("\n  {} {}", "Active:".bold(), render::active_filters(&app.filters));
    }
    println!();
    Ok(())
}

async fn cmd_spotlight(app: &App) -> Result<(), SaborError> {
    let all = recipes_or_empty(app.source.as_ref()).await;
    let picks = pick_spotlights(&all, SPOTLIGHT_COUNT, SPOTLIGHT_POOL, random_index);
    println!("\n{}", "Spotlight".bold().underline());
    if picks.is_empty() {
        println!("  {}", "Nothing to feature yet.".dimmed());
    }
    for recipe in &picks {
        println!("{}", render::recipe_line(recipe));
    }
    println!();
    Ok(())
}

async fn find_recipe(app: &App, id: &str) -> Result<sabor_types::Recipe, SaborError> {
    app.source
        .recipe(id)
        .await?
        .ok_or_else(|| SaborError::RecipeNotFound(id.to_string()))
}

async fn cmd_recipe(app: &App, id: &str) -> Result<(), SaborError> {
    let recipe = find_recipe(app, id).await?;
    let country = match app.countries.lookup(&recipe.cuisine).await {
        Ok(country) => country,
        Err(e) => {
            warn!(error = %e, cuisine = %recipe.cuisine, "country lookup failed");
            None
        }
    };
    print!("{}", render::recipe_detail(&recipe, country.as_ref()));
    println!();
    Ok(())
}

// ── /cook ────────────────────────────────────────────────────────────────────

fn print_cook_help() {
    println!(
        "  {}  check N · uncheck N · ing N · next · prev · status · reset · done",
        "Commands:".dimmed()
    );
}

fn print_cook_status(session: &CookingSession) {
    session.with_tracker(|tracker| {
        println!("\n  {}  {}", render::progress_bar(tracker.percentage()), tracker.current_step_label());
        for (i, step) in tracker.steps().iter().enumerate() {
            let mark = if tracker.is_completed(i) { "[x]".green() } else { "[ ]".normal() };
            let pointer = if i == tracker.active() { "▶".cyan() } else { " ".normal() };
            println!("  {} {} {} {}", pointer, mark, step.label().bold(), step.text);
        }
    });
    let ingredients = session.ingredients();
    if ingredients.total() > 0 {
        println!(
            "\n  {} {}/{}",
            "Ingredients ready:".bold(),
            ingredients.prepared_count(),
            ingredients.total()
        );
        for (i, item) in ingredients.items().iter().enumerate() {
            let mark = if ingredients.is_checked(i) { "[x]".green() } else { "[ ]".normal() };
            println!("    {} {:>2}. {}", mark, i + 1, item);
        }
    }
    println!();
}

fn print_session_event(session: &CookingSession, event: &SessionEvent) {
    match event {
        SessionEvent::Progress { percentage, label } => {
            println!("  {}  {}", render::progress_bar(*percentage), label);
        }
        SessionEvent::ActiveStepChanged { index, indicator, .. } => {
            let text = session.with_tracker(|t| t.steps().get(*index).map(|s| s.text.clone()));
            println!("\n  {} {} {}", "▶".cyan(), indicator.bold(), text.unwrap_or_default());
        }
        SessionEvent::RecipeCompleted { title } => {
            println!();
            println!("{}", "  ╔══════════════════════════════════════╗".bold().green());
            println!("{}", "  ║         ¡Buen provecho! 🎉           ║".bold().green());
            println!("{}", "  ╚══════════════════════════════════════╝".bold().green());
            println!("  You finished {}.  Type {} to leave, then {} to tell us about it.", title.bold(), "done".bold(), "/share".bold());
        }
        SessionEvent::IngredientsPrepared => {
            println!("  {} All ingredients are ready. Let's cook!", "✓".green().bold());
        }
    }
}

async fn cmd_cook(app: &App, input: &mut Input, id: &str) -> Result<(), SaborError> {
    let recipe = find_recipe(app, id).await?;
    let (mut session, mut events) = CookingSession::start(&recipe, app.cfg.session_timing());

    println!("\n{} {}", "Cooking".bold(), recipe.title.bold().underline());
    print_cook_status(&session);
    print_cook_help();

    let prompt = "cook>".bold().yellow().to_string();
    let mut prompt_line = PromptLine::default();
    loop {
        if let Some(text) = prompt_line.show(&prompt) {
            print!("{text}");
            io::stdout().flush().ok();
        }
        let line = tokio::select! {
            _ = input.shutdown.wait() => break,
            Some(event) = events.recv() => {
                print!("{}", prompt_line.take_over());
                print_session_event(&session, &event);
                continue;
            }
            line = input.lines.next_line() => line,
        };
        prompt_line.submitted();
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let outcome: Result<(), SaborError> = match parse_cook_command(&line) {
            CookCommand::Check(i) => session.toggle_step(i, true).map(|_| ()).map_err(Into::into),
            CookCommand::Uncheck(i) => session.toggle_step(i, false).map(|_| ()).map_err(Into::into),
            CookCommand::Ingredient(i) => {
                let checked = !session.ingredients().is_checked(i);
                session.toggle_ingredient(i, checked).map(|_| ()).map_err(Into::into)
            }
            CookCommand::Next => {
                if !session.advance() {
                    println!("  {}", "Already at the last step.".dimmed());
                }
                Ok(())
            }
            CookCommand::Prev => {
                if !session.retreat() {
                    println!("  {}", "Already at the first step.".dimmed());
                }
                Ok(())
            }
            CookCommand::Status => {
                print_cook_status(&session);
                Ok(())
            }
            CookCommand::Reset => {
                session.reset();
                print_cook_status(&session);
                Ok(())
            }
            CookCommand::Done => break,
            CookCommand::Help => {
                print_cook_help();
                Ok(())
            }
            CookCommand::Usage(usage) => {
                println!("{} {}", "Usage:".yellow(), usage);
                Ok(())
            }
            CookCommand::Unknown => {
                print_cook_help();
                Ok(())
            }
        };
        if let Err(e) = outcome {
            println!("{} {}", "✗".red().bold(), e);
        }

        // Render whatever the command produced right away.
        while let Ok(event) = events.try_recv() {
            print_session_event(&session, &event);
        }
    }

    session.leave();
    println!("  Left the kitchen.\n");
    Ok(())
}

// ── /share, /thanks, /memories ───────────────────────────────────────────────

async fn cmd_share(app: &mut App, input: &mut Input) -> Result<(), SaborError> {
    println!("\n{}", "Share a Memory".bold().underline());
    let Some(name) = input.prompt_str("  Your name:", "").await else {
        return Ok(());
    };
    let Some(recipe) = input.prompt_str("  Recipe name:", "").await else {
        return Ok(());
    };
    for (i, (_, label)) in CATEGORIES.iter().enumerate() {
        println!("    {}) {}", i + 1, label);
    }
    let Some(category) = input.prompt_str("  Category (number or name):", "").await else {
        return Ok(());
    };
    let Some(memory) = input.prompt_str("  Your memory:", "").await else {
        return Ok(());
    };
    let Some(ingredients) = input.prompt_str("  Special ingredients (optional):", "").await else {
        return Ok(());
    };

    let submission = MemorySubmission {
        name,
        recipe,
        memory,
        category: parse_category(&category),
        ingredients,
    };

    if submission.missing_fields().is_empty() {
        println!("  {}", "Saving your memory…".dimmed());
    }
    match app.share.submit(&submission).await {
        Ok(record) => {
            println!("  {} Memory saved as #{}.", "✓".green().bold(), record.id);
            cmd_thanks(app);
            Ok(())
        }
        Err(MemoryError::Validation(fields)) => {
            for field in &fields {
                println!("  {} {} is required", "•".red(), field.as_str().bold());
            }
            Err(SaborError::InvalidSubmission(fields))
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_thanks(app: &mut App) {
    match app.share.confirmation() {
        Some(thanks) => {
            println!();
            println!("{}", format!("  ¡Gracias, {}!", thanks.name).bold().green());
            println!("  Your memory of {} ({}) is now part of our table:", thanks.recipe.bold(), thanks.category);
            println!("    {}", thanks.memory.italic());
            println!();
        }
        None => println!(
            "  {} Share one with {}.",
            "No recently shared memory.".dimmed(),
            "/share".bold()
        ),
    }
}

fn cmd_memories(app: &App) {
    let memories = app.share.store().list();
    println!("\n{}", "Shared Memories".bold().underline());
    if memories.is_empty() {
        println!("  {}", "No memories yet. Be the first with /share.".dimmed());
    }
    for record in &memories {
        println!("{}", render::memory_card(record));
    }
    println!();
}

fn cmd_memory(app: &App, id: i64) -> Result<(), SaborError> {
    let record = app
        .share
        .store()
        .get_by_id(id)
        .ok_or(SaborError::MemoryNotFound(id))?;
    println!("\n{}\n", record.detail_text());
    Ok(())
}

fn cmd_schema() -> Result<(), SaborError> {
    let schema = serde_json::to_string_pretty(&memory_record_schema())
        .map_err(|e| SaborError::Storage(e.to_string()))?;
    println!("{schema}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_printed_once_until_input_or_output_replaces_it() {
        let mut line = PromptLine::default();
        assert_eq!(line.show("cook>").as_deref(), Some("cook> "));
        assert_eq!(line.show("cook>"), None);

        line.submitted();
        assert_eq!(line.take_over(), "");
        assert_eq!(line.show("cook>").as_deref(), Some("cook> "));
    }

    #[test]
    fn async_output_erases_a_waiting_prompt() {
        let mut line = PromptLine::default();
        line.show("cook>");
        assert_eq!(line.take_over(), "\r\x1b[2K");
        assert_eq!(line.take_over(), "");
        assert_eq!(line.show("cook>").as_deref(), Some("cook> "));
    }
}
