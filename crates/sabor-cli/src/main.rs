//! `sabor-cli` – Sabor de Casa in the terminal
//!
//! This binary is the front door to the recipe collection.  It:
//!
//! 1. Checks for `~/.sabor/config.toml`; runs a **First-Run Wizard** when the
//!    file is absent.
//! 2. Initialises structured logging (see `sabor_runtime::telemetry`).
//! 3. Drops the user into an **interactive REPL** with slash-commands
//!    (`/recipes`, `/cook`, `/share`, `/memories`, `/help`, ...).
//! 4. Intercepts **Ctrl-C** to cancel pending cooking timers and exit cleanly.

mod commands;
mod config;
mod render;
mod repl;

use colored::Colorize;
use std::sync::Arc;
use tracing::warn;

use sabor_runtime::telemetry::init_tracing;

use crate::config::{Config, DataSource, StorageKind};
use crate::repl::{App, Shutdown};

fn main() {
    // ── Configuration ─────────────────────────────────────────────────────
    let loaded = config::load();
    let needs_wizard = matches!(loaded, Ok(None));
    let load_error = loaded.as_ref().err().cloned();
    let mut cfg = loaded.ok().flatten().unwrap_or_else(|| {
        let mut cfg = Config::default();
        config::apply_env_overrides(&mut cfg);
        cfg
    });

    // ── Structured logging ────────────────────────────────────────────────
    // User-facing output still goes through println! for UX consistency.
    let _telemetry = init_tracing("sabor", &cfg.log_settings());

    print_banner();

    if needs_wizard {
        cfg = run_first_run_wizard(cfg);
    } else if let Some(e) = load_error {
        println!("{}: {}", "Config error".red(), e);
        println!("  Using default configuration.");
    } else {
        println!(
            "  Config loaded from {}",
            config::config_path().display().to_string().bold()
        );
    }

    // ── Shutdown flag / Ctrl-C handler ────────────────────────────────────
    let shutdown = Arc::new(Shutdown::default());
    let shutdown_clone = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – putting the kitchen away …".yellow().bold());
        shutdown_clone.trigger();
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; graceful shutdown on Ctrl-C will not be available");
    }

    // ── Runtime ───────────────────────────────────────────────────────────
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{}: {}", "Failed to start the async runtime".red(), e);
            std::process::exit(1);
        }
    };

    runtime.block_on(async move {
        let mut app = App::new(cfg);
        println!(
            "  Recipes from {} · type {} for a list of commands.\n",
            app.source_name().bold(),
            "/help".bold().cyan()
        );
        repl::run(&mut app, shutdown).await;
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// First-Run Wizard
// ─────────────────────────────────────────────────────────────────────────────

fn run_first_run_wizard(mut cfg: Config) -> Config {
    println!();
    println!("{}", "  ╔══════════════════════════════════════╗".bold().cyan());
    println!("{}", "  ║    Sabor de Casa First-Run Wizard    ║".bold().cyan());
    println!("{}", "  ╚══════════════════════════════════════╝".bold().cyan());
    println!();
    println!("  No configuration found.  Let's set the table.\n");

    println!("  Where should recipes come from?");
    println!("    1) Bundled recipe file  (default, works offline)");
    println!("    2) TheMealDB online catalog");
    let choice = prompt_line("  Enter choice [1]: ", "1");
    cfg.data_source = match choice.trim() {
        "2" => DataSource::MealDb,
        _ => DataSource::Static,
    };

    if cfg.data_source == DataSource::Static {
        cfg.recipes_path = prompt_line(
            &format!("  Recipe file [{}]: ", cfg.recipes_path),
            &cfg.recipes_path,
        );
    }

    println!("  Where should shared memories be kept?");
    println!("    1) Files under ~/.sabor  (default)");
    println!("    2) SQLite database under ~/.sabor");
    println!("    3) Nowhere – forget them on exit");
    let choice = prompt_line("  Enter choice [1]: ", "1");
    cfg.storage = match choice.trim() {
        "2" => StorageKind::Sqlite,
        "3" => StorageKind::Memory,
        _ => StorageKind::File,
    };

    match config::save(&cfg) {
        Ok(()) => println!(
            "\n  {} Config saved to {}\n",
            "✓".green().bold(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
    cfg
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"   ____        __                 __        ____              "#.bold().yellow());
    println!("{}", r#"  / __/__ _   / /  ___  ____  ___/ /__     / ___/__ ____ ___ _"#.bold().yellow());
    println!("{}", r#" _\ \/ _ `/  / _ \/ _ \/ __/ / _  / -_)   / /__/ _ `(_-</ _ `/"#.bold().yellow());
    println!("{}", r#"/___/\_,_/  /_.__/\___/_/    \_,_/\__/    \___/\_,_/___/\_,_/ "#.bold().yellow());
    println!();
    println!(
        "  {} {}",
        "Sabor de Casa".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Family recipes, cooked step by step");
    println!();
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn prompt_line(msg: &str, default: &str) -> String {
    use std::io::{BufRead, Write};
    print!("{}", msg);
    std::io::stdout().flush().ok();
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(_) => {
            let t = line.trim().to_string();
            if t.is_empty() { default.to_string() } else { t }
        }
        Err(_) => default.to_string(),
    }
}
