//! keepours command-line tool.
//!
//! Mechanically resolves git merge-conflict markers in a configured list of
//! files by keeping the "ours" (HEAD) side of every well-formed conflict
//! block. Provides subcommands for running the resolution cycle, dry-run
//! checking, and generating / validating configuration files.

mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use tracing_subscriber::EnvFilter;

use keepours_core::config::AppConfig;
use keepours_core::engine::Engine;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// keepours command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "keepours",
    version,
    about = "Mechanically resolve git conflict markers by keeping the HEAD side"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, global = true, default_value = "./keepours.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve conflicts in the target files, keeping the HEAD side.
    Run {
        /// Target files, in order (overrides the configured list).
        files: Vec<PathBuf>,
    },

    /// Scan the target files and report conflicts without writing anything.
    Check {
        /// Target files, in order (overrides the configured list).
        files: Vec<PathBuf>,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./keepours.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { output } => {
            init_tracing("warn");
            cmd_init(&output)
        }
        Commands::Validate => {
            init_tracing("warn");
            cmd_validate(&cli.config)
        }
        Commands::Run { files } => {
            let targets = load_targets(&cli.config, files)?;
            cmd_run(&targets)
        }
        Commands::Check { files } => {
            let targets = load_targets(&cli.config, files)?;
            cmd_check(&targets)
        }
    }
}

/// Minimal logging for the CLI; `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// The ordered target list: positional FILES if given, else the configured
/// list. Also initializes tracing, from the config when the config is used.
fn load_targets(config_path: &Path, files: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        init_tracing("warn");
        return Ok(files);
    }

    let config =
        AppConfig::load_from_file(config_path).context("failed to load configuration file")?;
    config.validate().context("invalid configuration")?;
    init_tracing(&config.run.log_level);
    Ok(config.resolved_targets())
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_run(targets: &[PathBuf]) -> Result<()> {
    for path in targets {
        match Engine::process_file(path) {
            Ok(status) => {
                println!(
                    "{}",
                    style::success(&format!("{}: {}", path.display(), status))
                );
            }
            Err(e) => {
                // One status line per file, failure included; no later file
                // is attempted.
                println!("{}", style::error(&e.to_string()));
                anyhow::bail!("batch aborted on first error");
            }
        }
    }
    Ok(())
}

fn cmd_check(targets: &[PathBuf]) -> Result<()> {
    let checks = match Engine::check(targets) {
        Ok(checks) => checks,
        Err(e) => {
            println!("{}", style::error(&e.to_string()));
            anyhow::bail!("check aborted on first error");
        }
    };

    let conflicted: Vec<_> = checks.iter().filter(|c| !c.blocks.is_empty()).collect();

    if conflicted.is_empty() {
        println!("{}", style::success("No conflicts found"));
        println!(
            "{}",
            style::dim(&format!("{} file(s) scanned", checks.len()))
        );
        return Ok(());
    }

    println!();
    println!(
        "{}",
        style::header(&format!("Conflicted files ({})", conflicted.len()))
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["File", "Conflicts", "Lines"]);

    for check in &conflicted {
        let spans = check
            .blocks
            .iter()
            .map(|b| format!("{}-{}", b.start_line, b.end_line))
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(vec![
            Cell::new(check.path.display().to_string()),
            Cell::new(check.blocks.len().to_string()),
            Cell::new(spans),
        ]);
    }

    println!("{}", table);
    println!();
    println!(
        "{}",
        style::dim(&format!(
            "{} of {} file(s) contain conflicts",
            conflicted.len(),
            checks.len()
        ))
    );

    Ok(())
}

fn cmd_init(output: &Path) -> Result<()> {
    let default_config = r#"# keepours configuration
# Conflicts in the listed files are resolved by keeping the HEAD side.

[run]
log_level = "warn"

[targets]
# Optional base directory; relative entries in `files` are joined to it.
# root = "/path/to/project"
files = [
    "src/components/chat_panel.vue",
    "src/views/report.vue",
]
"#;

    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, default_config).context("failed to write config file")?;

    println!("Default configuration written to {}", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit the config file with your target file list");
    println!(
        "  2. Validate with: keepours validate --config {}",
        output.display()
    );
    println!(
        "  3. Preview with: keepours check --config {}",
        output.display()
    );
    println!(
        "  4. Resolve with: keepours run --config {}",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let config = AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    match config.validate() {
        Ok(()) => {
            println!("  [OK] All required fields are valid");
        }
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            anyhow::bail!("configuration validation failed");
        }
    }

    println!();
    println!("Configuration summary:");
    println!("  Log level   : {}", config.run.log_level);
    println!(
        "  Target root : {}",
        config
            .targets
            .root
            .as_ref()
            .map(|r| r.display().to_string())
            .unwrap_or_else(|| "(working directory)".to_string())
    );
    println!("  Target files: {}", config.targets.files.len());
    for file in &config.targets.files {
        println!("    - {}", file.display());
    }
    println!();
    println!("Configuration is valid.");

    Ok(())
}
