//! dbc - DBC data browser backend
//!
//! - `serve`: JSON API over the seeded database
//! - `migrate`: create tables and indexes
//! - `transform`: raw exports to normalized CSV
//! - `seed`: load the database (COPY or chunked INSERT)

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod config;
mod tracing_setup;

use config::DbcConfig;

#[derive(Parser, Debug)]
#[command(
    name = "dbc",
    author,
    version,
    about = "Browse, transform and seed the Dutch DBC open dataset",
    long_about = "Serve a JSON API over DBC reference and fact tables in PostgreSQL, and \
                  load those tables from the published CSV exports."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still wins)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ./dbc.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create tables and indexes
    Migrate(commands::migrate::MigrateArgs),
    /// Normalize the raw CSV exports
    Transform(commands::transform::TransformArgs),
    /// Load the database from CSV files
    Seed(commands::seed::SeedArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Completions(args) => run_completions(args)?,
        command => {
            let config = DbcConfig::load(cli.config.as_deref())?;
            run_command(command, &config).await?;
        }
    }
    Ok(())
}

async fn run_command(command: Commands, config: &DbcConfig) -> Result<()> {
    match command {
        Commands::Serve(args) => commands::run_serve(args, config).await,
        Commands::Migrate(args) => commands::run_migrate(args, config).await,
        Commands::Transform(args) => commands::run_transform(args, config),
        Commands::Seed(args) => commands::run_seed(args, config).await,
        Commands::Completions(args) => run_completions(args),
    }
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
