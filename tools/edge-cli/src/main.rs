//! Edge CLI - Inspect and drive the edge cache max-age advisor.
//!
//! Commands:
//! - `edge rank` - Show the current deviation rank
//! - `edge report` - Print the diagnostics health report
//! - `edge notice` - Select the notice for a simulated page render
//! - `edge migrate` - Run the legacy max-age migration
//! - `edge set-max-age` - Save a new max-age and apply the update event
//! - `edge reset-flag` - Clear a user's once-only notice flags
//! - `edge config` - Manage configuration

mod commands;
mod context;
mod output;
mod state;

use anyhow::Result;
use clap::{Parser, Subcommand};
use edge_observability::{init_logging, LogFormat, LogLevel};

use commands::{
    ConfigArgs, MigrateArgs, NoticeArgs, RankArgs, ReportArgs, ResetFlagArgs, SetMaxAgeArgs,
};

/// Edge CLI - Evaluate the edge cache max-age and the notices it triggers
#[derive(Parser)]
#[command(name = "edge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// State file holding settings, user flags and the rank cache
    #[arg(long, global = true, env = "EDGE_ADVISOR_STATE")]
    state: Option<String>,

    /// Log output format (human or json)
    #[arg(long, global = true, default_value = "human")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how far max-age falls short of the recommendation
    Rank(RankArgs),

    /// Print the max-age health report
    Report(ReportArgs),

    /// Select the notice for a page render
    Notice(NoticeArgs),

    /// Run the one-time legacy max-age migration
    Migrate(MigrateArgs),

    /// Save a new max-age
    SetMaxAge(SetMaxAgeArgs),

    /// Clear once-only notice flags for a user
    ResetFlag(ResetFlagArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(
        cli.log_format,
        LogLevel::from_verbosity(LogLevel::Warn, cli.verbose),
    );

    // Setup output formatting
    let output = output::Output::new(cli.verbose > 0, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), cli.state.as_deref(), output)?;
    tracing::debug!(state = %ctx.state_path.display(), "loaded CLI context");

    // Execute command
    let result = match cli.command {
        Commands::Rank(args) => commands::rank::run(args, &ctx),
        Commands::Report(args) => commands::report::run(args, &ctx),
        Commands::Notice(args) => commands::notice::run(args, &ctx),
        Commands::Migrate(args) => commands::migrate::run(args, &ctx),
        Commands::SetMaxAge(args) => commands::max_age::run(args, &ctx),
        Commands::ResetFlag(args) => commands::flags::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
