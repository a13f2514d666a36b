//! CLI command implementations.

pub mod config;
pub mod flags;
pub mod max_age;
pub mod migrate;
pub mod notice;
pub mod rank;
pub mod report;

use clap::{Args, Subcommand, ValueEnum};
use edge_advisor::SeenNotice;

/// Arguments for the rank command.
#[derive(Args)]
pub struct RankArgs {
    /// Drop the memoized rank before computing.
    #[arg(long)]
    pub fresh: bool,
}

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {}

/// Arguments for the notice command.
#[derive(Args)]
pub struct NoticeArgs {
    /// Screen ID being rendered (omit for an unknown screen).
    #[arg(short, long)]
    pub screen: Option<String>,

    /// Render as the cache settings view.
    #[arg(long, conflicts_with = "screen")]
    pub settings: bool,

    /// Signed-in user ID (omit for no user).
    #[arg(short, long)]
    pub user: Option<u64>,

    /// The user cannot manage the cache settings.
    #[arg(long, requires = "user")]
    pub read_only: bool,

    /// Installed integration version, or "none".
    #[arg(short, long, default_value = "none")]
    pub integration: String,

    /// The site is managed with Composer.
    #[arg(long)]
    pub composer: bool,

    /// Show every due notice instead of the most important one.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the migrate command.
#[derive(Args)]
pub struct MigrateArgs {}

/// Arguments for the set-max-age command.
#[derive(Args)]
pub struct SetMaxAgeArgs {
    /// New max-age in seconds.
    pub seconds: u64,
}

/// Which once-only notice flag to clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FlagName {
    GlobalLowMaxAge,
    MaxAgeUpdated,
    All,
}

impl FlagName {
    /// Notices covered by this selection.
    pub fn notices(&self) -> &'static [SeenNotice] {
        match self {
            Self::GlobalLowMaxAge => &[SeenNotice::GlobalLowMaxAge],
            Self::MaxAgeUpdated => &[SeenNotice::MaxAgeUpdated],
            Self::All => &SeenNotice::ALL,
        }
    }
}

/// Arguments for the reset-flag command.
#[derive(Args)]
pub struct ResetFlagArgs {
    /// User whose flag to clear.
    #[arg(short, long)]
    pub user: u64,

    /// Flag to clear.
    #[arg(value_enum, default_value = "all")]
    pub flag: FlagName,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
