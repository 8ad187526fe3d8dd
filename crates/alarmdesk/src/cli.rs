//! Clap derive structures for the `alarmdesk` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// alarmdesk -- browse and handle IoT platform alarms from a terminal
#[derive(Debug, Parser)]
#[command(
    name = "alarmdesk",
    version,
    about = "Browse and handle IoT platform alarms from the command line",
    long_about = "Lists alarms from an IoT platform's REST API as a table with\n\
        severity colors and assignee avatars, and acknowledges, clears or\n\
        assigns them subject to the signed-in user's permissions.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Platform profile to use
    #[arg(long, short = 'p', env = "ALARMDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Platform URL (overrides profile)
    #[arg(long, short = 'u', env = "ALARMDESK_URL", global = true)]
    pub url: Option<String>,

    /// Username (overrides profile)
    #[arg(long, env = "ALARMDESK_USERNAME", global = true)]
    pub username: Option<String>,

    /// Pre-issued JWT; skips the password login
    #[arg(long, env = "ALARMDESK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ALARMDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ALARMDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ALARMDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Alarm status filter.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusFilter {
    Any,
    Active,
    Cleared,
    Ack,
    Unack,
}

/// Exact alarm status, narrower than the search-status filter.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExactStatus {
    ActiveUnack,
    ActiveAck,
    ClearedUnack,
    ClearedAck,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and handle alarms
    #[command(alias = "a")]
    Alarms(AlarmsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Alarms ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AlarmsArgs {
    #[command(subcommand)]
    pub command: AlarmsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlarmsCommand {
    /// List alarms, newest first
    #[command(alias = "ls")]
    List {
        /// Only alarms raised by this entity (TYPE:UUID, e.g. DEVICE:784f...)
        #[arg(long, short = 'e')]
        entity: Option<String>,

        /// Status filter (defaults to the profile's default_status, else any)
        #[arg(long, short = 's')]
        status: Option<StatusFilter>,

        /// Only alarms in exactly this status
        #[arg(long, value_enum)]
        exact_status: Option<ExactStatus>,

        /// Only alarms assigned to this user (UUID)
        #[arg(long)]
        assignee: Option<String>,

        /// History window in days (1 to 36500)
        #[arg(
            long,
            short = 'd',
            default_value = "30",
            value_parser = clap::value_parser!(u32).range(1..=36_500)
        )]
        days: u32,

        /// Page number, starting at 0
        #[arg(long, default_value = "0")]
        page: u32,

        /// Alarms per page (defaults to the profile's page_size)
        #[arg(long, short = 'l')]
        page_size: Option<u32>,

        /// Free-text search
        #[arg(long)]
        search: Option<String>,

        /// Oldest first instead of newest first
        #[arg(long)]
        sort_asc: bool,
    },

    /// Show one alarm and what the current user may do with it
    Get {
        /// Alarm UUID
        id: String,
    },

    /// Acknowledge an alarm
    Ack {
        /// Alarm UUID
        id: String,
    },

    /// Clear an alarm
    Clear {
        /// Alarm UUID
        id: String,
    },

    /// Assign an alarm to a user
    Assign {
        /// Alarm UUID
        id: String,
        /// User UUID
        user_id: String,
    },

    /// Remove the assignee from an alarm
    Unassign {
        /// Alarm UUID
        id: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Key: url, username, password_env, ca_cert, insecure, timeout,
        /// page_size, default_status
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
