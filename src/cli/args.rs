//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs,
    craftsman::CraftsmanCommands,
    equipment::EquipmentCommands,
    init::InitArgs,
    report::ReportCommands,
    status::StatusArgs,
    wo::WoCommands,
};

#[derive(Parser)]
#[command(name = "mrt")]
#[command(author, version, about = "Maintenance Report Toolkit")]
#[command(
    long_about = "A CLI for tracking maintenance work orders and filing structured equipment maintenance reports."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new MRT project
    Init(InitArgs),

    /// Equipment registry management
    #[command(subcommand)]
    Equipment(EquipmentCommands),

    /// Craftsman management
    #[command(subcommand)]
    Craftsman(CraftsmanCommands),

    /// Work order management
    #[command(subcommand)]
    Wo(WoCommands),

    /// Maintenance report management
    #[command(subcommand)]
    Report(ReportCommands),

    /// Project status dashboard
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for list/show commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pick a sensible format for the command
    Auto,
    /// YAML
    Yaml,
    /// JSON
    Json,
    /// Comma-separated values
    Csv,
    /// Aligned columns for terminals
    Tsv,
    /// Markdown table
    Md,
    /// IDs only, one per line
    Id,
}
