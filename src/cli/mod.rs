use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod clear;
pub mod display;
pub mod export;
pub mod import;
pub mod list;
pub mod menu;
pub mod show;
pub mod ui;

pub use clear::run_clear;
pub use display::run_stats;
pub use export::run_export;
pub use import::{install_cancel_handler, run_import};
pub use list::run_list;
pub use menu::run_menu;
pub use show::{confirm_toggle, run_show, run_toggle};

#[derive(Parser)]
#[command(name = "fieldops")]
#[command(about = "Offline door-to-door visit list for the command line")]
#[command(version)]
pub struct Cli {
    /// Database file (overrides FIELDOPS_DB)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Verbose logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a CSV list (opens a file picker when FILE is omitted)
    Import(ImportArgs),
    /// Browse the list with load-more paging
    List(ListArgs),
    /// Search by name, address or phone
    Search(SearchArgs),
    /// Show one entry and offer to flip its status
    Show(IdentifierArgs),
    /// Flip done/pending for one entry
    Toggle(IdentifierArgs),
    /// Remove every entry
    Clear(ClearArgs),
    /// Print total, done and pending counts
    Stats,
    /// Write the list as CSV (stdout when FILE is omitted)
    Export(ExportArgs),
}

#[derive(Args)]
pub struct ImportArgs {
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long)]
    pub query: Option<String>,
    /// Print every match instead of the first page
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query (name, address, phone)
    pub query: String,
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args)]
pub struct IdentifierArgs {
    /// Entry id or a search term that matches exactly one entry
    pub identifier: String,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    pub file: Option<PathBuf>,
}
