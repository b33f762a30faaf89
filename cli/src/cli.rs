use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

/// Command-line client for the case-file archive backend.
#[derive(Debug, Parser)]
#[command(name = "dossier", version, about = "Import and browse archived case files")]
pub struct Cli {
    /// API root, for example http://127.0.0.1:8000/api. Falls back to
    /// $DOSSIER_BASE_URL.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token. Falls back to $DOSSIER_TOKEN, then to the token stored
    /// under the dossier home directory.
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Emit JSON lines instead of human-oriented output.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload files and stream per-file progress until the batch completes.
    Import(ImportArgs),
    /// List recent import batches.
    Tasks,
    /// List archived case files.
    List(ListArgs),
    /// Full-text search across the archive.
    Search(SearchArgs),
    /// Show one case file in full.
    Show(ShowArgs),
    /// Delete one case file.
    Delete(DeleteArgs),
}

#[derive(Debug, clap::Args)]
pub struct ImportArgs {
    /// Files to upload.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Label for the batch, shown in task listings.
    #[arg(long, value_name = "NAME")]
    pub task_name: Option<String>,

    /// Originating department recorded on every file in the batch.
    #[arg(long, value_name = "DEPT")]
    pub department: Option<String>,

    /// Give up if the server sends nothing for this many seconds.
    #[arg(long, value_name = "SECS")]
    pub idle_timeout: Option<u64>,
}

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Match against case number, title, and extracted text.
    #[arg(long)]
    pub keyword: Option<String>,

    /// Filter by case type.
    #[arg(long, value_name = "TYPE")]
    pub case_type: Option<String>,

    /// Filter by processing status.
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = 20)]
    pub page_size: u32,
}

#[derive(Debug, clap::Args)]
pub struct SearchArgs {
    /// What to look for.
    pub keyword: String,

    /// Matching mode: fuzzy or exact.
    #[arg(long)]
    pub mode: Option<String>,

    /// Comma-separated fields to match: title, content, metadata, tags.
    #[arg(long)]
    pub scope: Option<String>,

    /// Sort order: relevance, time, or title.
    #[arg(long, value_name = "ORDER")]
    pub sort_by: Option<String>,

    /// Filter by case type.
    #[arg(long, value_name = "TYPE")]
    pub case_type: Option<String>,

    /// Filter by originating department.
    #[arg(long, value_name = "DEPT")]
    pub department: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = 10)]
    pub page_size: u32,
}

#[derive(Debug, clap::Args)]
pub struct ShowArgs {
    /// Case-file id.
    pub id: u64,
}

#[derive(Debug, clap::Args)]
pub struct DeleteArgs {
    /// Case-file id.
    pub id: u64,

    /// Delete without the interactive confirmation prompt.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}
