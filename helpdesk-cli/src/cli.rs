use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use helpdesk_lib::model::AuditAction;
use helpdesk_lib::table::ExportFormat;
use simplelog::LevelFilter;

#[derive(Debug, Parser)]
#[command(bin_name = "helpdesk")]
#[command(about = "Browse, export and print helpdesk records from the terminal")]
#[command(version)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalOptions,
}

#[derive(Debug, Args)]
pub struct GlobalOptions {
    #[arg(global = true, long, help = "Read settings from this file instead of the default config.json")]
    pub config: Option<PathBuf>,

    #[arg(global = true, long, value_enum, default_value_t = LogLevel::Info, help = "Level written to latest.log")]
    pub log_level: LogLevel,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(about = "Show one page of a table")]
    Table {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        view: ViewArgs,
    },

    #[clap(about = "Export the filtered and sorted rows of a table (all pages)")]
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, short, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
        #[arg(long, short, default_value = ".", help = "Directory the file is written to")]
        out: PathBuf,
        #[arg(long, help = "Title used as the file name")]
        title: Option<String>,
    },

    #[clap(about = "Query an audit log")]
    Audit {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long, help = "Only this action, e.g. `assigned` or `status_changed`")]
        action: Option<String>,
        #[arg(long)]
        user: Option<String>,
        #[arg(long, help = "First day, YYYY-MM-DD")]
        from: Option<String>,
        #[arg(long, help = "Last day, YYYY-MM-DD")]
        to: Option<String>,
        #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
        page: usize,
        #[arg(long, default_value_t = 15)]
        per_page: usize,
        #[arg(long, help = "Oldest first")]
        oldest_first: bool,
    },

    #[clap(about = "Print a single record")]
    Print {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, help = "Pick the record with this id from a list")]
        id: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, help = "Write a printable HTML page to this path")]
        html: Option<PathBuf>,
        #[arg(long, help = "Split the output into pages of this many lines")]
        lines_per_page: Option<usize>,
    },
}

/// Where the records come from: a JSON file or a backend resource.
#[derive(Debug, Args)]
pub struct SourceArgs {
    #[arg(long, short = 'i', conflicts_with = "resource", help = "JSON file holding the records")]
    pub file: Option<PathBuf>,

    #[arg(long, short, help = "Backend resource, e.g. `tickets`")]
    pub resource: Option<String>,

    #[arg(long, help = "Backend root URL (overrides config)")]
    pub url: Option<String>,

    #[arg(long, help = "Bearer token (overrides config)")]
    pub token: Option<String>,
}

/// Search, filter, sort and page options shared by `table` and `export`.
#[derive(Debug, Args)]
pub struct ViewArgs {
    #[arg(long, short, value_delimiter = ',', help = "Columns to show, by field name")]
    pub columns: Vec<String>,

    #[arg(long, short)]
    pub search: Option<String>,

    #[arg(long = "filter", value_name = "COLUMN=TEXT", help = "Per-column filter, repeatable")]
    pub filters: Vec<String>,

    #[arg(long, help = "Sort by this column")]
    pub sort: Option<String>,

    #[arg(long, requires = "sort")]
    pub desc: bool,

    #[arg(long, help = "Compare numbers numerically instead of as text")]
    pub typed_sort: bool,

    #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
    pub page: usize,

    #[arg(long)]
    pub page_size: Option<usize>,

    #[arg(long, value_delimiter = ',', help = "Columns to hide")]
    pub hide: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Parses an `--action` value. Unknown names are rejected rather than
/// silently matching the catch-all.
pub fn parse_action(raw: &str) -> Option<AuditAction> {
    let action = AuditAction::parse(raw);
    (action != AuditAction::Other || raw.trim().eq_ignore_ascii_case("other")).then_some(action)
}
