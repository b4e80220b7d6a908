use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use snipmark::commands;
use snipmark::query::ViewMode;

#[derive(Parser)]
#[command(name = "snipmark")]
#[command(
  about = "Snipmark - Page Element Capture\nCapture page elements as Markdown snippets and browse them from a grouped dashboard"
)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

/// Common dashboard view arguments
#[derive(Args)]
struct ViewOptions {
  /// Grouping strategy (url, date, all)
  #[arg(short, long, value_enum, default_value_t = ViewMode::Url)]
  view: ViewMode,
  /// Free-text filter applied within each group
  #[arg(short, long, default_value = "")]
  query: String,
}

#[derive(Subcommand)]
enum Commands {
  /// Capture an element from a saved page document
  Capture {
    /// Path to the HTML document, or `-` for stdin
    document: String,
    /// Full URL of the page the document came from
    #[arg(short, long)]
    url: String,
    /// CSS selector of the element to capture
    #[arg(short, long)]
    selector: String,
    /// Label to assign to the new record (repeatable)
    #[arg(short, long = "tag")]
    tags: Vec<String>,
  },
  /// List groups with filtered record counts
  List {
    #[command(flatten)]
    options: ViewOptions,
  },
  /// Show the records of one group
  Show {
    /// Group key (hostname, date, or `all`)
    group: String,
    #[command(flatten)]
    options: ViewOptions,
  },
  /// Show the details view for a single record
  Details {
    /// Record id
    id: String,
    /// Also place the Markdown on the clipboard
    #[arg(short, long)]
    copy: bool,
  },
  /// Search all records for matching content
  Search {
    /// Search terms (space-separated)
    #[arg(required = true)]
    terms: Vec<String>,
  },
  /// Export records as website_section blocks (clipboard by default)
  Export {
    /// Record ids to export (comma-separated)
    #[arg(long, value_delimiter = ',', conflicts_with = "group")]
    ids: Vec<String>,
    /// Export every filtered record of this group
    #[arg(short, long)]
    group: Option<String>,
    #[command(flatten)]
    options: ViewOptions,
    /// Print the bundle to stdout instead of the clipboard
    #[arg(long)]
    stdout: bool,
  },
  /// Delete records by id
  Delete {
    /// Record ids to delete (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    ids: Vec<String>,
    /// Skip confirmation prompt
    #[arg(short, long)]
    force: bool,
  },
  /// Show selection-mode state and store statistics
  Status,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  match cli.command {
    Commands::Capture { document, url, selector, tags } => {
      commands::capture(&document, &url, &selector, tags)?;
    }
    Commands::List { options } => {
      commands::list(options.view, &options.query)?;
    }
    Commands::Show { group, options } => {
      commands::show(options.view, &group, &options.query)?;
    }
    Commands::Details { id, copy } => {
      commands::details(&id, copy)?;
    }
    Commands::Search { terms } => {
      commands::search(&terms)?;
    }
    Commands::Export { ids, group, options, stdout } => {
      commands::export(options.view, &ids, group.as_deref(), &options.query, stdout)?;
    }
    Commands::Delete { ids, force } => {
      commands::delete(&ids, force)?;
    }
    Commands::Status => {
      commands::status()?;
    }
  }

  Ok(())
}
