use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "kb-indexer",
    about = "Classify knowledge-base posts and build the site search index"
)]
pub struct Cli {
    /// Site root (defaults to KB_INDEXER_ROOT, then the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in taxonomy, layout and keywords for changed documents
    Classify(ClassifyArgs),
    /// Bring every document's taxonomy order in line with the taxonomy file
    SyncOrder(SyncOrderArgs),
    /// Build the JSON search index
    Index(IndexArgs),
    /// List taxonomy subcategories that have documents
    Report(ReportArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Classify --

#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Documents to classify (defaults to the lines of CHANGED_FILES)
    pub paths: Vec<PathBuf>,

    /// Also reconcile taxonomy.order against this taxonomy file
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,

    /// Drop blank lines at the start of the body when rewriting
    #[arg(long)]
    pub strip_blank_lines: bool,
}

// -- Sync order --

#[derive(Debug, Parser)]
pub struct SyncOrderArgs {
    /// Directory to scan for markdown files
    pub dir: PathBuf,

    /// Taxonomy file (defaults to _data/taxonomy.yml under the site root)
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,
}

// -- Index --

#[derive(Debug, Parser)]
pub struct IndexArgs {
    /// Output file (defaults to assets/search-index.json under the site root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum excerpt length in characters (0 disables truncation)
    #[arg(long)]
    pub excerpt_limit: Option<usize>,
}

// -- Report --

#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Taxonomy file (defaults to _data/taxonomy.yml under the site root)
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "kb-indexer",
            &mut std::io::stdout(),
        );
    }
}
