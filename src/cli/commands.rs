use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "todotree", about = concat!("todotree v", env!("CARGO_PKG_VERSION"), " - an outline of everything"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Tree database to use (default: storage.file from the settings)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<String>,

    /// Settings file
    #[arg(long, global = true, default_value = "todotree.toml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the outline below an item
    Show(ShowArgs),
    /// Resolve a name path and print the item's canonical path
    Find(FindArgs),
    /// Append an item and save
    Add(AddArgs),
    /// Convert a tree database between formats
    Convert(ConvertArgs),
    /// Validate the tree: broken links and ambiguous names
    Check,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ShowArgs {
    /// Name path of the item, as segments (Work Ideas) or /Work/Ideas
    pub path: Vec<String>,
    /// Levels to print (default: all)
    #[arg(long)]
    pub depth: Option<usize>,
    /// Truncate lines to this many terminal cells
    #[arg(long)]
    pub width: Option<usize>,
}

#[derive(Args)]
pub struct FindArgs {
    /// Name path to resolve; matching ignores case, accents and punctuation
    #[arg(required = true)]
    pub path: Vec<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Name path of the parent item (default: the root)
    pub path: Vec<String>,
    /// Name of the new item (for links: an optional alias)
    #[arg(long)]
    pub name: Option<String>,
    /// Add a checkbox
    #[arg(long, conflicts_with_all = ["separator", "remote", "link"])]
    pub checkbox: bool,
    /// Add a separator
    #[arg(long, conflicts_with_all = ["remote", "link"])]
    pub separator: bool,
    /// Add a remote-fed item
    #[arg(long, conflicts_with = "link")]
    pub remote: bool,
    /// Add a link to the item at this path (/Work/Ideas)
    #[arg(long, value_name = "TARGET")]
    pub link: Option<String>,
}

impl AddArgs {
    /// Structured type name of the item this command adds
    pub fn item_type(&self) -> &'static str {
        if self.link.is_some() {
            "link"
        } else if self.separator {
            "separator"
        } else if self.checkbox {
            "checkbox"
        } else if self.remote {
            "remote"
        } else {
            "text"
        }
    }
}

#[derive(Args)]
pub struct ConvertArgs {
    /// File to read (format is detected from its content)
    pub input: String,
    /// File to write
    pub output: String,
    /// Output format: json or text (default: storage.format from the settings)
    #[arg(long)]
    pub to: Option<String>,
}
