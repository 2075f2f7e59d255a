use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zipview")]
#[command(version)]
#[command(about = "View zip archive contents and open single entries from a scratch cache", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipview data.zip                        list the files in data.zip\n  \
  zipview --html data.zip > view.html     render the listing page\n  \
  zipview -s ~/.cache/zipview data.zip docs/readme.md\n                                          extract one entry and print its path\n  \
  zipview -s /tmp/zv --events data.zip    answer view events read from stdin")]
pub struct Cli {
    /// Zip archive to view
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Entries to extract into <STORAGE_ROOT>/cache
    #[arg(value_name = "ENTRIES")]
    pub entries: Vec<String>,

    /// Base directory for extracted entries
    #[arg(short = 's', long, value_name = "DIR", env = "ZIPVIEW_STORAGE_ROOT")]
    pub storage_root: Option<PathBuf>,

    /// Print the HTML listing page instead of plain text
    #[arg(long, conflicts_with_all = ["entries", "events"])]
    pub html: bool,

    /// Read view events as JSON lines from stdin, write host requests to stdout
    #[arg(long, conflicts_with = "entries")]
    pub events: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    /// Extraction and event modes own stdout; the listing is only printed
    /// when neither is active.
    pub fn prints_listing(&self) -> bool {
        self.entries.is_empty() && !self.events
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }
}
