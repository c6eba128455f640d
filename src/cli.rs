use clap::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "vidlink",
    about = "Detect the video platform of a link and extract its video ID",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Video URL (reads one URL per line from stdin if omitted)
    pub url: Option<String>,

    /// Output format: text or json (defaults to config, then text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Short-link resolution timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<f64>,

    /// Only detect the platform, skip video ID extraction
    #[arg(long)]
    pub no_extract: bool,

    /// Quick offline check of canonical video link shapes, no detection
    #[arg(long, conflicts_with = "no_extract")]
    pub check: bool,

    /// Show detection details on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}
