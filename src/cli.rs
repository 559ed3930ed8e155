use clap::Parser;

#[derive(Parser)]
#[command(name = "youtubey", version, about = "YouTube transcript and summary service")]
pub struct Cli {
    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Preferred caption language
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Gemini model for summarization
    #[arg(long)]
    pub model: Option<String>,
}
