use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tubescript",
    about = "Fetch YouTube caption tracks and format them as readable Markdown transcripts",
    version,
    long_about = "Fetches a YouTube video's caption track, cleans and optionally re-punctuates \
the text, aligns chapter headings from the video description, and writes the result as a \
Markdown document. Also runs as a local HTTP service with a web form."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a video's captions and write the formatted transcript
    Fetch {
        /// YouTube video URL
        #[arg(value_name = "URL")]
        url: String,

        /// Caption language code (default from config)
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,

        /// Generate a punctuated transcript
        #[arg(short, long)]
        punctuated: bool,

        /// Output directory for the transcript file
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Filename without extension (default: video title or id)
        #[arg(short, long, value_name = "NAME")]
        filename: Option<String>,

        /// Punctuation model id to request from the endpoint
        #[arg(short = 'm', long, value_name = "MODEL")]
        punctuation_model: Option<String>,

        /// Open the generated file with the default application
        #[arg(short = 'a', long)]
        auto_open: bool,
    },

    /// Run the HTTP API and web form
    Serve {
        /// Bind address (default from config)
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}
