use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubescript::cli::{Cli, Commands};
use tubescript::config::Config;
use tubescript::pipeline::{TranscriptPipeline, TranscriptRequest};
use tubescript::{output, server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; --verbose lowers the default filter to debug
    let default_filter = if cli.verbose {
        "tubescript=debug"
    } else {
        "tubescript=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().await?;

    match cli.command {
        Commands::Fetch {
            url,
            language,
            punctuated,
            output_dir,
            filename,
            punctuation_model,
            auto_open,
        } => {
            let pipeline = TranscriptPipeline::new(&config, punctuation_model)?;

            let request = TranscriptRequest {
                url,
                language: language.unwrap_or_else(|| config.transcript.default_language.clone()),
                punctuate: punctuated || config.transcript.punctuate,
                filename: filename.clone(),
            };

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .expect("spinner template is valid"),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message("Generating transcript...");

            let document = match pipeline.generate(&request).await {
                Ok(document) => {
                    spinner.finish_and_clear();
                    document
                }
                Err(e) => {
                    spinner.finish_and_clear();
                    return Err(e);
                }
            };

            let stem = output::resolve_filename(
                request.filename.as_deref(),
                document.title.as_deref(),
                &document.video_id,
            );
            let dir = output_dir.unwrap_or_else(|| config.output.directory.clone());
            let path = output::save_document(&document.body, &dir, &stem).await?;

            println!("Transcript saved to: {}", path.display());

            if auto_open || config.output.auto_open {
                output::open_file(&path).await;
            }
        }
        Commands::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            server::serve(config).await?;
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                println!("Edit the config file to change settings:");
                println!("  {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}
