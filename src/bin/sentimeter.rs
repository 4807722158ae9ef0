//! sentimeter: classify comment batches from the command line.
//!
//! Reads comments (or videos) as JSON and prints the analysis as JSON.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::info;

use sentimeter::config::{Config, Secrets};
use sentimeter::{
    BackendSelector, Comment, DEFAULT_TAG_LIMIT, FsSnapshotStore, SentimentPipeline,
    SentimeterError, Video, comments_limited, tag_frequency,
};

/// Sentiment analysis for video comments.
#[derive(Parser)]
#[command(name = "sentimeter")]
#[command(version = sentimeter::PKG_VERSION)]
#[command(about = "Classify comment sentiment and summarise batches")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a JSON array of comments
    Analyze {
        /// Comments file (JSON array)
        comments: PathBuf,
        /// Skip the remote backend
        #[arg(long)]
        local: bool,
        /// Save a snapshot of the result under this video id
        #[arg(long)]
        video_id: Option<String>,
    },

    /// Count tags across a JSON array of videos
    Tags {
        /// Videos file (JSON array)
        videos: PathBuf,
        /// Number of tags to show
        #[arg(short, long, default_value_t = DEFAULT_TAG_LIMIT)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: info; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Analyze {
            comments,
            local,
            video_id,
        } => {
            let secrets = Secrets::load()?;
            let comments: Vec<Comment> = read_json(&comments)?;

            let mut analysis = config.analysis.clone();
            if local {
                analysis.prefer_remote = false;
            }

            info!(version = sentimeter::version_string(), "sentimeter starting");
            let pipeline = SentimentPipeline::new(BackendSelector::from_config(&config, &secrets));

            // Snapshots are best-effort: an unusable store still prints results.
            let store = match &video_id {
                Some(_) => {
                    FsSnapshotStore::open_best_effort(
                        config.storage.root_dir(),
                        &analysis.storage_bucket,
                    )
                    .await
                }
                None => None,
            };

            let outcome = match (video_id, store) {
                (Some(video_id), Some(store)) => {
                    pipeline
                        .process_and_store(comments, &video_id, &mut analysis, &store)
                        .await
                }
                _ => pipeline.process(comments, &mut analysis).await,
            };

            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Command::Tags { videos, limit } => {
            let videos: Vec<Video> = read_json(&videos)?;
            let limited: Vec<&str> = videos
                .iter()
                .filter(|v| comments_limited(v))
                .map(|v| v.id.as_str())
                .collect();

            let report = json!({
                "tags": tag_frequency(&videos, limit),
                "comments_limited": limited,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SentimeterError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| SentimeterError::InvalidInput(format!("{}: {e}", path.display())))
}
