// FrameSeq Main Entry Point
// Copyright (c) 2026 Xing_The_Creator | FrameSeq

use frameseq_core::config::{
    PlayerConfig, PlayerMode, DEFAULT_DURATIONS_ARRAY, DEFAULT_IMAGES_ARRAY, DEFAULT_RUN_SECS,
    MANIFEST_ENV,
};
use frameseq_core::demo::run_demo;
use frameseq_core::{FrameTable, ResourceTable};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "frameseq")]
#[command(about = "Frame-sequence animation player", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an animation on a headless surface and report
    Play {
        /// Resource manifest (falls back to FRAMESEQ_MANIFEST)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Image array name
        #[arg(long, default_value = DEFAULT_IMAGES_ARRAY)]
        images: String,

        /// Duration array name
        #[arg(long, default_value = DEFAULT_DURATIONS_ARRAY)]
        durations: String,

        /// Player implementation
        #[arg(long, value_enum, default_value_t = PlayerMode::Sequence)]
        mode: PlayerMode,

        /// Play the sequence once instead of looping
        #[arg(long)]
        once: bool,

        /// How long to play before stopping
        #[arg(short, long, default_value_t = DEFAULT_RUN_SECS)]
        seconds: u64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the frame table a manifest produces
    Inspect {
        /// Resource manifest (falls back to FRAMESEQ_MANIFEST)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Image array name
        #[arg(long, default_value = DEFAULT_IMAGES_ARRAY)]
        images: String,

        /// Duration array name
        #[arg(long, default_value = DEFAULT_DURATIONS_ARRAY)]
        durations: String,
    },
}

fn manifest_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    PlayerConfig::resolve_manifest(flag)
        .with_context(|| format!("no manifest given (use --manifest or set {})", MANIFEST_ENV))
}

fn load_resources(path: &Path) -> Result<ResourceTable> {
    ResourceTable::from_manifest(path)
        .with_context(|| format!("failed to load manifest {:?}", path))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            manifest,
            images,
            durations,
            mode,
            once,
            seconds,
            json,
        } => {
            let path = manifest_path(manifest)?;
            let resources = Arc::new(load_resources(&path)?);

            let config = PlayerConfig {
                images,
                durations,
                mode,
                looping: !once,
                run_for: Duration::from_secs(seconds),
                ..PlayerConfig::new(path)
            };

            let report = run_demo(&config, resources)
                .await
                .context("playback failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }

        Commands::Inspect {
            manifest,
            images,
            durations,
        } => {
            let path = manifest_path(manifest)?;
            let resources = load_resources(&path)?;
            let table = FrameTable::from_resources(&resources, &images, &durations)
                .context("failed to build frame table")?;

            info!("[INSPECT] {} frames, {}ms per cycle", table.len(), table.cycle_millis());
            for (i, frame) in table.iter().enumerate() {
                println!("{:>3}  {:<6} {:>6}ms", i, frame.image.to_string(), frame.duration);
            }
        }
    }

    Ok(())
}
