use anyhow::Context;
use clap::Parser;
use riddle::{
    build_client, run_feed, ArchiveCompression, ExtensionFilter, ImageDownloader, RedditFeed,
    RunOptions, Settings,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "riddle")]
#[command(about = "Download the hot images of subreddits", long_about = None)]
#[command(version)]
struct Args {
    /// Subreddits to download from
    #[arg(required = true)]
    subreddits: Vec<String>,

    /// Number of posts to list per subreddit (default: as many as available)
    #[arg(short, long)]
    count: Option<usize>,

    /// Output folder or archive name (default: the subreddit name)
    #[arg(short, long)]
    output: Option<String>,

    /// Store the images in <output>.zip
    #[arg(short, long)]
    zip: bool,

    /// Also download posts marked NSFW
    #[arg(long)]
    nsfw: bool,

    /// Use high-ratio compression for the zip file instead of plain storage
    #[arg(long)]
    lzma: bool,

    /// Configuration file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("riddle={}", log_level))
        .init();

    info!("--- riddle reddit downloader ---");

    let settings = Settings::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let credentials = settings
        .require_credentials()
        .context("reddit credentials are required")?
        .clone();

    let downloader = ImageDownloader::from_settings(&settings)?;
    let feed = RedditFeed::new(build_client(&settings)?, credentials);
    let filter = ExtensionFilter::new(settings.threshold().extensions);

    let options = RunOptions {
        count: args.count,
        output: args.output,
        zip: args.zip,
        nsfw: args.nsfw,
        compression: if args.lzma {
            ArchiveCompression::Xz
        } else {
            ArchiveCompression::Stored
        },
    };

    let mut failed_feeds = 0;
    for subreddit in &args.subreddits {
        match run_feed(&feed, &downloader, &filter, subreddit, &options).await {
            Ok(report) => info!(
                "r/{}: {} new, {} already present, {} failed",
                report.feed,
                report.counters.succeeded,
                report.counters.pre_existing,
                report.counters.failed
            ),
            Err(e) => {
                error!("❌ r/{}: {}", subreddit, e);
                failed_feeds += 1;
            }
        }
    }

    if failed_feeds > 0 {
        eprintln!("❌ {} of {} feeds failed", failed_feeds, args.subreddits.len());
        std::process::exit(1);
    }
    info!("[+] All downloads finished");
    Ok(())
}
