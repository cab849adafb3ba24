pub mod build;
pub mod scrape;
pub mod stats;
pub mod stats_output;
pub mod utils;
pub mod validate;

use chrono::NaiveDate;
use clap::{ArgGroup, Subcommand};
use label_catalog::CatalogConfig;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Collect raw video records into a JSON file
    ///
    /// Records come from a saved channel page (--html), from oEmbed lookups
    /// of individual videos (--video-id), or by default from the channel's
    /// live /videos page.
    ///
    /// Usage examples:
    /// # Scrape the configured channel
    /// label-catalog scrape --out raw_videos.json
    ///
    /// # Parse a page saved from the browser
    /// label-catalog scrape --html channel.html --out raw_videos.json
    ///
    /// # Look up two videos individually
    /// label-catalog scrape --video-id dQw4w9WgXcQ --video-id 9bZkp7q19f0 --out raw_videos.json
    Scrape {
        /// Channel URL, overriding the configured one
        #[arg(long)]
        channel_url: Option<String>,

        /// Parse this saved channel page instead of fetching
        #[arg(long, conflicts_with = "channel_url")]
        html: Option<PathBuf>,

        /// Look up these videos through oEmbed (repeatable)
        #[arg(long = "video-id", conflicts_with_all = ["channel_url", "html"])]
        video_ids: Vec<String>,

        /// Output file for the raw records
        #[arg(long)]
        out: PathBuf,
    },

    /// Normalize records into a catalog and publish it
    ///
    /// Writes youtube_data.json and artist_stats.json into the output
    /// directory, keeping one .bak copy of each previous file.
    ///
    /// Usage examples:
    /// # Build from a raw record file
    /// label-catalog build --input raw_videos.json --out-dir site/
    ///
    /// # Fetch, build and render the landing page
    /// label-catalog build --fetch --template index.tpl.html --render site/index.html
    #[command(group(ArgGroup::new("source").required(true).args(["input", "html", "fetch"])))]
    Build {
        /// Raw record file written by `scrape`
        #[arg(long)]
        input: Option<PathBuf>,

        /// Saved channel page
        #[arg(long)]
        html: Option<PathBuf>,

        /// Fetch the configured channel's /videos page
        #[arg(long)]
        fetch: bool,

        /// Output directory (defaults to the configured one)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Template with {{placeholder}} fields
        #[arg(long, requires = "render")]
        template: Option<PathBuf>,

        /// Where to write the rendered template
        #[arg(long, requires = "template")]
        render: Option<PathBuf>,

        /// Run date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Check published documents for consistency
    ///
    /// Prints every issue found; exits non-zero when any is an error.
    Validate {
        /// Directory holding the documents (defaults to the configured one)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Accepted drift in total streams
        #[arg(long)]
        tolerance: Option<u64>,

        /// Also check a page rendered by `build --render`
        #[arg(long)]
        rendered: Option<PathBuf>,
    },

    /// Print label statistics and rankings as JSON lines
    Stats {
        /// Directory holding the documents (defaults to the configured one)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Number of top releases to list
        #[arg(long)]
        top: Option<usize>,
    },
}

pub async fn execute_command(
    command: Commands,
    config: CatalogConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Scrape {
            channel_url,
            html,
            video_ids,
            out,
        } => scrape::handle_scrape(&config, channel_url, html, &video_ids, &out).await,
        Commands::Build {
            input,
            html,
            fetch,
            out_dir,
            template,
            render,
            date,
        } => {
            let source = if let Some(path) = input {
                build::BuildSource::Records(path)
            } else if let Some(path) = html {
                build::BuildSource::Html(path)
            } else {
                debug_assert!(fetch);
                build::BuildSource::Fetch
            };
            let target = template.zip(render);
            build::handle_build(&config, source, out_dir, target, date).await
        }
        Commands::Validate {
            dir,
            tolerance,
            rendered,
        } => validate::handle_validate(&config, dir, tolerance, rendered),
        Commands::Stats { dir, top } => stats::handle_stats(&config, dir, top),
    }
}
