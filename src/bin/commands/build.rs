use super::utils::{create_fetcher, resolve_dir};
use chrono::{Local, NaiveDate};
use label_catalog::publish::TemplateTarget;
use label_catalog::source::{load_records, records_from_channel_html, ChannelCollector};
use label_catalog::{CatalogConfig, CatalogNormalizer, CatalogPublisher, SnapshotSink};
use std::fs;
use std::path::PathBuf;

/// Where the build command takes its records from
pub enum BuildSource {
    Records(PathBuf),
    Html(PathBuf),
    Fetch,
}

/// Handle the build command
pub async fn handle_build(
    config: &CatalogConfig,
    source: BuildSource,
    out_dir: Option<PathBuf>,
    template: Option<(PathBuf, PathBuf)>,
    date: Option<NaiveDate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = match source {
        BuildSource::Records(path) => load_records(&path)?,
        BuildSource::Html(path) => records_from_channel_html(&fs::read_to_string(&path)?)?,
        BuildSource::Fetch => {
            println!("🌐 Fetching {}", config.videos_url());
            ChannelCollector::new(create_fetcher(config), config.videos_url())
                .collect()
                .await?
        }
    };
    println!("📥 {} raw records", records.len());

    let run_date = date.unwrap_or_else(|| Local::now().date_naive());
    let normalizer = CatalogNormalizer::new(config.normalize_options(run_date));
    let snapshot = normalizer.normalize(&records);

    let out_dir = resolve_dir(out_dir, config);
    let mut publisher = CatalogPublisher::new(&out_dir, config.label_name.as_str())
        .with_top_counts(config.top_releases, config.top_artists);
    if let Some((template, output)) = template {
        publisher = publisher.with_template(TemplateTarget { template, output });
    }
    publisher.materialize(&snapshot)?;

    let stats = &snapshot.label_stats;
    println!(
        "✅ Published {} tracks by {} artists ({} streams) to {}",
        stats.total_tracks,
        stats.total_artists,
        stats.total_streams_formatted,
        out_dir.display()
    );
    if let Some(top) = snapshot.artists.first() {
        println!("🏆 Top artist: {} ({})", top.name, top.total_views_formatted);
    }
    Ok(())
}
