use super::stats_output::{output_event, StatsEvent};
use super::utils::resolve_dir;
use label_catalog::stats::top_releases;
use label_catalog::{CatalogConfig, CatalogPublisher};
use std::path::PathBuf;

/// Handle the stats command
pub fn handle_stats(
    config: &CatalogConfig,
    dir: Option<PathBuf>,
    top: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = resolve_dir(dir, config);
    let (catalog, stats) =
        CatalogPublisher::new(&dir, config.label_name.as_str()).load_documents()?;
    log::info!("Reading statistics from {}", dir.display());

    output_event(&StatsEvent::LabelTotals {
        stats: catalog.channel_stats.clone(),
    });

    let releases = top_releases(&catalog.tracks, top.unwrap_or(config.top_releases));
    for (index, track) in releases.into_iter().enumerate() {
        output_event(&StatsEvent::TopRelease {
            rank: index + 1,
            track,
        });
    }

    for (index, artist) in stats.top_artists.into_iter().enumerate() {
        output_event(&StatsEvent::TopArtist {
            rank: index + 1,
            artist,
        });
    }

    log::info!(
        "{} tracks, {} artists, {} streams",
        catalog.tracks.len(),
        catalog.artists.len(),
        catalog.channel_stats.total_streams_formatted
    );
    Ok(())
}
