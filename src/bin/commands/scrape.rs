use super::utils::create_fetcher;
use label_catalog::source::{
    records_from_channel_html, save_records, ChannelCollector, OembedCollector,
};
use label_catalog::CatalogConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Handle the scrape command
pub async fn handle_scrape(
    config: &CatalogConfig,
    channel_url: Option<String>,
    html: Option<PathBuf>,
    video_ids: &[String],
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = if let Some(path) = html {
        println!("📄 Parsing saved page {}", path.display());
        records_from_channel_html(&fs::read_to_string(&path)?)?
    } else if !video_ids.is_empty() {
        println!("🔎 Looking up {} videos", video_ids.len());
        let delay = Duration::from_millis(config.request_delay_ms);
        OembedCollector::new(create_fetcher(config), delay)
            .collect(video_ids)
            .await?
    } else {
        let mut config = config.clone();
        if let Some(url) = channel_url {
            config.channel_url = url;
        }
        println!("🌐 Fetching {}", config.videos_url());
        ChannelCollector::new(create_fetcher(&config), config.videos_url())
            .collect()
            .await?
    };

    save_records(out, &records)?;
    println!("✅ Saved {} records to {}", records.len(), out.display());
    Ok(())
}
