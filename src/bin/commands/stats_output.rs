use label_catalog::{ArtistSummary, LabelStats, Track};
use serde::{Deserialize, Serialize};

/// Events emitted by the stats command (JSON output to stdout)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatsEvent {
    /// Label-wide totals
    LabelTotals { stats: LabelStats },
    /// One entry of the top releases ranking
    TopRelease { rank: usize, track: Track },
    /// One entry of the top artists ranking
    TopArtist { rank: usize, artist: ArtistSummary },
}

/// Output a stats event as JSON to stdout
pub fn output_event(event: &StatsEvent) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    } else {
        log::error!("Failed to serialize event to JSON");
    }
}
