//! Label statistics, rankings and the statistics document.

use crate::parsing::{extract_collaborators, format_view_count, is_label};
use crate::types::{
    Artist, ArtistSummary, ArtistTrackRef, CatalogSnapshot, LabelStats, StatsDocument, Track,
};
use std::collections::HashSet;

/// Default length of the "top releases" list.
pub const DEFAULT_TOP_RELEASES: usize = 8;
/// Default length of the "top artists" list.
pub const DEFAULT_TOP_ARTISTS: usize = 3;
/// Tracks listed under each artist summary.
pub const ARTIST_TOP_TRACKS: usize = 3;

/// Recompute label-wide totals from the track list alone.
///
/// `total_artists` counts distinct collaborators other than the label, so it
/// agrees with the artist list the normalizer builds from the same tracks.
pub fn label_stats(tracks: &[Track], label: &str) -> LabelStats {
    let total_streams = sum_views(tracks.iter().map(|t| t.views_num));

    let artists: HashSet<String> = tracks
        .iter()
        .flat_map(|t| extract_collaborators(&t.artist, &t.title))
        .filter(|name| !is_label(name, label))
        .collect();

    LabelStats {
        total_streams,
        total_streams_formatted: format_view_count(total_streams),
        total_tracks: tracks.len() as u32,
        total_artists: artists.len() as u32,
    }
}

/// Sum of view counts, saturating at `u64::MAX`.
pub fn sum_views(views: impl IntoIterator<Item = u64>) -> u64 {
    views.into_iter().fold(0, u64::saturating_add)
}

/// Tracks ordered by views, most viewed first; ties keep catalog order.
pub fn rank_tracks(tracks: &[Track]) -> Vec<&Track> {
    let mut ranked: Vec<&Track> = tracks.iter().collect();
    ranked.sort_by(|a, b| b.views_num.cmp(&a.views_num));
    ranked
}

/// The `n` most viewed tracks.
pub fn top_releases(tracks: &[Track], n: usize) -> Vec<Track> {
    rank_tracks(tracks).into_iter().take(n).cloned().collect()
}

/// The first `n` artists of an already ranked artist list.
pub fn top_artists(artists: &[Artist], n: usize) -> &[Artist] {
    &artists[..n.min(artists.len())]
}

/// Build one summary per artist, in the snapshot's artist order.
pub fn artist_summaries(snapshot: &CatalogSnapshot) -> Vec<ArtistSummary> {
    let ranked = rank_tracks(&snapshot.tracks);
    let credits: Vec<(&Track, Vec<String>)> = ranked
        .into_iter()
        .map(|t| (t, extract_collaborators(&t.artist, &t.title)))
        .collect();

    snapshot
        .artists
        .iter()
        .map(|artist| {
            let top_tracks = credits
                .iter()
                .filter(|(_, names)| names.iter().any(|n| n == &artist.name))
                .take(ARTIST_TOP_TRACKS)
                .map(|(track, _)| ArtistTrackRef {
                    title: track.title.clone(),
                    views: track.views_num,
                    views_formatted: track.plays.clone(),
                    video_id: track.video_id.clone(),
                })
                .collect();

            ArtistSummary {
                name: artist.name.clone(),
                total_views: artist.total_views,
                total_views_formatted: artist.total_views_formatted.clone(),
                track_count: artist.track_count,
                image: artist.image.clone(),
                avatar: artist.avatar.clone(),
                genres: artist.genres.clone(),
                top_tracks,
            }
        })
        .collect()
}

impl StatsDocument {
    /// Derive the statistics document for a snapshot.
    pub fn from_snapshot(
        snapshot: &CatalogSnapshot,
        top_release_count: usize,
        top_artist_count: usize,
    ) -> Self {
        let all_artists = artist_summaries(snapshot);
        let top_artists = all_artists.iter().take(top_artist_count).cloned().collect();

        Self {
            label_stats: snapshot.label_stats.clone(),
            top_releases: top_releases(&snapshot.tracks, top_release_count),
            top_artists,
            all_artists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{CatalogNormalizer, NormalizeOptions};
    use crate::types::RawVideoRecord;
    use chrono::NaiveDate;

    fn snapshot(entries: &[(&str, &str, &str)]) -> CatalogSnapshot {
        let records: Vec<RawVideoRecord> = entries
            .iter()
            .map(|(title, id, views)| RawVideoRecord {
                title: title.to_string(),
                video_id: id.to_string(),
                view_count_text: views.to_string(),
                ..Default::default()
            })
            .collect();
        let options = NormalizeOptions::new("WSR", NaiveDate::from_ymd_opt(2025, 12, 20).unwrap());
        CatalogNormalizer::new(options).normalize(&records)
    }

    #[test]
    fn test_label_stats_excludes_label() {
        let snap = snapshot(&[
            ("Nova - One", "a", "1,000 views"),
            ("Label Showcase", "b", "500 views"),
            ("Nova & Kai - Two", "c", "2K views"),
        ]);
        let stats = label_stats(&snap.tracks, "WSR");
        assert_eq!(stats.total_streams, 3_500);
        assert_eq!(stats.total_streams_formatted, "3.5K");
        assert_eq!(stats.total_tracks, 3);
        assert_eq!(stats.total_artists, 2);
        assert_eq!(stats, snap.label_stats);
    }

    #[test]
    fn test_rank_tracks_is_stable() {
        let snap = snapshot(&[
            ("A - One", "a", "10"),
            ("B - Two", "b", "30"),
            ("C - Three", "c", "10"),
        ]);
        let ranked: Vec<&str> = rank_tracks(&snap.tracks)
            .iter()
            .map(|t| t.video_id.as_str())
            .collect();
        assert_eq!(ranked, vec!["b", "a", "c"]);
        assert_eq!(top_releases(&snap.tracks, 8).len(), 3);
        assert_eq!(top_artists(&snap.artists, 2).len(), 2);
    }

    #[test]
    fn test_artist_summaries_list_top_tracks() {
        let snap = snapshot(&[
            ("Nova - One", "a", "10"),
            ("Nova - Two", "b", "40"),
            ("Nova x Kai - Three", "c", "20"),
            ("Nova - Four", "d", "30"),
        ]);
        let summaries = artist_summaries(&snap);
        let nova = &summaries[0];
        assert_eq!(nova.name, "Nova");
        assert_eq!(nova.total_views, 100);
        let ids: Vec<&str> = nova.top_tracks.iter().map(|t| t.video_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c"]);

        let doc = StatsDocument::from_snapshot(&snap, 2, 1);
        assert_eq!(doc.top_releases.len(), 2);
        assert_eq!(doc.top_artists.len(), 1);
        assert_eq!(doc.all_artists.len(), 2);
    }
}
