//! Data types for the label catalog.
//!
//! This module contains the core data structures used throughout the crate:
//! the raw records produced by source collectors, the canonical `Track` and
//! `Artist` entries, label-wide statistics and the two persisted documents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the label that owns the catalog.
///
/// Also used as the artist of any video whose title credits nobody else.
pub const DEFAULT_LABEL_NAME: &str = "World Studio Records";

/// Genre assigned when no keyword matches a title.
pub const FALLBACK_GENRE: &str = "Electronic";

/// Duration shown on the site while a release is not out yet ("coming soon").
pub const DURATION_UNAVAILABLE: &str = "Brevemente";

/// Image used when neither a thumbnail nor a video id is available.
pub const PLACEHOLDER_ARTWORK: &str =
    "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=400";

/// Avatar used for artists whose first track has no artwork.
pub const PLACEHOLDER_AVATAR: &str =
    "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde?w=200";

/// Country shown on artist cards.
pub const DEFAULT_COUNTRY: &str = "🌍 Global";

// ================================================================================================
// RAW SOURCE RECORDS
// ================================================================================================

/// A video listing entry exactly as a source collector found it.
///
/// Every field is the platform-rendered text, unparsed. Records are consumed
/// once by the normalizer and never persisted as part of the catalog (the
/// `scrape` command can still dump them for a later `build`).
///
/// # Examples
///
/// ```rust
/// use label_catalog::RawVideoRecord;
///
/// let record = RawVideoRecord {
///     title: "Nova Kai - Midnight Drive (Official Video)".to_string(),
///     video_id: "dQw4w9WgXcQ".to_string(),
///     view_count_text: "2,934 views".to_string(),
///     duration_text: "3:45".to_string(),
///     thumbnail_url: "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg?sqp=abc".to_string(),
///     published_text: "2 weeks ago".to_string(),
/// };
/// assert!(record.has_identity());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawVideoRecord {
    /// Full video title, including artist and marketing tags
    pub title: String,
    /// Opaque platform video identifier
    pub video_id: String,
    /// View count text such as "1.2M views" or "1,234 views"
    pub view_count_text: String,
    /// Duration text, either clock style ("3:45") or ISO 8601 ("PT3M45S")
    pub duration_text: String,
    /// Thumbnail image URL
    pub thumbnail_url: String,
    /// Publish text, either an ISO date or a relative phrase ("3 days ago")
    pub published_text: String,
}

impl RawVideoRecord {
    /// Whether this record can be identified at all.
    ///
    /// A record with neither a title nor a video id is filtered out of the
    /// catalog.
    pub fn has_identity(&self) -> bool {
        !self.title.trim().is_empty() || !self.video_id.trim().is_empty()
    }
}

// ================================================================================================
// CANONICAL CATALOG ENTRIES
// ================================================================================================

/// One canonical catalog entry representing a single release/video.
///
/// `plays` is always `format_view_count(views_num)`; use [`Track::set_views`]
/// to change either so the two never diverge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// 1-based position within this catalog generation
    pub number: u32,
    /// Release title with marketing tags stripped
    pub title: String,
    /// Credited artist field (may name several collaborators or the label)
    pub artist: String,
    /// Inferred genre
    pub genre: String,
    /// ISO 8601 calendar date
    pub date: String,
    /// Human-readable view count ("2.9K")
    pub plays: String,
    /// Exact view count `plays` was derived from
    pub views_num: u64,
    /// "m:ss", "h:mm:ss" or [`DURATION_UNAVAILABLE`]
    pub duration: String,
    /// Estimated or declared tempo, always within 60..=200
    pub bpm: u32,
    /// Artwork image URL
    pub artwork: String,
    /// Platform video identifier, empty only for placeholder rows
    pub video_id: String,
    /// Watch URL derived from `video_id`
    pub youtube_url: String,
    /// Local audio file path derived from `number` and `title`
    pub audio_file: String,
}

impl Track {
    /// Update the view count, keeping `plays` in sync.
    pub fn set_views(&mut self, views: u64) {
        self.views_num = views;
        self.plays = crate::parsing::format_view_count(views);
    }

    /// Whether the duration is still the "not yet available" sentinel.
    pub fn duration_pending(&self) -> bool {
        self.duration == DURATION_UNAVAILABLE
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} [{}]", self.artist, self.title, self.plays)
    }
}

/// An aggregate derived by grouping tracks by credited collaborator.
///
/// Fully recomputed on every normalization run, never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    /// Collaborator name as credited
    pub name: String,
    /// Up to two genres, in the order they were first seen
    pub genres: Vec<String>,
    /// Templated biography line
    pub bio: String,
    /// Artwork of the artist's first track
    pub image: String,
    /// Avatar image (same source as `image`, different placeholder)
    pub avatar: String,
    /// Number of tracks crediting this artist
    pub track_count: u32,
    /// Sum of views over those tracks
    pub total_views: u64,
    /// `format_view_count(total_views)`
    pub total_views_formatted: String,
    /// Estimated follower count, formatted
    pub followers_formatted: String,
    /// Formatted streams (same figure as `total_views_formatted`)
    pub streams_formatted: String,
    /// Country shown on the artist card
    pub country: String,
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ================================================================================================
// STATISTICS AND SNAPSHOTS
// ================================================================================================

/// Label-wide totals, always recomputed from the track list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStats {
    pub total_streams: u64,
    pub total_streams_formatted: String,
    pub total_tracks: u32,
    pub total_artists: u32,
}

/// The full, self-consistent output of one pipeline run.
///
/// Created wholesale by [`crate::CatalogNormalizer::normalize`] and handed to
/// sinks by reference; nothing mutates a snapshot after it is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    /// Run date of the generation
    pub generated_on: NaiveDate,
    pub tracks: Vec<Track>,
    /// Artists ranked by total views, ties in first-seen order
    pub artists: Vec<Artist>,
    pub label_stats: LabelStats,
}

impl CatalogSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Look up an artist by exact name.
    pub fn artist(&self, name: &str) -> Option<&Artist> {
        self.artists.iter().find(|a| a.name == name)
    }
}

/// A track reference listed under an artist summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistTrackRef {
    pub title: String,
    pub views: u64,
    pub views_formatted: String,
    pub video_id: String,
}

/// Artist entry of the statistics document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSummary {
    pub name: String,
    pub total_views: u64,
    pub total_views_formatted: String,
    pub track_count: u32,
    pub image: String,
    pub avatar: String,
    pub genres: Vec<String>,
    /// Up to three of the artist's tracks, most viewed first
    pub top_tracks: Vec<ArtistTrackRef>,
}

/// First persisted document: the tracks and artists themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    pub generated_on: NaiveDate,
    pub tracks: Vec<Track>,
    pub artists: Vec<Artist>,
    pub channel_stats: LabelStats,
}

impl From<&CatalogSnapshot> for CatalogDocument {
    fn from(snapshot: &CatalogSnapshot) -> Self {
        Self {
            generated_on: snapshot.generated_on,
            tracks: snapshot.tracks.clone(),
            artists: snapshot.artists.clone(),
            channel_stats: snapshot.label_stats.clone(),
        }
    }
}

/// Second persisted document: statistics and ranked slices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDocument {
    pub label_stats: LabelStats,
    pub top_releases: Vec<Track>,
    pub top_artists: Vec<ArtistSummary>,
    pub all_artists: Vec<ArtistSummary>,
}
