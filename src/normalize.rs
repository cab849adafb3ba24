//! Catalog normalization: raw video records in, a consistent snapshot out.

use crate::estimate::{estimate_duration, match_genre, resolve_bpm};
use crate::parsing::{
    extract_artist_and_title, extract_collaborators, format_view_count, is_label,
    normalize_duration, parse_view_count, resolve_publish_date,
};
use crate::stats::label_stats;
use crate::types::{
    Artist, CatalogSnapshot, RawVideoRecord, Track, DEFAULT_COUNTRY, DEFAULT_LABEL_NAME,
    DURATION_UNAVAILABLE, FALLBACK_GENRE, PLACEHOLDER_ARTWORK, PLACEHOLDER_AVATAR,
};
use chrono::{Local, NaiveDate};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Most genres kept per artist.
pub const MAX_ARTIST_GENRES: usize = 2;

const AUDIO_NAME_LIMIT: usize = 40;
const UNTITLED: &str = "Untitled";

/// Settings for one normalization run.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// The label's own name; credited tracks under it have no artist
    pub label_name: String,
    /// Date of the run, used for undated tracks and relative publish texts
    pub run_date: NaiveDate,
    /// Genre for titles matching no keyword
    pub fallback_genre: String,
    /// Country shown on every artist card
    pub country: String,
    /// Known tempos by video id, preferred over any table estimate
    pub bpm_overrides: BTreeMap<String, u32>,
    /// Replace the "not yet available" duration with a hash-picked estimate
    pub estimate_missing_durations: bool,
}

impl NormalizeOptions {
    pub fn new(label_name: impl Into<String>, run_date: NaiveDate) -> Self {
        Self {
            label_name: label_name.into(),
            run_date,
            ..Self::default()
        }
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            label_name: DEFAULT_LABEL_NAME.to_string(),
            run_date: Local::now().date_naive(),
            fallback_genre: FALLBACK_GENRE.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            bpm_overrides: BTreeMap::new(),
            estimate_missing_durations: false,
        }
    }
}

/// Turns raw video records into a [`CatalogSnapshot`].
///
/// Normalization never fails. Records with neither a title nor a video id
/// are dropped, as are repeats of an already emitted video id; everything
/// else becomes a track, with fallback values standing in for whatever could
/// not be parsed.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use label_catalog::{CatalogNormalizer, NormalizeOptions, RawVideoRecord};
///
/// let options = NormalizeOptions::new("My Label", NaiveDate::from_ymd_opt(2025, 12, 20).unwrap());
/// let normalizer = CatalogNormalizer::new(options);
///
/// let snapshot = normalizer.normalize(&[RawVideoRecord {
///     title: "Nova x Kai - Drift (Official Video)".to_string(),
///     video_id: "abc123".to_string(),
///     view_count_text: "2.9K views".to_string(),
///     ..Default::default()
/// }]);
///
/// assert_eq!(snapshot.tracks[0].title, "Drift");
/// assert_eq!(snapshot.artists.len(), 2);
/// assert_eq!(snapshot.label_stats.total_streams, 2_900);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogNormalizer {
    options: NormalizeOptions,
}

impl CatalogNormalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Build a snapshot from records in source listing order.
    ///
    /// Track numbers are positions in the emitted catalog, so reordering the
    /// source renumbers unrelated tracks.
    pub fn normalize(&self, records: &[RawVideoRecord]) -> CatalogSnapshot {
        let mut tracks = Vec::with_capacity(records.len());
        let mut seen_ids = HashSet::new();

        for (index, record) in records.iter().enumerate() {
            if !record.has_identity() {
                log::debug!("Skipping record {index}: no title and no video id");
                continue;
            }

            let video_id = record.video_id.trim();
            if !video_id.is_empty() && !seen_ids.insert(video_id.to_string()) {
                log::debug!("Skipping record {index}: duplicate video id {video_id}");
                continue;
            }

            let number = tracks.len() as u32 + 1;
            tracks.push(self.build_track(number, record));
        }

        let artists = self.aggregate_artists(&tracks);
        let label_stats = label_stats(&tracks, &self.options.label_name);

        log::info!(
            "Normalized {} of {} records into {} tracks and {} artists ({} streams)",
            tracks.len(),
            records.len(),
            tracks.len(),
            artists.len(),
            label_stats.total_streams_formatted
        );

        CatalogSnapshot {
            generated_on: self.options.run_date,
            tracks,
            artists,
            label_stats,
        }
    }

    /// Normalize a single record into the track at position `number`.
    pub fn build_track(&self, number: u32, record: &RawVideoRecord) -> Track {
        let options = &self.options;
        let video_id = record.video_id.trim().to_string();

        let parsed = extract_artist_and_title(&record.title, &options.label_name);
        let title = if parsed.title.is_empty() {
            UNTITLED.to_string()
        } else {
            parsed.title
        };

        let genre = match_genre(&record.title)
            .map(str::to_string)
            .unwrap_or_else(|| options.fallback_genre.clone());

        let bpm = resolve_bpm(
            &record.title,
            &genre,
            options.bpm_overrides.get(&video_id).copied(),
        );
        log::debug!("Track {number} '{title}': {} BPM from {:?}", bpm.bpm, bpm.source);

        let mut duration = normalize_duration(&record.duration_text);
        if duration == DURATION_UNAVAILABLE && options.estimate_missing_durations {
            duration = estimate_duration(&title);
        }

        let date = resolve_publish_date(&record.published_text, options.run_date)
            .unwrap_or(options.run_date);

        let views = parse_view_count(&record.view_count_text);

        Track {
            number,
            youtube_url: youtube_url(&video_id),
            audio_file: audio_file(number, &title),
            artwork: artwork_url(&record.thumbnail_url, &video_id),
            title,
            artist: parsed.artist,
            genre,
            date: date.format("%Y-%m-%d").to_string(),
            plays: format_view_count(views),
            views_num: views,
            duration,
            bpm: bpm.bpm,
            video_id,
        }
    }

    /// Group tracks by credited collaborator.
    ///
    /// Every collaborator other than the label gets the full view count of
    /// each track crediting them; views are duplicated across collaborators,
    /// not split. The result is ranked by total views, ties keeping the order
    /// in which artists first appeared.
    pub fn aggregate_artists(&self, tracks: &[Track]) -> Vec<Artist> {
        let mut order: Vec<ArtistAccumulator> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for track in tracks {
            for name in extract_collaborators(&track.artist, &track.title) {
                if is_label(&name, &self.options.label_name) {
                    continue;
                }
                let position = *positions.entry(name.clone()).or_insert_with(|| {
                    order.push(ArtistAccumulator::new(name.clone(), &track.artwork));
                    order.len() - 1
                });
                order[position].add(track);
            }
        }

        let mut artists: Vec<Artist> = order
            .into_iter()
            .map(|acc| acc.finish(&self.options))
            .collect();
        artists.sort_by(|a, b| b.total_views.cmp(&a.total_views));
        artists
    }
}

struct ArtistAccumulator {
    name: String,
    genres: Vec<String>,
    track_count: u32,
    total_views: u64,
    artwork: String,
}

impl ArtistAccumulator {
    fn new(name: String, artwork: &str) -> Self {
        Self {
            name,
            genres: Vec::new(),
            track_count: 0,
            total_views: 0,
            artwork: artwork.to_string(),
        }
    }

    fn add(&mut self, track: &Track) {
        self.track_count += 1;
        self.total_views = self.total_views.saturating_add(track.views_num);
        if self.genres.len() < MAX_ARTIST_GENRES && !self.genres.contains(&track.genre) {
            self.genres.push(track.genre.clone());
        }
    }

    fn finish(self, options: &NormalizeOptions) -> Artist {
        let releases = if self.track_count == 1 {
            "release"
        } else {
            "releases"
        };
        let (image, avatar) = if self.artwork.is_empty() {
            (PLACEHOLDER_ARTWORK.to_string(), PLACEHOLDER_AVATAR.to_string())
        } else {
            (self.artwork.clone(), self.artwork)
        };
        let total_views_formatted = format_view_count(self.total_views);

        Artist {
            bio: format!(
                "Electronic music producer signed to {}. {} {releases} on the label.",
                options.label_name, self.track_count
            ),
            name: self.name,
            genres: self.genres,
            image,
            avatar,
            track_count: self.track_count,
            total_views: self.total_views,
            followers_formatted: format_view_count(self.total_views / 10),
            streams_formatted: total_views_formatted.clone(),
            total_views_formatted,
            country: options.country.clone(),
        }
    }
}

/// Watch URL for a video id; empty for placeholder tracks.
pub fn youtube_url(video_id: &str) -> String {
    if video_id.is_empty() {
        String::new()
    } else {
        format!("https://www.youtube.com/watch?v={video_id}")
    }
}

/// Local audio path: `music/007_Some_Title.mp3`.
pub fn audio_file(number: u32, title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(AUDIO_NAME_LIMIT)
        .collect();
    format!("music/{number:03}_{stem}.mp3")
}

/// Artwork for a track: the thumbnail without query parameters, else the
/// video's max-resolution still, else a placeholder image.
pub fn artwork_url(thumbnail: &str, video_id: &str) -> String {
    let thumbnail = thumbnail.trim();
    let thumbnail = thumbnail.split('?').next().unwrap_or_default();
    if !thumbnail.is_empty() && !thumbnail.starts_with("data:") {
        thumbnail.to_string()
    } else if !video_id.is_empty() {
        format!("https://i.ytimg.com/vi/{video_id}/maxresdefault.jpg")
    } else {
        PLACEHOLDER_ARTWORK.to_string()
    }
}
