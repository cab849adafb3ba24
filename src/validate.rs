//! Consistency checks over persisted catalog documents.
//!
//! Validation is read-only: it recomputes statistics from the track list and
//! reports every disagreement as a [`ValidationIssue`] instead of failing.

use crate::parsing::{extract_collaborators, format_view_count};
use crate::stats::sum_views;
use crate::types::{CatalogDocument, LabelStats, StatsDocument, DURATION_UNAVAILABLE};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Allowed difference between stored and recomputed total streams.
pub const DEFAULT_TOLERANCE: u64 = 1000;

static EMBEDDED_STATS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"window\.artistStatsJson\s*=\s*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{tag}: {}", self.message)
    }
}

/// Everything a validation run found, plus the recomputed totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub recomputed_streams: u64,
    pub track_count: usize,
    pub artist_count: usize,
}

impl ValidationReport {
    /// True when no issue of [`Severity::Error`] was found.
    pub fn is_consistent(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Check a rendered page against the statistics document.
    ///
    /// The page must embed the statistics through the `catalogScript`
    /// placeholder; its label totals are then compared field by field. A page
    /// without the embedded block only earns a warning since the template
    /// may simply not use it.
    pub fn check_rendered(&mut self, markup: &str, stats: &StatsDocument) {
        let Some(embedded) = embedded_label_stats(markup) else {
            self.warning("rendered page embeds no statistics".to_string());
            return;
        };

        let expected = &stats.label_stats;
        let fields = [
            (
                "streams",
                embedded.total_streams_formatted,
                expected.total_streams_formatted.clone(),
            ),
            (
                "artists",
                embedded.total_artists.to_string(),
                expected.total_artists.to_string(),
            ),
            (
                "releases",
                embedded.total_tracks.to_string(),
                expected.total_tracks.to_string(),
            ),
        ];
        for (field, shown, wanted) in fields {
            if shown != wanted {
                self.error(format!(
                    "rendered page shows {shown} {field}, statistics document has {wanted}"
                ));
            }
        }
    }

    fn error(&mut self, message: String) {
        log::debug!("validation error: {message}");
        self.issues.push(ValidationIssue {
            severity: Severity::Error,
            message,
        });
    }

    fn warning(&mut self, message: String) {
        log::debug!("validation warning: {message}");
        self.issues.push(ValidationIssue {
            severity: Severity::Warning,
            message,
        });
    }
}

/// Check a catalog document and its statistics document against each other.
///
/// `tolerance` bounds the accepted difference between the sum of the
/// tracks' view counts and the total streams stored in either document.
pub fn validate(
    catalog: &CatalogDocument,
    stats: &StatsDocument,
    tolerance: u64,
) -> ValidationReport {
    let tracks = &catalog.tracks;
    let mut report = ValidationReport {
        recomputed_streams: sum_views(tracks.iter().map(|t| t.views_num)),
        track_count: tracks.len(),
        artist_count: catalog.artists.len(),
        ..Default::default()
    };

    if tracks.is_empty() {
        report.error("catalog contains no tracks".to_string());
    }

    let stored = &catalog.channel_stats;
    for (document, total) in [
        ("catalog", stored.total_streams),
        ("statistics", stats.label_stats.total_streams),
    ] {
        let difference = total.abs_diff(report.recomputed_streams);
        if difference > tolerance {
            report.error(format!(
                "{document} total streams {total} differ from track sum {} by {difference} (tolerance {tolerance})",
                report.recomputed_streams
            ));
        }
    }
    if stored.total_tracks as usize != tracks.len() {
        report.error(format!(
            "totalTracks is {} but the catalog has {} tracks",
            stored.total_tracks,
            tracks.len()
        ));
    }
    if stored.total_artists as usize != catalog.artists.len() {
        report.error(format!(
            "totalArtists is {} but the catalog has {} artists",
            stored.total_artists,
            catalog.artists.len()
        ));
    }

    for track in tracks {
        let expected = format_view_count(track.views_num);
        if track.plays != expected {
            report.error(format!(
                "track {} '{}' shows {} plays but has {} views ({expected})",
                track.number, track.title, track.plays, track.views_num
            ));
        }
    }

    let credits: Vec<Vec<String>> = tracks
        .iter()
        .map(|t| extract_collaborators(&t.artist, &t.title))
        .collect();
    for artist in &catalog.artists {
        let (count, views) = tracks
            .iter()
            .zip(&credits)
            .filter(|(_, names)| names.contains(&artist.name))
            .fold((0u32, 0u64), |(count, views), (track, _)| {
                (count + 1, views.saturating_add(track.views_num))
            });
        if count != artist.track_count || views != artist.total_views {
            report.error(format!(
                "artist '{}' lists {} tracks / {} views, tracks give {count} / {views}",
                artist.name, artist.track_count, artist.total_views
            ));
        }
    }

    if !tracks.is_empty() {
        if stats.top_releases.is_empty() {
            report.error("topReleases is empty".to_string());
        }
        if stats.top_artists.is_empty() && !catalog.artists.is_empty() {
            report.error("topArtists is empty".to_string());
        }
    }

    let missing_ids = tracks.iter().filter(|t| t.video_id.is_empty()).count();
    if missing_ids > 0 {
        report.warning(format!("{missing_ids} track(s) have no video id"));
    }

    let pending = tracks
        .iter()
        .filter(|t| t.duration == DURATION_UNAVAILABLE)
        .count();
    if pending * 2 > tracks.len() {
        report.warning(format!(
            "{pending} of {} tracks have no duration yet",
            tracks.len()
        ));
    }

    log::info!(
        "Validated {} tracks and {} artists: {} error(s), {} warning(s)",
        report.track_count,
        report.artist_count,
        report.errors().count(),
        report.warnings().count()
    );
    report
}

fn embedded_label_stats(markup: &str) -> Option<LabelStats> {
    let assignment = EMBEDDED_STATS.find(markup)?;
    let mut stream =
        serde_json::Deserializer::from_str(&markup[assignment.end()..]).into_iter::<Value>();
    let mut document = stream.next()?.ok()?;
    serde_json::from_value(document.get_mut("labelStats")?.take()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{CatalogNormalizer, NormalizeOptions};
    use crate::types::RawVideoRecord;
    use chrono::NaiveDate;

    fn documents() -> (CatalogDocument, StatsDocument) {
        let records = vec![
            RawVideoRecord {
                title: "Nova - One".to_string(),
                video_id: "a".to_string(),
                view_count_text: "12,345 views".to_string(),
                duration_text: "3:10".to_string(),
                ..Default::default()
            },
            RawVideoRecord {
                title: "Nova x Kai - Two".to_string(),
                video_id: "b".to_string(),
                view_count_text: "1.2M views".to_string(),
                duration_text: "PT4M2S".to_string(),
                ..Default::default()
            },
        ];
        let options = NormalizeOptions::new("WSR", NaiveDate::from_ymd_opt(2025, 12, 20).unwrap());
        let snapshot = CatalogNormalizer::new(options).normalize(&records);
        let stats = StatsDocument::from_snapshot(&snapshot, 8, 3);
        (CatalogDocument::from(&snapshot), stats)
    }

    #[test]
    fn test_fresh_documents_are_consistent() {
        let (catalog, stats) = documents();
        let report = validate(&catalog, &stats, DEFAULT_TOLERANCE);
        assert!(report.is_consistent(), "{:?}", report.issues);
        assert_eq!(report.recomputed_streams, 1_212_345);
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn test_stream_drift_within_tolerance() {
        let (mut catalog, mut stats) = documents();
        catalog.channel_stats.total_streams += 900;
        stats.label_stats.total_streams += 900;
        assert!(validate(&catalog, &stats, DEFAULT_TOLERANCE).is_consistent());

        catalog.channel_stats.total_streams += 200;
        stats.label_stats.total_streams += 200;
        assert!(!validate(&catalog, &stats, DEFAULT_TOLERANCE).is_consistent());
    }

    #[test]
    fn test_detects_tampered_fields() {
        let (mut catalog, stats) = documents();
        catalog.tracks[0].plays = "99K".to_string();
        catalog.artists[0].total_views += 1;
        let report = validate(&catalog, &stats, DEFAULT_TOLERANCE);
        assert_eq!(report.errors().count(), 2);
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let (mut catalog, mut stats) = documents();
        catalog.tracks.clear();
        catalog.artists.clear();
        catalog.channel_stats = Default::default();
        stats.label_stats = Default::default();
        let report = validate(&catalog, &stats, DEFAULT_TOLERANCE);
        assert!(!report.is_consistent());
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_pending_durations_warn() {
        let (mut catalog, stats) = documents();
        for track in &mut catalog.tracks {
            track.duration = DURATION_UNAVAILABLE.to_string();
        }
        let report = validate(&catalog, &stats, DEFAULT_TOLERANCE);
        assert!(report.is_consistent());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_statistics_document_drift_uses_tolerance() {
        let (catalog, mut stats) = documents();
        stats.label_stats.total_streams += 500;
        let report = validate(&catalog, &stats, DEFAULT_TOLERANCE);
        assert!(report.is_consistent(), "{:?}", report.issues);

        stats.label_stats.total_streams += 1_000;
        let report = validate(&catalog, &stats, DEFAULT_TOLERANCE);
        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("statistics total streams"));
    }

    #[test]
    fn test_rendered_page_is_checked_against_statistics() {
        let (_, stats) = documents();
        let script = serde_json::to_string(&stats).unwrap();
        let markup = format!("<script>\nwindow.artistStatsJson = {script};\n</script>");

        let mut report = ValidationReport::default();
        report.check_rendered(&markup, &stats);
        assert!(report.issues.is_empty(), "{:?}", report.issues);

        let mut stale = stats.clone();
        stale.label_stats.total_artists = 5;
        let stale_markup = format!(
            "window.artistStatsJson = {};",
            serde_json::to_string(&stale).unwrap()
        );
        let mut report = ValidationReport::default();
        report.check_rendered(&stale_markup, &stats);
        assert_eq!(report.errors().count(), 1);
        assert_eq!(
            report.issues[0].message,
            "rendered page shows 5 artists, statistics document has 2"
        );

        let mut report = ValidationReport::default();
        report.check_rendered("<html><body>static page</body></html>", &stats);
        assert!(report.is_consistent());
        assert_eq!(report.warnings().count(), 1);
    }
}
