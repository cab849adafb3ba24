//! Field parsers for platform-rendered text.
//!
//! Every function here is pure and defensive: the inputs are scraped or
//! hand-typed strings, so malformed text yields a documented fallback value
//! rather than an error. The normalizer relies on that and never needs to
//! handle per-record failures.

use crate::types::DURATION_UNAVAILABLE;
use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Title separators, in the order they are tried.
///
/// A title containing both " - " and ": " always splits on " - ".
pub const TITLE_SEPARATORS: [&str; 5] = [" - ", " – ", " — ", ": ", " | "];

static UNIT_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:views?|visualizações|visualização|visualizaciones|vues|aufrufe)\b")
        .unwrap()
});

static VIEW_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d[\d.,]*)\s*([A-Za-z]*)").unwrap());

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.\d+)?S)?$").unwrap()
});

static CLOCK_DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):(\d{1,2})(?::(\d{1,2}))?$").unwrap());

static MARKETING_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\s*[\(\[]\s*(?:official[^\)\]]*|visuali[sz]er|lyric[^\)\]]*|audio|music\s+video|hd|4k)\s*[\)\]]",
    )
    .unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static COVER_CREDIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[\(\[]\s*([^\)\]]+?)\s+cover\s*[\)\]]").unwrap());

static RELATIVE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(second|minute|hour|day|week|month|year)s?\s+ago").unwrap()
});

static COLLABORATION_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:x|ft\.?|feat\.?|&)\s+|,\s+").unwrap());

// ================================================================================================
// VIEW COUNTS
// ================================================================================================

/// Parse a platform view count such as "1,234 views", "2.9K views" or "16.0M".
///
/// Unit words are stripped first. A K/M/B suffix (any case, or a spelled-out
/// unit such as "mil") multiplies the mantissa by a thousand, a million or a
/// billion. When a suffix is present `.` is the decimal point and `,` a
/// thousands separator; without one both are thousands separators. Anything
/// unrecognisable parses as 0.
///
/// ```rust
/// use label_catalog::parsing::parse_view_count;
///
/// assert_eq!(parse_view_count("1,234 views"), 1_234);
/// assert_eq!(parse_view_count("16.0M views"), 16_000_000);
/// assert_eq!(parse_view_count("No views"), 0);
/// ```
pub fn parse_view_count(text: &str) -> u64 {
    let cleaned = UNIT_WORDS.replace_all(text, " ");
    let Some(caps) = VIEW_COUNT.captures(&cleaned) else {
        return 0;
    };

    let digits = caps[1].trim_end_matches(['.', ',']);
    let multiplier = suffix_multiplier(&caps[2]);

    if multiplier == 1 {
        return digits.replace([',', '.'], "").parse::<u64>().unwrap_or(0);
    }

    match suffixed_mantissa(digits) {
        Some(mantissa) => (mantissa * multiplier as f64).round() as u64,
        None => 0,
    }
}

/// Multiplier for the word following a number; 1 when it is not a unit.
fn suffix_multiplier(word: &str) -> u64 {
    match word.to_ascii_lowercase().as_str() {
        "k" | "mil" | "thousand" => 1_000,
        "m" | "mi" | "mln" | "million" => 1_000_000,
        "b" | "bn" | "bi" | "billion" => 1_000_000_000,
        _ => 1,
    }
}

/// Mantissa of a suffixed count. "." is the decimal point; "," is a
/// thousands separator unless it is the only separator and ends the number
/// with one or two digits ("1,2 mil").
fn suffixed_mantissa(digits: &str) -> Option<f64> {
    let normalized = match digits.rsplit_once(',') {
        Some((head, tail)) if !digits.contains('.') && (1..=2).contains(&tail.len()) => {
            format!("{}.{}", head.replace(',', ""), tail)
        }
        _ => digits.replace(',', ""),
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite() && *m >= 0.0)
}

/// Render a view count the way the site displays it: "950", "2.9K", "29M".
///
/// The largest unit keeping the mantissa in [1, 1000) is used, rounded half
/// up to one decimal; a trailing ".0" is dropped. The rendering is lossy, so
/// parsing it back only lands within 5% of the original figure.
pub fn format_view_count(views: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

    if views < 1_000 {
        return views.to_string();
    }

    let mut index = UNITS
        .iter()
        .position(|(scale, _)| views >= *scale)
        .unwrap_or(UNITS.len() - 1);
    let mut tenths = round_to_tenths(views, UNITS[index].0);

    // 999,950 rounds to 1000.0K, which reads better as 1M
    if tenths >= 10_000 && index > 0 {
        index -= 1;
        tenths = round_to_tenths(views, UNITS[index].0);
    }

    let suffix = UNITS[index].1;
    let (whole, fraction) = (tenths / 10, tenths % 10);
    if fraction == 0 {
        format!("{whole}{suffix}")
    } else {
        format!("{whole}.{fraction}{suffix}")
    }
}

fn round_to_tenths(value: u64, scale: u64) -> u64 {
    let value = value as u128 * 10;
    let scale = scale as u128;
    ((value + scale / 2) / scale) as u64
}

// ================================================================================================
// DURATIONS
// ================================================================================================

/// Parse a duration into whole seconds.
///
/// Accepts ISO 8601 ("PT1H2M3S"), clock text ("3:45", "1:02:03") and bare
/// seconds ("225"). Returns `None` for anything else.
pub fn duration_seconds(text: &str) -> Option<u64> {
    let text = text.trim();

    if let Some(caps) = ISO_DURATION.captures(text) {
        if caps.get(1).is_none() && caps.get(2).is_none() && caps.get(3).is_none() {
            return None;
        }
        let part = |i: usize| {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .unwrap_or(0)
        };
        return Some(
            part(1)
                .saturating_mul(3600)
                .saturating_add(part(2).saturating_mul(60))
                .saturating_add(part(3)),
        );
    }

    if let Some(caps) = CLOCK_DURATION.captures(text) {
        let first = caps[1].parse::<u64>().ok()?;
        let second = caps[2].parse::<u64>().ok()?;
        return match caps.get(3) {
            Some(third) => {
                let third = third.as_str().parse::<u64>().ok()?;
                (second < 60 && third < 60)
                    .then(|| first.saturating_mul(3600).saturating_add(second * 60 + third))
            }
            None => (second < 60).then(|| first.saturating_mul(60).saturating_add(second)),
        };
    }

    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        return text.parse::<u64>().ok();
    }

    None
}

/// Render whole seconds as "m:ss", or "h:mm:ss" from one hour up.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Normalize any supported duration text to "m:ss" / "h:mm:ss".
///
/// Unparseable or empty text becomes [`DURATION_UNAVAILABLE`].
///
/// ```rust
/// use label_catalog::parsing::normalize_duration;
///
/// assert_eq!(normalize_duration("PT1M30S"), "1:30");
/// assert_eq!(normalize_duration("75:10"), "1:15:10");
/// assert_eq!(normalize_duration(""), "Brevemente");
/// ```
pub fn normalize_duration(text: &str) -> String {
    match duration_seconds(text) {
        Some(seconds) => format_duration(seconds),
        None => DURATION_UNAVAILABLE.to_string(),
    }
}

// ================================================================================================
// TITLES AND CREDITS
// ================================================================================================

/// Artist and release title split out of a video title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistTitle {
    pub artist: String,
    pub title: String,
}

/// Remove bracketed marketing tags ("(Official Video)", "[Lyric Video]",
/// "(Visualizer)", ...) and collapse whitespace.
pub fn strip_marketing_tags(raw_title: &str) -> String {
    let stripped = MARKETING_TAGS.replace_all(raw_title, "");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

/// Split a video title into artist and release title.
///
/// Marketing tags are stripped first, then the separators in
/// [`TITLE_SEPARATORS`] are tried in order; the first one present splits the
/// title at its first occurrence. Without a separator the whole cleaned title
/// is the release and `label` is the artist.
///
/// ```rust
/// use label_catalog::parsing::extract_artist_and_title;
///
/// let parsed = extract_artist_and_title("Artist - Song [Official Video]", "My Label");
/// assert_eq!(parsed.artist, "Artist");
/// assert_eq!(parsed.title, "Song");
/// ```
pub fn extract_artist_and_title(raw_title: &str, label: &str) -> ArtistTitle {
    let mut cleaned = strip_marketing_tags(raw_title);
    if cleaned.is_empty() {
        cleaned = WHITESPACE.replace_all(raw_title.trim(), " ").into_owned();
    }

    for separator in TITLE_SEPARATORS {
        if let Some((artist, title)) = cleaned.split_once(separator) {
            let (artist, title) = (artist.trim(), title.trim());
            if !artist.is_empty() && !title.is_empty() {
                return ArtistTitle {
                    artist: artist.to_string(),
                    title: title.to_string(),
                };
            }
        }
    }

    ArtistTitle {
        artist: label.to_string(),
        title: cleaned,
    }
}

/// Resolve the collaborators credited on a track.
///
/// A "(X Cover)" or "[X Cover]" title credits X alone. Otherwise the artist
/// field is split on " x ", " ft. ", " feat. ", " & " and ", " (any case),
/// each trimmed segment being one collaborator credited equally.
pub fn extract_collaborators(artist_field: &str, title: &str) -> Vec<String> {
    if let Some(caps) = COVER_CREDIT.captures(title) {
        let cover_artist = caps[1].trim();
        if !cover_artist.is_empty() {
            return vec![cover_artist.to_string()];
        }
    }

    let mut collaborators: Vec<String> = Vec::new();
    for segment in COLLABORATION_SEPARATORS.split(artist_field) {
        let name = segment.trim();
        if !name.is_empty() && !collaborators.iter().any(|c| c == name) {
            collaborators.push(name.to_string());
        }
    }
    collaborators
}

/// Whether a credited name is the label itself rather than an artist.
pub fn is_label(name: &str, label: &str) -> bool {
    name.trim().eq_ignore_ascii_case(label.trim())
}

// ================================================================================================
// DATES
// ================================================================================================

/// Resolve a publish text to a calendar date.
///
/// ISO dates ("2025-12-15", optionally followed by a time) are taken as-is;
/// relative phrases ("3 weeks ago", "Streamed 2 days ago") are counted back
/// from `today` with months as 30 days and years as 365. Anything else is
/// `None`, leaving the caller to fall back to the scrape date.
pub fn resolve_publish_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim();

    if let Some(prefix) = text.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }

    let caps = RELATIVE_DATE.captures(text)?;
    let amount = caps[1].parse::<u64>().ok()?;
    let days_per_unit = match caps[2].to_ascii_lowercase().as_str() {
        "day" => 1,
        "week" => 7,
        "month" => 30,
        "year" => 365,
        _ => 0,
    };
    today.checked_sub_days(Days::new(amount.checked_mul(days_per_unit)?))
}
