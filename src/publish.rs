//! Publishing snapshots: JSON documents on disk and rendered templates.

use crate::parsing::{extract_collaborators, format_view_count};
use crate::stats::{sum_views, DEFAULT_TOP_ARTISTS, DEFAULT_TOP_RELEASES};
use crate::types::{CatalogDocument, CatalogSnapshot, StatsDocument};
use crate::{CatalogError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the catalog document.
pub const CATALOG_FILE: &str = "youtube_data.json";
/// File name of the statistics document.
pub const STATS_FILE: &str = "artist_stats.json";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Something that can take a finished snapshot somewhere.
pub trait SnapshotSink {
    fn materialize(&self, snapshot: &CatalogSnapshot) -> Result<()>;
}

/// Verify that a snapshot satisfies the catalog invariants.
///
/// Checked: sequential numbering, unique video ids, `plays` matching
/// `viewsNum`, artist totals matching their tracks, and label totals matching
/// the track list.
pub fn check_snapshot(snapshot: &CatalogSnapshot) -> Result<()> {
    let mut seen_ids = HashSet::new();
    for (index, track) in snapshot.tracks.iter().enumerate() {
        if track.number as usize != index + 1 {
            return Err(CatalogError::Inconsistent(format!(
                "track at position {} is numbered {}",
                index + 1,
                track.number
            )));
        }
        if !track.video_id.is_empty() && !seen_ids.insert(track.video_id.as_str()) {
            return Err(CatalogError::Inconsistent(format!(
                "video id {} appears more than once",
                track.video_id
            )));
        }
        if track.plays != format_view_count(track.views_num) {
            return Err(CatalogError::Inconsistent(format!(
                "track {} shows {} plays for {} views",
                track.number, track.plays, track.views_num
            )));
        }
    }

    let credits: Vec<Vec<String>> = snapshot
        .tracks
        .iter()
        .map(|t| extract_collaborators(&t.artist, &t.title))
        .collect();
    for artist in &snapshot.artists {
        let credited: Vec<u64> = snapshot
            .tracks
            .iter()
            .zip(&credits)
            .filter(|(_, names)| names.contains(&artist.name))
            .map(|(track, _)| track.views_num)
            .collect();
        if credited.len() as u32 != artist.track_count
            || sum_views(credited.iter().copied()) != artist.total_views
        {
            return Err(CatalogError::Inconsistent(format!(
                "artist {} totals do not match their tracks",
                artist.name
            )));
        }
    }

    let stats = &snapshot.label_stats;
    let streams = sum_views(snapshot.tracks.iter().map(|t| t.views_num));
    if stats.total_streams != streams
        || stats.total_tracks as usize != snapshot.tracks.len()
        || stats.total_artists as usize != snapshot.artists.len()
    {
        return Err(CatalogError::Inconsistent(
            "label statistics do not match the track list".to_string(),
        ));
    }

    Ok(())
}

/// Template input and the path its rendering is written to.
#[derive(Debug, Clone)]
pub struct TemplateTarget {
    pub template: PathBuf,
    pub output: PathBuf,
}

/// Writes the catalog and statistics documents into a directory.
///
/// Each file that already exists is first copied to `<name>.bak`, replacing
/// any older backup, and the new content goes through a temporary file that
/// is renamed into place. Every output is serialized and written to its
/// temporary file before any target is replaced, so a failure on the way
/// leaves the directory as it was.
#[derive(Debug, Clone)]
pub struct CatalogPublisher {
    out_dir: PathBuf,
    label_name: String,
    top_releases: usize,
    top_artists: usize,
    template: Option<TemplateTarget>,
}

impl CatalogPublisher {
    pub fn new(out_dir: impl Into<PathBuf>, label_name: impl Into<String>) -> Self {
        Self {
            out_dir: out_dir.into(),
            label_name: label_name.into(),
            top_releases: DEFAULT_TOP_RELEASES,
            top_artists: DEFAULT_TOP_ARTISTS,
            template: None,
        }
    }

    pub fn with_top_counts(mut self, top_releases: usize, top_artists: usize) -> Self {
        self.top_releases = top_releases;
        self.top_artists = top_artists;
        self
    }

    pub fn with_template(mut self, target: TemplateTarget) -> Self {
        self.template = Some(target);
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.out_dir.join(CATALOG_FILE)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.out_dir.join(STATS_FILE)
    }

    /// Read back the two documents written by a previous run.
    pub fn load_documents(&self) -> Result<(CatalogDocument, StatsDocument)> {
        let catalog = serde_json::from_str(&fs::read_to_string(self.catalog_path())?)?;
        let stats = serde_json::from_str(&fs::read_to_string(self.stats_path())?)?;
        Ok((catalog, stats))
    }
}

impl SnapshotSink for CatalogPublisher {
    fn materialize(&self, snapshot: &CatalogSnapshot) -> Result<()> {
        check_snapshot(snapshot)?;

        let catalog = CatalogDocument::from(snapshot);
        let stats = StatsDocument::from_snapshot(snapshot, self.top_releases, self.top_artists);
        let catalog_json = serde_json::to_string_pretty(&catalog)?;
        let stats_json = serde_json::to_string_pretty(&stats)?;

        let rendered = match &self.template {
            Some(target) => {
                let template = fs::read_to_string(&target.template)?;
                Some(render_template(&template, snapshot, &stats, &self.label_name)?)
            }
            None => None,
        };

        fs::create_dir_all(&self.out_dir)?;
        let mut files = vec![
            (self.catalog_path(), catalog_json),
            (self.stats_path(), stats_json),
        ];
        if let (Some(target), Some(markup)) = (&self.template, rendered) {
            if let Some(parent) = target.output.parent() {
                fs::create_dir_all(parent)?;
            }
            files.push((target.output.clone(), markup));
        }
        replace_files(&files)?;

        log::info!(
            "Published {} tracks and {} artists to {}",
            snapshot.tracks.len(),
            snapshot.artists.len(),
            self.out_dir.display()
        );
        Ok(())
    }
}

/// Path of the single backup kept for `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace several files as one step: every new content is written to a
/// temporary file first, and only once all of them exist is each target
/// backed up and renamed over. A failed write removes the temporaries and
/// leaves every target untouched.
fn replace_files(files: &[(PathBuf, String)]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
    for (path, contents) in files {
        let tmp = tmp_path(path);
        if let Err(e) = fs::write(&tmp, contents) {
            discard(&staged);
            // a partial write may have created it
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        staged.push((tmp, path.as_path()));
    }

    for (index, (tmp, path)) in staged.iter().enumerate() {
        let result = backup(path).and_then(|_| fs::rename(tmp, path).map_err(Into::into));
        if let Err(e) = result {
            discard(&staged[index..]);
            return Err(e);
        }
        log::debug!("Wrote {}", path.display());
    }
    Ok(())
}

fn backup(path: &Path) -> Result<()> {
    if path.is_file() {
        let backup = backup_path(path);
        fs::copy(path, &backup)?;
        log::debug!("Backed up {} to {}", path.display(), backup.display());
    }
    Ok(())
}

fn discard(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        if let Err(e) = fs::remove_file(tmp) {
            log::warn!("Could not remove {}: {e}", tmp.display());
        }
    }
}

/// Render a template by replacing `{{name}}` placeholders with snapshot
/// fields.
///
/// Bound names: `totalStreams`, `totalStreamsFormatted`, `totalTracks`,
/// `totalArtists`, `generatedOn`, `labelName`, `topArtistName` and
/// `catalogScript`; the last expands to a `<script>` block assigning both
/// documents to `window.youtubeDataJson` and `window.artistStatsJson`.
/// Unknown placeholders are kept verbatim. Any opening `{{` without a
/// closing `}}` ahead of the next `{{` is an error.
///
/// ```rust
/// use chrono::NaiveDate;
/// use label_catalog::publish::render_template;
/// use label_catalog::{CatalogNormalizer, NormalizeOptions, StatsDocument};
///
/// let options = NormalizeOptions::new("My Label", NaiveDate::from_ymd_opt(2025, 12, 20).unwrap());
/// let snapshot = CatalogNormalizer::new(options).normalize(&[]);
/// let stats = StatsDocument::from_snapshot(&snapshot, 8, 3);
///
/// let html = render_template("<h1>{{labelName}}: {{totalTracks}}</h1>", &snapshot, &stats, "My Label").unwrap();
/// assert_eq!(html, "<h1>My Label: 0</h1>");
/// ```
pub fn render_template(
    template: &str,
    snapshot: &CatalogSnapshot,
    stats: &StatsDocument,
    label_name: &str,
) -> Result<String> {
    if let Some(open) = unterminated_placeholder(template) {
        return Err(CatalogError::Template(format!(
            "unterminated placeholder at byte {open}"
        )));
    }

    let mut script = None;
    if PLACEHOLDER
        .captures_iter(template)
        .any(|caps| &caps[1] == "catalogScript")
    {
        script = Some(catalog_script(snapshot, stats)?);
    }

    let label_stats = &snapshot.label_stats;
    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        let name = &caps[1];
        match name {
            "totalStreams" => label_stats.total_streams.to_string(),
            "totalStreamsFormatted" => label_stats.total_streams_formatted.clone(),
            "totalTracks" => label_stats.total_tracks.to_string(),
            "totalArtists" => label_stats.total_artists.to_string(),
            "generatedOn" => snapshot.generated_on.format("%Y-%m-%d").to_string(),
            "labelName" => label_name.to_string(),
            "topArtistName" => snapshot
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            "catalogScript" => script.clone().unwrap_or_default(),
            _ => {
                log::warn!("Unknown template placeholder '{name}' left as is");
                caps[0].to_string()
            }
        }
    });

    Ok(rendered.into_owned())
}

/// Byte offset of the first `{{` that is not closed before the next `{{`.
fn unterminated_placeholder(template: &str) -> Option<usize> {
    template.match_indices("{{").map(|(open, _)| open).find(|&open| {
        let rest = &template[open + 2..];
        match (rest.find("}}"), rest.find("{{")) {
            (None, _) => true,
            (Some(close), Some(next)) => next < close,
            (Some(_), None) => false,
        }
    })
}

fn catalog_script(snapshot: &CatalogSnapshot, stats: &StatsDocument) -> Result<String> {
    let catalog = serde_json::to_string(&CatalogDocument::from(snapshot))?;
    let stats = serde_json::to_string(stats)?;
    Ok(format!(
        "<script>\nwindow.youtubeDataJson = {};\nwindow.artistStatsJson = {};\n</script>",
        catalog.replace("</", "<\\/"),
        stats.replace("</", "<\\/")
    ))
}
