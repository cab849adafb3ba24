mod common;

use common::{fixture_path, fixture_snapshot, LABEL};
use label_catalog::publish::{backup_path, TemplateTarget, CATALOG_FILE, STATS_FILE};
use label_catalog::validate::DEFAULT_TOLERANCE;
use label_catalog::{
    validate, CatalogDocument, CatalogError, CatalogPublisher, SnapshotSink, StatsDocument,
};
use std::fs;

#[test_log::test]
fn test_materialize_writes_both_documents() {
    let dir = tempfile::tempdir().unwrap();
    let publisher = CatalogPublisher::new(dir.path(), LABEL);
    let snapshot = fixture_snapshot();

    publisher.materialize(&snapshot).unwrap();

    let catalog: CatalogDocument =
        serde_json::from_str(&fs::read_to_string(dir.path().join(CATALOG_FILE)).unwrap()).unwrap();
    assert_eq!(catalog, CatalogDocument::from(&snapshot));

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join(STATS_FILE)).unwrap()).unwrap();
    assert_eq!(raw["labelStats"]["totalStreams"], 16_006_284);
    assert_eq!(raw["topReleases"].as_array().unwrap().len(), 6);
    assert_eq!(raw["topArtists"].as_array().unwrap().len(), 3);
    assert_eq!(raw["topArtists"][0]["name"], "Nova Kai");
    assert_eq!(raw["topArtists"][0]["topTracks"][0]["videoId"], "vid001");

    assert!(!backup_path(&dir.path().join(CATALOG_FILE)).exists());
    assert!(!dir.path().join("youtube_data.json.tmp").exists());
}

#[test_log::test]
fn test_published_documents_validate() {
    let dir = tempfile::tempdir().unwrap();
    let publisher = CatalogPublisher::new(dir.path(), LABEL).with_top_counts(2, 1);
    publisher.materialize(&fixture_snapshot()).unwrap();

    let (catalog, stats) = publisher.load_documents().unwrap();
    assert_eq!(stats.top_releases.len(), 2);
    assert_eq!(stats.top_artists.len(), 1);
    assert_eq!(stats.all_artists.len(), 3);

    let report = validate(&catalog, &stats, DEFAULT_TOLERANCE);
    assert!(report.is_consistent(), "{:?}", report.issues);
}

#[test_log::test]
fn test_backup_keeps_exactly_one_previous_copy() {
    let dir = tempfile::tempdir().unwrap();
    let publisher = CatalogPublisher::new(dir.path(), LABEL);
    let catalog_path = dir.path().join(CATALOG_FILE);

    let mut snapshot = fixture_snapshot();
    publisher.materialize(&snapshot).unwrap();
    let first = fs::read_to_string(&catalog_path).unwrap();

    snapshot.generated_on = snapshot.generated_on.succ_opt().unwrap();
    publisher.materialize(&snapshot).unwrap();
    let second = fs::read_to_string(&catalog_path).unwrap();
    assert_ne!(first, second);
    assert_eq!(fs::read_to_string(backup_path(&catalog_path)).unwrap(), first);

    snapshot.generated_on = snapshot.generated_on.succ_opt().unwrap();
    publisher.materialize(&snapshot).unwrap();
    assert_eq!(fs::read_to_string(backup_path(&catalog_path)).unwrap(), second);

    let backups = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".bak"))
        .count();
    assert_eq!(backups, 2, "one backup per document");
}

#[test_log::test]
fn test_inconsistent_snapshot_is_never_written() {
    let dir = tempfile::tempdir().unwrap();
    let publisher = CatalogPublisher::new(dir.path(), LABEL);

    let mut snapshot = fixture_snapshot();
    snapshot.tracks[0].plays = "1B".to_string();

    let result = publisher.materialize(&snapshot);
    assert!(matches!(result, Err(CatalogError::Inconsistent(_))));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test_log::test]
fn test_template_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("site").join("index.html");
    let publisher = CatalogPublisher::new(dir.path(), LABEL).with_template(TemplateTarget {
        template: fixture_path("template.html"),
        output: output.clone(),
    });

    publisher.materialize(&fixture_snapshot()).unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<title>World Studio Records</title>"));
    assert!(html.contains(r#"<span id="streams" title="16006284">16M</span>"#));
    assert!(html.contains(r#"<span id="tracks">6</span>"#));
    assert!(html.contains(r#"<span id="artists">3</span>"#));
    assert!(html.contains(r#"<span id="top-artist">Nova Kai</span>"#));
    assert!(html.contains("Updated 2025-12-20 {{ unknownField }}"));
    assert!(html.contains("window.youtubeDataJson = {\"generatedOn\":\"2025-12-20\""));
    assert!(html.contains("window.artistStatsJson = {\"labelStats\""));
    assert!(!html.contains("{{catalogScript}}"));
}

#[test_log::test]
fn test_stats_document_matches_snapshot() {
    let snapshot = fixture_snapshot();
    let stats = StatsDocument::from_snapshot(&snapshot, 8, 3);

    let releases: Vec<&str> = stats
        .top_releases
        .iter()
        .map(|t| t.video_id.as_str())
        .collect();
    assert_eq!(
        releases,
        vec!["vid001", "vid003", "vid002", "vid007", "vid008", "vid004"]
    );

    let aurora = stats.all_artists.iter().find(|a| a.name == "Aurora").unwrap();
    let tracks: Vec<&str> = aurora.top_tracks.iter().map(|t| t.video_id.as_str()).collect();
    assert_eq!(tracks, vec!["vid002", "vid008"]);
    assert_eq!(aurora.top_tracks[0].views_formatted, "1.2K");
}

#[test_log::test]
fn test_failed_write_leaves_previous_documents() {
    let dir = tempfile::tempdir().unwrap();
    let publisher = CatalogPublisher::new(dir.path(), LABEL);
    let mut snapshot = fixture_snapshot();
    publisher.materialize(&snapshot).unwrap();
    let catalog_before = fs::read_to_string(dir.path().join(CATALOG_FILE)).unwrap();
    let stats_before = fs::read_to_string(dir.path().join(STATS_FILE)).unwrap();

    // a directory in the way makes the statistics write fail
    fs::create_dir(dir.path().join("artist_stats.json.tmp")).unwrap();
    snapshot.generated_on = snapshot.generated_on.succ_opt().unwrap();
    assert!(matches!(
        publisher.materialize(&snapshot),
        Err(CatalogError::Io(_))
    ));

    assert_eq!(
        fs::read_to_string(dir.path().join(CATALOG_FILE)).unwrap(),
        catalog_before
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(STATS_FILE)).unwrap(),
        stats_before
    );
    assert!(!dir.path().join("youtube_data.json.tmp").exists());
    assert!(!backup_path(&dir.path().join(CATALOG_FILE)).exists());
}

#[test_log::test]
fn test_rendered_page_validates_against_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("index.html");
    let publisher = CatalogPublisher::new(dir.path(), LABEL).with_template(TemplateTarget {
        template: fixture_path("template.html"),
        output: output.clone(),
    });
    publisher.materialize(&fixture_snapshot()).unwrap();

    let (catalog, stats) = publisher.load_documents().unwrap();
    let mut report = validate(&catalog, &stats, DEFAULT_TOLERANCE);
    let before = report.issues.len();
    report.check_rendered(&fs::read_to_string(&output).unwrap(), &stats);
    assert_eq!(report.issues.len(), before, "{:?}", report.issues);
    assert!(report.is_consistent());

    let mut newer = stats.clone();
    newer.label_stats.total_tracks += 1;
    newer.label_stats.total_streams_formatted = "17M".to_string();
    let mut report = validate(&catalog, &stats, DEFAULT_TOLERANCE);
    report.check_rendered(&fs::read_to_string(&output).unwrap(), &newer);
    assert_eq!(report.errors().count(), 2);
}
