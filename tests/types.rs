use label_catalog::estimate::{resolve_bpm, BpmSource};
use label_catalog::validate::{Severity, ValidationIssue};
use label_catalog::{Artist, CatalogDocument, LabelStats, RawVideoRecord, Track};

fn track() -> Track {
    Track {
        number: 7,
        title: "Midnight Drive".to_string(),
        artist: "Nova Kai".to_string(),
        genre: "Electronic".to_string(),
        date: "2025-12-06".to_string(),
        plays: "16M".to_string(),
        views_num: 16_000_000,
        duration: "3:45".to_string(),
        bpm: 126,
        artwork: "https://i.ytimg.com/vi/vid001/hqdefault.jpg".to_string(),
        video_id: "vid001".to_string(),
        youtube_url: "https://www.youtube.com/watch?v=vid001".to_string(),
        audio_file: "music/007_Midnight_Drive.mp3".to_string(),
    }
}

#[test]
fn test_display_implementations() {
    assert_eq!(format!("{}", track()), "Nova Kai - Midnight Drive [16M]");

    let artist = Artist {
        name: "Mira".to_string(),
        genres: vec!["Trance".to_string()],
        bio: String::new(),
        image: String::new(),
        avatar: String::new(),
        track_count: 1,
        total_views: 10,
        total_views_formatted: "10".to_string(),
        followers_formatted: "1".to_string(),
        streams_formatted: "10".to_string(),
        country: "🌍 Global".to_string(),
    };
    assert_eq!(format!("{artist}"), "Mira");

    let issue = ValidationIssue {
        severity: Severity::Warning,
        message: "2 track(s) have no video id".to_string(),
    };
    assert_eq!(issue.to_string(), "warning: 2 track(s) have no video id");
}

#[test]
fn test_track_json_field_names() {
    let json = serde_json::to_value(track()).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    for key in [
        "number",
        "title",
        "artist",
        "genre",
        "date",
        "plays",
        "viewsNum",
        "duration",
        "bpm",
        "artwork",
        "videoId",
        "youtubeUrl",
        "audioFile",
    ] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert_eq!(keys.len(), 13);
}

#[test]
fn test_catalog_document_round_trip() {
    let json = r#"{
        "generatedOn": "2025-12-20",
        "tracks": [],
        "artists": [],
        "channelStats": {
            "totalStreams": 0,
            "totalStreamsFormatted": "0",
            "totalTracks": 0,
            "totalArtists": 0
        }
    }"#;
    let document: CatalogDocument = serde_json::from_str(json).unwrap();
    assert_eq!(document.channel_stats, LabelStats {
        total_streams_formatted: "0".to_string(),
        ..Default::default()
    });
    assert_eq!(document.generated_on.to_string(), "2025-12-20");
}

#[test]
fn test_raw_record_accepts_scraper_output() {
    let record: RawVideoRecord = serde_json::from_str(
        r#"{"title": "A - B", "videoId": "x", "viewCountText": "5 views", "extra": true}"#,
    )
    .unwrap();
    assert_eq!(record.view_count_text, "5 views");
    assert_eq!(record.duration_text, "");
}

#[test]
fn test_bpm_source_serializes_camel_case() {
    let estimate = resolve_bpm("Drift", "Electronic", None);
    assert_eq!(estimate.source, BpmSource::HashFallback);
    assert_eq!(
        serde_json::to_string(&BpmSource::GenreTable).unwrap(),
        "\"genreTable\""
    );
}
