//! Extraction of video records from the `ytInitialData` blob embedded in a
//! channel's server-rendered `/videos` page.

use crate::types::RawVideoRecord;
use crate::{CatalogError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static INITIAL_DATA_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:var\s+ytInitialData|window\[["']ytInitialData["']\])\s*=\s*"#).unwrap()
});

/// Locate and decode the `ytInitialData` object of a channel page.
///
/// The object is read with a streaming JSON deserializer starting right after
/// the assignment, so string contents such as `"};"` cannot cut it short.
pub fn extract_initial_data(html: &str) -> Result<Value> {
    let assignment = INITIAL_DATA_ASSIGNMENT
        .find(html)
        .ok_or_else(|| CatalogError::Parse("No ytInitialData found in page".to_string()))?;

    let mut stream =
        serde_json::Deserializer::from_str(&html[assignment.end()..]).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) if value.is_object() => Ok(value),
        Some(Ok(_)) => Err(CatalogError::Parse(
            "ytInitialData is not an object".to_string(),
        )),
        Some(Err(e)) => Err(CatalogError::Parse(format!(
            "Malformed ytInitialData: {e}"
        ))),
        None => Err(CatalogError::Parse("Empty ytInitialData".to_string())),
    }
}

/// Parse every video listed on a channel page.
///
/// Both grid layouts are walked: the current `richGridRenderer` and the older
/// `sectionListRenderer`/`gridRenderer` one. A page without the blob is a
/// [`CatalogError::Parse`]; a page whose blob lists no videos yields an empty
/// list.
pub fn parse_channel_page(html: &str) -> Result<Vec<RawVideoRecord>> {
    let data = extract_initial_data(html)?;
    let records = collect_videos(&data);
    log::debug!("Extracted {} videos from ytInitialData", records.len());
    Ok(records)
}

/// Walk a decoded `ytInitialData` value for video renderers.
pub fn collect_videos(data: &Value) -> Vec<RawVideoRecord> {
    let mut records = Vec::new();

    let Some(tabs) = data
        .pointer("/contents/twoColumnBrowseResultsRenderer/tabs")
        .and_then(Value::as_array)
    else {
        log::debug!("ytInitialData has no browse tabs");
        return records;
    };

    for content in tabs.iter().filter_map(|tab| tab.pointer("/tabRenderer/content")) {
        for item in array_at(content, "/richGridRenderer/contents") {
            if let Some(video) = item.pointer("/richItemRenderer/content/videoRenderer") {
                records.push(video_record(video));
            }
        }

        for section in array_at(content, "/sectionListRenderer/contents") {
            for item in array_at(section, "/itemSectionRenderer/contents") {
                for grid_item in array_at(item, "/gridRenderer/items") {
                    if let Some(video) = grid_item.get("gridVideoRenderer") {
                        records.push(video_record(video));
                    }
                }
            }
        }
    }

    records
}

fn array_at<'a>(value: &'a Value, pointer: &str) -> impl Iterator<Item = &'a Value> {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Text of a YouTube text object: `simpleText`, or the concatenated `runs`.
fn text_of(value: Option<&Value>) -> Option<String> {
    let value = value?;
    if let Some(text) = value.get("simpleText").and_then(Value::as_str) {
        return Some(text.to_string());
    }
    let runs = value.get("runs")?.as_array()?;
    let text: String = runs
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}

fn video_record(video: &Value) -> RawVideoRecord {
    let title = video
        .pointer("/title/runs/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| text_of(video.get("title")))
        .unwrap_or_default();

    let view_count_text = text_of(video.get("viewCountText"))
        .or_else(|| text_of(video.get("shortViewCountText")))
        .unwrap_or_default();

    let duration_text = text_of(video.get("lengthText"))
        .or_else(|| {
            video
                .get("thumbnailOverlays")?
                .as_array()?
                .iter()
                .find_map(|overlay| {
                    text_of(overlay.pointer("/thumbnailOverlayTimeStatusRenderer/text"))
                })
        })
        .unwrap_or_default();

    let thumbnail_url = video
        .pointer("/thumbnail/thumbnails")
        .and_then(Value::as_array)
        .and_then(|thumbnails| thumbnails.last())
        .and_then(|thumbnail| thumbnail.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    RawVideoRecord {
        title,
        video_id: video
            .get("videoId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        view_count_text,
        duration_text,
        thumbnail_url,
        published_text: text_of(video.get("publishedTimeText")).unwrap_or_default(),
    }
}
