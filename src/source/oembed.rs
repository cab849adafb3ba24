//! Per-video metadata from the public oEmbed endpoint.
//!
//! oEmbed only knows a video's title, uploader and thumbnail. Records built
//! from it carry no view count, duration or publish date.

use crate::types::RawVideoRecord;
use crate::Result;
use serde::Deserialize;

const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

/// The subset of an oEmbed response the catalog uses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OembedResponse {
    pub title: String,
    pub author_name: String,
    pub thumbnail_url: String,
}

/// oEmbed request URL for a video id.
pub fn oembed_url(video_id: &str) -> String {
    let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
    format!(
        "{OEMBED_ENDPOINT}?url={}&format=json",
        urlencoding::encode(&watch_url)
    )
}

/// Build a record from an oEmbed JSON body.
pub fn parse_oembed(json: &str, video_id: &str) -> Result<RawVideoRecord> {
    let response: OembedResponse = serde_json::from_str(json)?;
    log::debug!(
        "oEmbed for {video_id}: '{}' by {}",
        response.title,
        response.author_name
    );

    Ok(RawVideoRecord {
        title: response.title,
        video_id: video_id.to_string(),
        thumbnail_url: response.thumbnail_url,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oembed_url_encodes_watch_url() {
        assert_eq!(
            oembed_url("abc"),
            "https://www.youtube.com/oembed?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Dabc&format=json"
        );
    }

    #[test]
    fn test_parse_oembed_rejects_html() {
        assert!(parse_oembed("<html>Not Found</html>", "abc").is_err());
    }
}
