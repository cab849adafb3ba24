//! Extraction of video records from a browser-rendered channel grid.
//!
//! This is the fallback for pages saved from a browser (or produced by a
//! headless one), where the listing exists as `ytd-rich-item-renderer`
//! elements rather than as embedded JSON.

use crate::types::RawVideoRecord;
use scraper::{ElementRef, Html, Selector};

/// Parser for rendered `ytd-rich-item-renderer` grids.
#[derive(Debug, Clone)]
pub struct GridParser {
    item: Selector,
    title_link: Selector,
    metadata: Selector,
    duration: Selector,
    image: Selector,
}

impl Default for GridParser {
    fn default() -> Self {
        Self::new()
    }
}

impl GridParser {
    pub fn new() -> Self {
        Self {
            item: Selector::parse("ytd-rich-item-renderer").unwrap(),
            title_link: Selector::parse("a#video-title-link").unwrap(),
            metadata: Selector::parse("#metadata-line span.inline-metadata-item").unwrap(),
            duration: Selector::parse(
                "ytd-thumbnail-overlay-time-status-renderer span, \
                 ytd-thumbnail-overlay-time-status-renderer .badge-shape-wiz__text",
            )
            .unwrap(),
            image: Selector::parse("img").unwrap(),
        }
    }

    /// Parse every grid item that has both a title and a video id.
    pub fn parse(&self, document: &Html) -> Vec<RawVideoRecord> {
        let records: Vec<RawVideoRecord> = document
            .select(&self.item)
            .filter_map(|item| self.parse_item(&item))
            .collect();
        log::debug!("Parsed {} rendered grid items", records.len());
        records
    }

    fn parse_item(&self, item: &ElementRef) -> Option<RawVideoRecord> {
        let link = item.select(&self.title_link).next()?;

        let title = link
            .value()
            .attr("title")
            .map(str::to_string)
            .unwrap_or_else(|| element_text(&link));
        let video_id = link.value().attr("href").and_then(video_id_from_href)?;
        if title.is_empty() {
            log::debug!("Skipping grid item {video_id} without a title");
            return None;
        }

        let mut metadata = item.select(&self.metadata).map(|span| element_text(&span));
        let view_count_text = metadata.next().unwrap_or_default();
        let published_text = metadata.next().unwrap_or_default();

        let duration_text = item
            .select(&self.duration)
            .map(|span| element_text(&span))
            .find(|text| !text.is_empty())
            .unwrap_or_default();

        let thumbnail = item
            .select(&self.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .unwrap_or_default()
            .trim();
        let thumbnail_url = if thumbnail.is_empty() || thumbnail.starts_with("data:") {
            format!("https://i.ytimg.com/vi/{video_id}/maxresdefault.jpg")
        } else {
            thumbnail.to_string()
        };

        Some(RawVideoRecord {
            title,
            video_id,
            view_count_text,
            duration_text,
            thumbnail_url,
            published_text,
        })
    }
}

/// Parse a rendered channel grid.
pub fn parse_rendered_grid(html: &str) -> Vec<RawVideoRecord> {
    GridParser::new().parse(&Html::parse_document(html))
}

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The `v` parameter of a watch link (`/watch?v=abc&t=1` gives `abc`).
pub fn video_id_from_href(href: &str) -> Option<String> {
    let (_, query) = href.split_once('?')?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("v="))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
