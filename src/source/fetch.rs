//! Fetching source pages over HTTP.

use super::oembed::{oembed_url, parse_oembed};
use super::records_from_channel_html;
use crate::types::RawVideoRecord;
use crate::{CatalogError, Result};
use async_trait::async_trait;
use http_client::{HttpClient, Request};
use http_types::{Method, Url};
use std::time::Duration;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Source of page bodies, separated out so collectors can be tested without
/// a network.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait PageFetcher {
    /// Fetch `url` and return its body as text.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// [`PageFetcher`] over any [`HttpClient`], sending browser-like headers.
pub struct HttpPageFetcher {
    client: Box<dyn HttpClient>,
    user_agent: String,
}

impl HttpPageFetcher {
    pub fn new(client: Box<dyn HttpClient>, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }

    fn build_request(&self, url: &str) -> Result<Request> {
        let url = url
            .parse::<Url>()
            .map_err(|e| CatalogError::Http(format!("Invalid URL {url}: {e}")))?;
        let mut request = Request::new(Method::Get, url);
        request.insert_header("User-Agent", self.user_agent.as_str());
        request.insert_header("Accept", ACCEPT_HTML);
        request.insert_header("Accept-Language", "en-US,en;q=0.9");
        request.insert_header("DNT", "1");
        request.insert_header("Connection", "keep-alive");
        Ok(request)
    }
}

#[async_trait(?Send)]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let request = self.build_request(url)?;
        log::debug!("GET {url}");

        let mut response = self
            .client
            .send(request)
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Http(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }

        let body = response
            .body_string()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;
        log::debug!("Fetched {} bytes from {url}", body.len());
        Ok(body)
    }
}

/// Collects a channel's listing from its `/videos` page.
pub struct ChannelCollector<F: PageFetcher> {
    fetcher: F,
    videos_url: String,
}

impl<F: PageFetcher> ChannelCollector<F> {
    pub fn new(fetcher: F, videos_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            videos_url: videos_url.into(),
        }
    }

    /// Fetch and parse the listing.
    ///
    /// Any failure, including a page that parses into zero records, is
    /// reported as [`CatalogError::SourceUnavailable`].
    pub async fn collect(&self) -> Result<Vec<RawVideoRecord>> {
        log::info!("Fetching channel listing from {}", self.videos_url);
        let html = self
            .fetcher
            .fetch_page(&self.videos_url)
            .await
            .map_err(|e| {
                CatalogError::SourceUnavailable(format!("{}: {e}", self.videos_url))
            })?;
        records_from_channel_html(&html)
    }
}

/// Collects per-video records from oEmbed, one request per id.
pub struct OembedCollector<F: PageFetcher> {
    fetcher: F,
    delay: Duration,
}

impl<F: PageFetcher> OembedCollector<F> {
    pub fn new(fetcher: F, delay: Duration) -> Self {
        Self { fetcher, delay }
    }

    /// Fetch each video in turn, waiting the configured delay between
    /// requests. Videos that fail are logged and left out.
    pub async fn collect(&self, video_ids: &[String]) -> Result<Vec<RawVideoRecord>> {
        let mut records = Vec::with_capacity(video_ids.len());

        for (index, video_id) in video_ids.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let fetched = match self.fetcher.fetch_page(&oembed_url(video_id)).await {
                Ok(body) => parse_oembed(&body, video_id),
                Err(e) => Err(e),
            };
            match fetched {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping video {video_id}: {e}"),
            }
        }

        if records.is_empty() {
            return Err(CatalogError::SourceUnavailable(format!(
                "none of {} videos could be fetched",
                video_ids.len()
            )));
        }
        log::info!("Fetched {} of {} videos", records.len(), video_ids.len());
        Ok(records)
    }
}
