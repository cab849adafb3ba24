#[cfg(feature = "mock")]
mod mock_tests {
    use label_catalog::source::oembed::oembed_url;
    use label_catalog::source::{ChannelCollector, MockPageFetcher, OembedCollector};
    use label_catalog::{CatalogError, Result};
    use mockall::predicate::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    fn fixture(name: &str) -> String {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name);
        fs::read_to_string(path).unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn test_channel_collector_parses_fetched_page() -> Result<()> {
        let html = fixture("channel_videos.html");
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_page()
            .with(eq("https://www.youtube.com/@label/videos"))
            .times(1)
            .returning(move |_| Ok(html.clone()));

        let collector = ChannelCollector::new(fetcher, "https://www.youtube.com/@label/videos");
        let records = collector.collect().await?;
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].video_id, "aB3dE5fG7hI");
        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_channel_collector_fetch_failure_is_unavailable() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_page()
            .returning(|_| Err(CatalogError::Http("connection refused".to_string())));

        let collector = ChannelCollector::new(fetcher, "https://www.youtube.com/@label/videos");
        let result = collector.collect().await;
        assert!(matches!(result, Err(CatalogError::SourceUnavailable(_))));
    }

    #[test_log::test(tokio::test)]
    async fn test_channel_collector_empty_page_is_unavailable() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_page()
            .returning(|_| Ok("<html><body>consent wall</body></html>".to_string()));

        let collector = ChannelCollector::new(fetcher, "https://www.youtube.com/@label/videos");
        assert!(matches!(
            collector.collect().await,
            Err(CatalogError::SourceUnavailable(_))
        ));
    }

    #[test_log::test(tokio::test)]
    async fn test_oembed_collector_skips_failed_videos() -> Result<()> {
        let body = fixture("oembed.json");
        let found = oembed_url("vid001");
        let missing = oembed_url("gone");
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_page()
            .with(function(move |url: &str| url == found))
            .times(1)
            .returning(move |_| Ok(body.clone()));
        fetcher
            .expect_fetch_page()
            .with(function(move |url: &str| url == missing))
            .times(1)
            .returning(|_| Err(CatalogError::Http("GET returned 404 Not Found".to_string())));

        let collector = OembedCollector::new(fetcher, Duration::from_millis(1));
        let records = collector
            .collect(&["vid001".to_string(), "gone".to_string()])
            .await?;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].video_id, "vid001");
        assert_eq!(records[0].title, "Nova Kai - Midnight Drive (Official Video)");
        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_oembed_collector_with_nothing_fetched_is_unavailable() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_page()
            .returning(|_| Ok("Bad Request".to_string()));

        let collector = OembedCollector::new(fetcher, Duration::ZERO);
        let result = collector.collect(&["a".to_string(), "b".to_string()]).await;
        assert!(matches!(result, Err(CatalogError::SourceUnavailable(_))));
    }
}
