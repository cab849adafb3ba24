use label_catalog::source::HttpPageFetcher;
use label_catalog::CatalogConfig;
use std::path::PathBuf;

/// HTTP fetcher configured with the user agent from the config.
pub fn create_fetcher(config: &CatalogConfig) -> HttpPageFetcher {
    let http_client = http_client::native::NativeClient::new();
    HttpPageFetcher::new(Box::new(http_client), config.user_agent.as_str())
}

/// The directory given on the command line, else the configured one.
pub fn resolve_dir(dir: Option<PathBuf>, config: &CatalogConfig) -> PathBuf {
    dir.unwrap_or_else(|| config.output_dir.clone())
}
