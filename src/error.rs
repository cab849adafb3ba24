use thiserror::Error;

/// Error types for catalog operations.
///
/// Field parsers never produce errors: malformed text degrades into a
/// documented fallback value instead. What remains here are the failures that
/// stop a whole run (the source is unavailable, a file cannot be written) or
/// that a caller must surface (a snapshot that breaks its own invariants).
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use label_catalog::{CatalogError, source::records};
///
/// match records::load_records("raw_videos.json") {
///     Ok(records) => println!("Loaded {} records", records.len()),
///     Err(CatalogError::SourceUnavailable(msg)) => eprintln!("Nothing to build from: {msg}"),
///     Err(CatalogError::Json(e)) => eprintln!("Malformed record file: {e}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP/network related errors.
    ///
    /// This includes connection failures, non-success status codes and
    /// unreadable response bodies.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to locate or decode data in a fetched document.
    ///
    /// Raised by source collectors when a page no longer carries the
    /// structure they look for (for example a channel page without the
    /// embedded `ytInitialData` blob).
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The source produced no records at all.
    ///
    /// A run that hits this must stop before anything is persisted; an empty
    /// or garbage catalog is never published.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A snapshot violates its own invariants and was refused.
    #[error("Inconsistent catalog: {0}")]
    Inconsistent(String),

    /// Configuration could not be located, read or decoded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A template could not be rendered.
    #[error("Template error: {0}")]
    Template(String),

    /// File system I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
