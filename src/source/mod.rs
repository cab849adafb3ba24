//! Source collectors producing [`RawVideoRecord`]s.
//!
//! Every collector degrades per record (fields it cannot find stay empty and
//! are filled with fallbacks by the normalizer) but fails as a whole when it
//! finds nothing at all, so that an empty catalog is never published.

pub mod fetch;
pub mod initial_data;
pub mod oembed;
pub mod records;
pub mod rendered;

pub use fetch::{ChannelCollector, HttpPageFetcher, OembedCollector, PageFetcher};
pub use initial_data::parse_channel_page;
pub use oembed::parse_oembed;
pub use records::{load_records, save_records};
pub use rendered::parse_rendered_grid;

#[cfg(feature = "mock")]
pub use fetch::MockPageFetcher;

use crate::types::RawVideoRecord;
use crate::{CatalogError, Result};

/// Parse a channel page, preferring the embedded `ytInitialData` and falling
/// back to the rendered grid.
///
/// Returns [`CatalogError::SourceUnavailable`] when neither yields a record.
pub fn records_from_channel_html(html: &str) -> Result<Vec<RawVideoRecord>> {
    match parse_channel_page(html) {
        Ok(records) if !records.is_empty() => return Ok(records),
        Ok(_) => log::warn!("ytInitialData lists no videos, trying the rendered grid"),
        Err(e) => log::warn!("{e}, trying the rendered grid"),
    }

    let records = parse_rendered_grid(html);
    if records.is_empty() {
        return Err(CatalogError::SourceUnavailable(
            "no videos found in channel page".to_string(),
        ));
    }
    Ok(records)
}
