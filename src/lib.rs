//! # label-catalog
//!
//! Turns a YouTube channel's video listing into a music-label catalog:
//! canonical tracks, aggregated artists and label-wide statistics, published
//! as two JSON documents plus optional template-rendered markup.
//!
//! The pipeline runs in four steps:
//!
//! 1. a [`source`] collector produces [`RawVideoRecord`]s,
//! 2. [`CatalogNormalizer`] turns them into a [`CatalogSnapshot`],
//! 3. [`stats`] derives rankings and the [`StatsDocument`],
//! 4. a [`publish::SnapshotSink`] materializes the snapshot.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use label_catalog::{CatalogNormalizer, NormalizeOptions, RawVideoRecord, StatsDocument};
//!
//! let records = vec![RawVideoRecord {
//!     title: "Nova - Drift (Official Video)".to_string(),
//!     video_id: "abc123".to_string(),
//!     view_count_text: "16.0M views".to_string(),
//!     duration_text: "PT3M45S".to_string(),
//!     ..Default::default()
//! }];
//!
//! let options = NormalizeOptions::new("My Label", NaiveDate::from_ymd_opt(2025, 12, 20).unwrap());
//! let snapshot = CatalogNormalizer::new(options).normalize(&records);
//! let stats = StatsDocument::from_snapshot(&snapshot, 8, 3);
//!
//! assert_eq!(snapshot.tracks[0].plays, "16M");
//! assert_eq!(snapshot.tracks[0].duration, "3:45");
//! assert_eq!(stats.top_artists[0].name, "Nova");
//! ```

pub mod config;
pub mod error;
pub mod estimate;
pub mod normalize;
pub mod parsing;
pub mod publish;
pub mod source;
pub mod stats;
pub mod types;
pub mod validate;

pub use config::CatalogConfig;
pub use error::CatalogError;
pub use normalize::{CatalogNormalizer, NormalizeOptions};
pub use publish::{CatalogPublisher, SnapshotSink};
pub use types::{
    Artist, ArtistSummary, ArtistTrackRef, CatalogDocument, CatalogSnapshot, LabelStats,
    RawVideoRecord, StatsDocument, Track,
};
pub use validate::{validate, ValidationReport};

// Re-export scraper types for testing
pub use scraper::Html;

pub type Result<T> = std::result::Result<T, CatalogError>;
