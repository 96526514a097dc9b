//! Loading the vendor JSON feed.
//!
//! This is the I/O edge of the crate: everything here reads bytes and hands
//! back a typed `Feed`. Shape problems (missing `Market.Dates`, a number where
//! a string is expected, broken JSON) all surface as
//! `FeedError::MalformedFeed` with the position serde_json reports.

use crate::error::{FeedError, Result};
use crate::types::Feed;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

impl Feed {
    /// Parse a feed held in memory
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(malformed)
    }

    /// Parse a feed from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(malformed)
    }

    /// Read and parse a feed file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading showtime feed from {:?}", path);

        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FeedError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => FeedError::IoError(e),
        })?;
        let feed = Self::from_reader(BufReader::new(file))?;

        debug!(
            "Parsed feed with {} dates and {} cinema entries",
            feed.date_count(),
            feed.market.dates.iter().map(|d| d.cinemas.len()).sum::<usize>()
        );
        Ok(feed)
    }

    /// Number of Date entries in the feed
    pub fn date_count(&self) -> usize {
        self.market.dates.len()
    }
}

/// Convert a serde_json failure into our error type, keeping I/O errors apart
/// from shape errors
fn malformed(err: serde_json::Error) -> FeedError {
    if err.is_io() {
        return FeedError::IoError(err.into());
    }
    FeedError::MalformedFeed {
        line: err.line(),
        column: err.column(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_feed() {
        let feed = Feed::from_json_str(r#"{"Market": {"Dates": []}}"#).unwrap();
        assert_eq!(feed.date_count(), 0);
    }

    #[test]
    fn test_missing_dates_is_malformed() {
        let err = Feed::from_json_str(r#"{"Market": {}}"#).unwrap_err();
        match err {
            FeedError::MalformedFeed { reason, .. } => assert!(reason.contains("Dates")),
            other => panic!("expected MalformedFeed, got {:?}", other),
        }
    }

    #[test]
    fn test_mistyped_dates_is_malformed() {
        let err = Feed::from_json_str(r#"{"Market": {"Dates": "soon"}}"#).unwrap_err();
        assert!(matches!(err, FeedError::MalformedFeed { .. }));
    }

    #[test]
    fn test_broken_json_reports_position() {
        let err = Feed::from_json_str("{\"Market\":\n  {\"Dates\": [}").unwrap_err();
        match err {
            FeedError::MalformedFeed { line, .. } => assert_eq!(line, 2),
            other => panic!("expected MalformedFeed, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{
            "Market": {
                "MarketName": "Austin",
                "Dates": [{"DateId": "20180903", "Cinemas": []}]
            }
        }"#;
        let feed = Feed::from_json_str(json).unwrap();
        assert_eq!(feed.date_count(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Feed::load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, FeedError::FileNotFound { .. }));
    }
}
