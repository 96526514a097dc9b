//! # Showtimes Crate
//!
//! This crate turns a cinema showtime feed (organised date → cinema → film →
//! format → session) into a movie-centric view: one entry per film+format,
//! with the showtimes collected per theater.
//!
//! ## Main Components
//!
//! - **types**: Feed types, `Showtime`, `Movie`, `MovieMap`, options
//! - **parser**: Load the vendor JSON into a `Feed`
//! - **aggregate**: Feed → `MovieMap`
//! - **sort**: Display order by earliest showtime
//! - **range**: Calendar date range for a showtime list
//! - **listing**: Display-ready rows combining all of the above
//! - **error**: Error and warning types
//!
//! ## Example Usage
//!
//! ```ignore
//! use showtimes::{Feed, aggregate, build_listings};
//! use std::path::Path;
//!
//! let feed = Feed::load(Path::new("alamo-feed.json"))?;
//! let movies = aggregate(&feed)?;
//!
//! for listing in build_listings(&movies) {
//!     println!("{} | {} | {}", listing.title, listing.date_range_text(), listing.theaters.join(", "));
//! }
//! ```
//!
//! ## Learning Goals
//!
//! This crate demonstrates several key Rust concepts:
//!
//! 1. **Serde derive**: The vendor JSON maps onto plain structs with
//!    `rename_all`, no hand-written field access
//! 2. **Newtypes**: `Showtime` wraps `DateTime<FixedOffset>` so it can be
//!    ordered, hashed and displayed on its own terms
//! 3. **Entry API**: `MovieMap::get_or_insert_with` creates a movie once and
//!    hands back a mutable borrow for appending
//! 4. **Error Handling**: `Result<T>` with a thiserror enum, plus warnings
//!    collected as values
//! 5. **Iterators**: `flatten`, `windows`, `min`/`max` instead of index loops
//! 6. **Deterministic collections**: `BTreeMap` everywhere output order matters
//!
//! Only `parser` touches the filesystem or logs. Aggregation, sorting and
//! summarizing are pure and report problems through `FeedError` and
//! `FeedWarning` only.

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod aggregate;
pub mod sort;
pub mod range;
pub mod listing;

// Re-export commonly used types for convenience
pub use error::{FeedError, FeedWarning, Result};
pub use types::{
    // Feed
    Feed,
    Market,
    DateEntry,
    Cinema,
    Film,
    Series,
    Format,
    Session,
    // Derived
    Showtime,
    Movie,
    MovieMap,
    movie_key,
    // Options
    FeedOptions,
    DuplicatePolicy,
    Aggregation,
    DEFAULT_LINK_BASE,
};
pub use aggregate::{aggregate, aggregate_with};
pub use sort::sort_by_earliest_showtime;
pub use range::{date_range, DateRange};
pub use listing::{build_listings, MovieListing, Screening};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_movie_map_creation() {
        let movies = MovieMap::new();
        assert!(movies.is_empty());
        assert_eq!(movies.total_showtimes(), 0);
    }

    #[test]
    fn test_get_or_insert_creates_once() {
        let mut movies = MovieMap::new();

        movies.get_or_insert_with("HEAT (Digital)", || Movie::new("Digital", "link-a", "170"));
        let movie = movies.get_or_insert_with("HEAT (Digital)", || Movie::new("35mm", "link-b", "1"));

        assert_eq!(movie.link, "link-a");
        assert_eq!(movie.format, "Digital");
        assert_eq!(movies.len(), 1);
    }

    #[test]
    fn test_movie_key() {
        assert_eq!(movie_key("2001: A SPACE ODYSSEY", "70mm"), "2001: A SPACE ODYSSEY (70mm)");
    }

    #[test]
    fn test_showtime_parse_with_offset() {
        let showtime = Showtime::parse("2018-09-04T02:45:00.000Z", FixedOffset::east_opt(0).unwrap()).unwrap();
        assert_eq!(showtime.instant().to_rfc3339(), "2018-09-04T02:45:00+00:00");
    }

    #[test]
    fn test_showtime_parse_naive_uses_configured_offset() {
        let central = FixedOffset::west_opt(5 * 3600).unwrap();
        let showtime = Showtime::parse("2018-09-03T21:45:00", central).unwrap();

        assert_eq!(showtime.instant().to_rfc3339(), "2018-09-03T21:45:00-05:00");
        assert_eq!(showtime.date().to_string(), "2018-09-03");
    }

    #[test]
    fn test_showtime_parse_iso_8601_variants() {
        let central = FixedOffset::west_opt(5 * 3600).unwrap();

        // (input, expected instant in UTC)
        let cases = [
            ("2018-09-03T21:45", "2018-09-04T02:45:00+00:00"),
            ("2018-09-03T21:45Z", "2018-09-03T21:45:00+00:00"),
            ("2018-09-03T21:45:00Z", "2018-09-03T21:45:00+00:00"),
            ("2018-09-03T21:45:00+0000", "2018-09-03T21:45:00+00:00"),
            ("2018-09-03T21:45:00.000+0000", "2018-09-03T21:45:00+00:00"),
            ("2018-09-03T16:45-0500", "2018-09-03T21:45:00+00:00"),
            ("2018-09-03T21:45:00.000", "2018-09-04T02:45:00+00:00"),
        ];

        for (raw, expected) in cases {
            let showtime = Showtime::parse(raw, central)
                .unwrap_or_else(|| panic!("failed to parse {}", raw));
            let utc = showtime.instant().with_timezone(&FixedOffset::east_opt(0).unwrap());
            assert_eq!(utc.to_rfc3339(), expected, "parsing {}", raw);
        }
    }

    #[test]
    fn test_aggregate_accepts_minute_precision_sessions() {
        let feed = Feed::from_json_str(
            r#"{"Market": {"Dates": [{"Cinemas": [{
                "CinemaName": "Village",
                "Films": [{
                    "FilmName": "HEAT", "FilmRuntime": "170", "FilmId": "A1",
                    "Series": [{"Formats": [{"FormatName": "Digital", "Sessions": [
                        {"SessionDateTime": "2018-09-03T21:45"},
                        {"SessionDateTime": "2018-09-04T21:45Z"},
                        {"SessionDateTime": "2018-09-05T21:45:00+0000"}
                    ]}]}]
                }]
            }]}]}}"#,
        )
        .unwrap();

        let movies = aggregate(&feed).unwrap();
        assert_eq!(movies.total_showtimes(), 3);
    }

    #[test]
    fn test_showtime_parse_rejects_garbage() {
        assert!(Showtime::parse("9/3 at 7pm", FixedOffset::east_opt(0).unwrap()).is_none());
        assert!(Showtime::parse("", FixedOffset::east_opt(0).unwrap()).is_none());
    }

    #[test]
    fn test_equal_instants_in_different_offsets() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let a = Showtime::parse("2018-09-03T23:30:00Z", utc).unwrap();
        let b = Showtime::parse("2018-09-03T18:30:00-05:00", utc).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_movie_helpers() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let mut movie = Movie::new("Digital", "", "90");
        movie.theaters.insert(
            "Village".to_string(),
            vec![
                Showtime::parse("2018-09-05T20:00:00Z", utc).unwrap(),
                Showtime::parse("2018-09-03T20:00:00Z", utc).unwrap(),
            ],
        );
        movie.theaters.insert(
            "Lakeline".to_string(),
            vec![Showtime::parse("2018-09-04T20:00:00Z", utc).unwrap()],
        );

        assert_eq!(movie.showtime_count(), 3);
        assert_eq!(movie.theater_names(), vec!["Lakeline", "Village"]);
        assert_eq!(movie.earliest().unwrap().date().to_string(), "2018-09-03");
        assert_eq!(movie.latest().unwrap().date().to_string(), "2018-09-05");
        assert!(!movie.has_duplicate_showtimes());
        assert!(movie.duplicate_showtimes().is_empty());
    }

    #[test]
    fn test_duplicate_showtimes_listed_once() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let at = |raw: &str| Showtime::parse(raw, utc).unwrap();

        let mut movie = Movie::new("Digital", "", "99");
        movie.theaters.insert(
            "Ritz".to_string(),
            vec![at("2018-09-07T22:00:00Z"), at("2018-09-07T22:00:00Z"), at("2018-09-08T00:30:00Z")],
        );
        // Same instant at another theater, written with a different offset
        movie.theaters.insert(
            "Lakeline".to_string(),
            vec![at("2018-09-07T17:00:00-05:00"), at("2018-09-01T22:00:00Z")],
        );

        assert_eq!(movie.duplicate_showtimes(), vec![at("2018-09-07T22:00:00Z")]);
        assert!(movie.has_duplicate_showtimes());
    }

    #[test]
    fn test_movie_serializes_like_feed_dump() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let mut movie = Movie::new("Digital", "https://drafthouse.com/uid/A1", "170");
        movie.theaters.insert(
            "Village".to_string(),
            vec![Showtime::parse("2018-09-03T23:30:00Z", utc).unwrap()],
        );

        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["runTime"], "170");
        assert_eq!(json["format"], "Digital");
        let first = json["theaters"]["Village"][0].as_str().unwrap();
        assert!(first.starts_with("2018-09-03T23:30:00"));
    }
}
