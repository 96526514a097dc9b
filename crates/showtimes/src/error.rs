//! Error types for the showtimes crate.
//!
//! Two kinds of problems come out of a feed:
//! - `FeedError`: fatal for the call that produced it
//! - `FeedWarning`: the feed broke one of its usual assumptions, but the
//!   movie map is still complete for what was readable
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for deriving `Display` and `std::error::Error`
//! - Struct-like variants that carry where the problem was found
//! - `#[from]` so `?` converts `std::io::Error` without a `map_err`
//! - Warnings as plain values collected in a `Vec`, not as `Err`

use thiserror::Error;

/// Errors that can occur while loading or reshaping a showtime feed
///
/// Loading and aggregation errors abort the whole transformation, so a caller
/// never sees a half-built movie map. `EmptyShowtimes` is the exception: it is
/// raised per movie by the summarizers and callers are expected to recover.
///
/// Rust concept: each variant is its own shape. `MalformedFeed` carries the
/// position serde_json reported, `InvalidTimestamp` carries the movie and
/// cinema the bad session belonged to, and `EmptyShowtimes` carries nothing.
/// A caller can `match` on the variant to decide whether to recover, and the
/// `#[error(...)]` strings become the `Display` text printed by the CLI.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Feed file could not be found
    #[error("Failed to open feed: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the feed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document is not valid JSON, or a required field is missing or has
    /// the wrong type (e.g. no `Market.Dates`)
    #[error("Malformed feed at line {line}, column {column}: {reason}")]
    MalformedFeed {
        line: usize,
        column: usize,
        reason: String,
    },

    /// A session carried a `SessionDateTime` that is not an ISO-8601 datetime
    #[error("Invalid session time for {movie} at {cinema}: {value}")]
    InvalidTimestamp {
        movie: String,
        cinema: String,
        value: String,
    },

    /// A range or minimum was requested over a movie with no showtimes
    #[error("Cannot summarize an empty showtime list")]
    EmptyShowtimes,
}

/// Non-fatal feed anomalies collected during aggregation
///
/// These still derive `Error` so they format the same way as `FeedError`,
/// but they are never returned through `Result`. `aggregate_with` pushes them
/// onto `Aggregation::warnings` and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedWarning {
    /// Film listed more than one Series; only the first was read
    #[error("{film} at {cinema} has {count} series, only the first was used")]
    MultipleSeries {
        film: String,
        cinema: String,
        count: usize,
    },

    /// Film listed no Series at all, so it contributed no showtimes
    #[error("{film} at {cinema} has no series and was skipped")]
    MissingSeries { film: String, cinema: String },
}

/// Convenience type alias for Results in this crate
///
/// Rust concept: Type aliases make code more readable
/// Instead of writing `Result<T, FeedError>` everywhere,
/// we can just write `Result<T>`
pub type Result<T> = std::result::Result<T, FeedError>;
