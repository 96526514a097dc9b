//! Core types for the showtime feed and the movie-centric view built from it.
//!
//! The feed types mirror the vendor JSON one-to-one (PascalCase field names,
//! unknown fields ignored). Everything below the "Derived" banner is what the
//! aggregator produces and what the presentation layer reads.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::FeedWarning;

/// Detail pages live under this prefix, followed by the feed's `FilmId`
pub const DEFAULT_LINK_BASE: &str = "https://drafthouse.com/uid/";

// =============================================================================
// Feed (vendor input)
// =============================================================================

/// Root of the vendor document: `{"Market": {...}}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Feed {
    pub market: Market,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Market {
    /// Required. A feed without `Dates` is rejected as malformed
    pub dates: Vec<DateEntry>,
}

/// One calendar day of programming
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateEntry {
    pub cinemas: Vec<Cinema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Cinema {
    pub cinema_name: String,
    pub films: Vec<Film>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Film {
    pub film_name: String,
    /// Minutes, as the vendor sends it (a string)
    pub film_runtime: String,
    pub film_id: String,
    /// Always one entry in practice; see `FeedWarning::MultipleSeries`
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Series {
    pub formats: Vec<Format>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Format {
    pub format_name: String,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Session {
    /// ISO-8601, with or without an offset
    pub session_date_time: String,
}

// =============================================================================
// Showtime
// =============================================================================

/// ISO-8601 shapes accepted beyond strict RFC 3339, with a numeric offset
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// ISO-8601 shapes without any offset (seconds and fraction optional)
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// A single screening instant.
///
/// Ordering and equality compare the absolute instant, so two timestamps
/// written with different offsets but naming the same moment are equal.
///
/// Rust concept: a newtype over `DateTime<FixedOffset>` lets us derive `Ord`
/// and `Hash` from the wrapped instant while keeping parsing rules in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Showtime(DateTime<FixedOffset>);

impl Showtime {
    /// Parse a `SessionDateTime` value.
    ///
    /// Accepted, in order:
    /// - RFC 3339 (`2018-09-04T02:45:00.000Z`, `2018-09-03T21:45:00-05:00`)
    /// - a trailing `Z` on any naive form (`2018-09-03T21:45Z`), read as UTC
    /// - basic or extended numeric offsets, seconds optional (`...T21:45:00+0000`)
    /// - no offset at all (`2018-09-03T21:45:00`, `2018-09-03T21:45`), read as
    ///   wall-clock time at `naive_offset`
    pub fn parse(raw: &str, naive_offset: FixedOffset) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(instant));
        }

        if let Some(utc) = raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
            let naive = parse_naive(utc)?;
            return Some(Self(Utc.fix().from_utc_datetime(&naive)));
        }

        if let Some(instant) = OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        {
            return Some(Self(instant));
        }

        parse_naive(raw)?
            .and_local_timezone(naive_offset)
            .single()
            .map(Self)
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// Calendar date in the showtime's own offset
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

impl From<DateTime<FixedOffset>> for Showtime {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Self(instant)
    }
}

impl fmt::Display for Showtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%a %b %d %Y %H:%M"))
    }
}

// =============================================================================
// Derived: Movie and MovieMap
// =============================================================================

/// Build the composite key that separates formats of the same film,
/// e.g. `"2001: A SPACE ODYSSEY (70mm)"`
pub fn movie_key(film_name: &str, format_name: &str) -> String {
    format!("{} ({})", film_name, format_name)
}

/// One film in one format, with every showtime collected per theater.
///
/// `format`, `link` and `run_time` are set when the key is first seen and
/// never touched again.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub format: String,
    pub link: String,
    pub run_time: String,
    /// Theater name -> showtimes in the order the feed listed them
    pub theaters: BTreeMap<String, Vec<Showtime>>,
}

impl Movie {
    pub fn new(format: impl Into<String>, link: impl Into<String>, run_time: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            link: link.into(),
            run_time: run_time.into(),
            theaters: BTreeMap::new(),
        }
    }

    /// All showtimes across theaters, theater by theater
    pub fn showtimes(&self) -> impl Iterator<Item = Showtime> + '_ {
        self.theaters.values().flatten().copied()
    }

    /// All showtimes across theaters, earliest first
    pub fn sorted_showtimes(&self) -> Vec<Showtime> {
        let mut showtimes: Vec<Showtime> = self.showtimes().collect();
        showtimes.sort();
        showtimes
    }

    pub fn earliest(&self) -> Option<Showtime> {
        self.showtimes().min()
    }

    pub fn latest(&self) -> Option<Showtime> {
        self.showtimes().max()
    }

    pub fn showtime_count(&self) -> usize {
        self.theaters.values().map(|v| v.len()).sum()
    }

    /// Theater names in sorted order
    pub fn theater_names(&self) -> Vec<&str> {
        self.theaters.keys().map(|name| name.as_str()).collect()
    }

    /// Instants collected more than once, at any theater, each listed once
    /// and earliest first
    pub fn duplicate_showtimes(&self) -> Vec<Showtime> {
        let sorted = self.sorted_showtimes();
        let mut duplicates: Vec<Showtime> = sorted
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();
        duplicates.dedup();
        duplicates
    }

    /// True when the same instant was collected twice, at any theater
    pub fn has_duplicate_showtimes(&self) -> bool {
        !self.duplicate_showtimes().is_empty()
    }
}

/// Movies keyed by `"{film} ({format})"`.
///
/// Backed by a `BTreeMap` so iteration order never depends on hashing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MovieMap {
    pub(crate) movies: BTreeMap<String, Movie>,
}

impl MovieMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Movie> {
        self.movies.get(key)
    }

    /// Return the movie stored under `key`, creating it with `create` first
    /// if the key has not been seen yet
    ///
    /// Rust concept: `entry()` does a single lookup and returns a handle
    /// that is either occupied or vacant. `or_insert_with` only runs the
    /// closure in the vacant case, so the link and runtime of the first
    /// occurrence stick. The returned `&mut Movie` borrows the map until the
    /// caller is done appending showtimes.
    pub fn get_or_insert_with<F>(&mut self, key: &str, create: F) -> &mut Movie
    where
        F: FnOnce() -> Movie,
    {
        self.movies.entry(key.to_string()).or_insert_with(create)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.movies.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.movies.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Movie)> {
        self.movies.iter().map(|(k, m)| (k.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Showtimes across every movie and theater
    pub fn total_showtimes(&self) -> usize {
        self.movies.values().map(Movie::showtime_count).sum()
    }
}

// =============================================================================
// Options and results
// =============================================================================

/// What to do when a movie+theater already holds a showtime being merged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Append everything, duplicates included
    #[default]
    Keep,
    /// Skip instants already collected for that movie at that theater
    Collapse,
}

/// Knobs for `aggregate_with`
#[derive(Debug, Clone)]
pub struct FeedOptions {
    pub link_base: String,
    pub duplicates: DuplicatePolicy,
    /// Offset applied to session times that carry none
    pub naive_offset: FixedOffset,
}

impl FeedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = link_base.into();
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_naive_offset(mut self, naive_offset: FixedOffset) -> Self {
        self.naive_offset = naive_offset;
        self
    }
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            link_base: DEFAULT_LINK_BASE.to_string(),
            duplicates: DuplicatePolicy::Keep,
            naive_offset: Utc.fix(),
        }
    }
}

/// Output of one aggregation run
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub movies: MovieMap,
    pub warnings: Vec<FeedWarning>,
}
