//! Reshaping the date-major feed into the movie map.
//!
//! For every date, for every cinema, for every film showing there, for every
//! format that film is showing in:
//! - combine film name and format into the movie key
//! - create the movie on first sight (format, link, runtime)
//! - parse that format's sessions and append them to the movie's list for
//!   the cinema
//!
//! A cinema can list the same film more than once (once per date, and
//! occasionally twice on one date), so lists are merged rather than replaced.

use crate::error::{FeedError, FeedWarning, Result};
use crate::types::*;

/// Build the movie map with default options, discarding warnings
pub fn aggregate(feed: &Feed) -> Result<MovieMap> {
    aggregate_with(feed, &FeedOptions::default()).map(|aggregation| aggregation.movies)
}

/// Build the movie map and collect any feed warnings.
///
/// Fails on the first session time that cannot be parsed; nothing built up to
/// that point is returned.
///
/// Rust concept: the map being built is a local owned by this function.
/// Returning early with `?` drops it, so a partial map can never escape.
/// Only the finished `Aggregation` is moved out to the caller.
pub fn aggregate_with(feed: &Feed, options: &FeedOptions) -> Result<Aggregation> {
    let mut aggregation = Aggregation::default();

    for date in &feed.market.dates {
        for cinema in &date.cinemas {
            for film in &cinema.films {
                let Some(series) = first_series(film, cinema, &mut aggregation.warnings) else {
                    continue;
                };

                for format in &series.formats {
                    let key = movie_key(&film.film_name, &format.format_name);
                    let showtimes = parse_sessions(format, &key, cinema, options)?;

                    let movie = aggregation.movies.get_or_insert_with(&key, || {
                        Movie::new(
                            format.format_name.as_str(),
                            format!("{}{}", options.link_base, film.film_id),
                            film.film_runtime.as_str(),
                        )
                    });
                    merge_showtimes(movie, &cinema.cinema_name, showtimes, options.duplicates);
                }
            }
        }
    }

    Ok(aggregation)
}

/// The feed carries exactly one Series per film; record a warning whenever
/// that does not hold
fn first_series<'a>(
    film: &'a Film,
    cinema: &Cinema,
    warnings: &mut Vec<FeedWarning>,
) -> Option<&'a Series> {
    match film.series.len() {
        0 => warnings.push(FeedWarning::MissingSeries {
            film: film.film_name.clone(),
            cinema: cinema.cinema_name.clone(),
        }),
        1 => {}
        count => warnings.push(FeedWarning::MultipleSeries {
            film: film.film_name.clone(),
            cinema: cinema.cinema_name.clone(),
            count,
        }),
    }
    film.series.first()
}

fn parse_sessions(
    format: &Format,
    key: &str,
    cinema: &Cinema,
    options: &FeedOptions,
) -> Result<Vec<Showtime>> {
    format
        .sessions
        .iter()
        .map(|session| {
            Showtime::parse(&session.session_date_time, options.naive_offset).ok_or_else(|| {
                FeedError::InvalidTimestamp {
                    movie: key.to_string(),
                    cinema: cinema.cinema_name.clone(),
                    value: session.session_date_time.clone(),
                }
            })
        })
        .collect()
}

fn merge_showtimes(
    movie: &mut Movie,
    cinema_name: &str,
    showtimes: Vec<Showtime>,
    policy: DuplicatePolicy,
) {
    let collected = movie
        .theaters
        .entry(cinema_name.to_string())
        .or_insert_with(Vec::new);

    match policy {
        DuplicatePolicy::Keep => collected.extend(showtimes),
        DuplicatePolicy::Collapse => {
            for showtime in showtimes {
                if !collected.contains(&showtime) {
                    collected.push(showtime);
                }
            }
        }
    }
}
