//! Display-ready projection of the movie map.
//!
//! A presentation layer should be able to render straight from a
//! `MovieListing` without re-aggregating or re-sorting anything: theaters come
//! sorted, showtimes come flattened and sorted, and the date range is already
//! summarized.

use crate::range::DateRange;
use crate::sort::sort_by_earliest_showtime;
use crate::types::{Movie, MovieMap, Showtime};
use serde::Serialize;

/// One showtime together with the theater it plays at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Screening {
    pub theater: String,
    pub showtime: Showtime,
}

/// Everything needed to render one row of the movie list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListing {
    /// Composite key, e.g. `"THE ROOM Movie Party (Digital)"`
    pub title: String,
    pub format: String,
    pub link: String,
    pub run_time: String,
    pub theaters: Vec<String>,
    pub showtimes: Vec<Showtime>,
    /// Ordered by time, then theater name
    pub screenings: Vec<Screening>,
    /// `None` when the movie has no showtimes
    pub date_range: Option<DateRange>,
}

impl MovieListing {
    pub fn from_movie(title: &str, movie: &Movie) -> Self {
        let showtimes = movie.sorted_showtimes();

        let mut screenings: Vec<Screening> = movie
            .theaters
            .iter()
            .flat_map(|(theater, times)| {
                times.iter().map(move |showtime| Screening {
                    theater: theater.clone(),
                    showtime: *showtime,
                })
            })
            .collect();
        screenings.sort_by(|a, b| {
            a.showtime
                .cmp(&b.showtime)
                .then_with(|| a.theater.cmp(&b.theater))
        });

        Self {
            title: title.to_string(),
            format: movie.format.clone(),
            link: movie.link.clone(),
            run_time: movie.run_time.clone(),
            theaters: movie.theaters.keys().cloned().collect(),
            date_range: DateRange::from_showtimes(&showtimes).ok(),
            showtimes,
            screenings,
        }
    }

    /// Date range text, or an empty string for a movie with no showtimes
    pub fn date_range_text(&self) -> String {
        self.date_range
            .map(|range| range.to_string())
            .unwrap_or_default()
    }
}

/// All movies as listings, earliest showing first
pub fn build_listings(movies: &MovieMap) -> Vec<MovieListing> {
    sort_by_earliest_showtime(movies)
        .into_iter()
        .filter_map(|key| movies.get(key).map(|movie| MovieListing::from_movie(key, movie)))
        .collect()
}
