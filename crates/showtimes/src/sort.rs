//! Display order for the movie map.

use crate::types::{MovieMap, Showtime};
use std::cmp::Ordering;

/// Movie keys ordered by each movie's earliest showtime at any theater.
///
/// Ties go to the lexicographically smaller key. Movies with no showtimes at
/// all have no earliest showtime and are placed last, in key order.
pub fn sort_by_earliest_showtime(movies: &MovieMap) -> Vec<&str> {
    let mut keyed: Vec<(&str, Option<Showtime>)> = movies
        .iter()
        .map(|(key, movie)| (key, movie.earliest()))
        .collect();

    keyed.sort_by(|(key_a, earliest_a), (key_b, earliest_b)| {
        compare_earliest(earliest_a, earliest_b).then_with(|| key_a.cmp(key_b))
    });

    keyed.into_iter().map(|(key, _)| key).collect()
}

/// `None` (no showtimes) sorts after every real showtime
fn compare_earliest(a: &Option<Showtime>, b: &Option<Showtime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
