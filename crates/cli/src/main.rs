use anyhow::{anyhow, bail, Context, Result};
use chrono::FixedOffset;
use clap::{Parser, Subcommand};
use colored::Colorize;
use showtimes::{
    aggregate_with, build_listings, DuplicatePolicy, Feed, FeedOptions, MovieListing, MovieMap,
    DEFAULT_LINK_BASE,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Showtimes - what's playing, grouped by movie instead of by date
#[derive(Parser)]
#[command(name = "showtimes")]
#[command(about = "Reshape a cinema showtime feed into a per-movie listing", long_about = None)]
struct Cli {
    /// Path to the showtime feed (JSON)
    #[arg(short, long, default_value = "alamo-feed.json")]
    feed: PathBuf,

    /// Drop showtimes already collected for the same movie and theater
    #[arg(long)]
    collapse_duplicates: bool,

    /// UTC offset, in hours, for session times that carry no offset
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset_hours: i32,

    /// Prefix for movie detail links (the feed's FilmId is appended)
    #[arg(long, default_value = DEFAULT_LINK_BASE)]
    link_base: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every movie, earliest showing first
    List {
        /// Also show link, runtime and every showtime
        #[arg(long)]
        details: bool,
    },

    /// Search for movies by title
    Search {
        /// Title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Print the aggregated data as JSON
    ///
    /// Showtimes are written as RFC 3339 with an explicit offset
    /// (`2018-09-04T02:45:00+00:00`), not the `...T02:45:00.000Z` form of the
    /// vendor tooling, so the two dumps will not diff line for line.
    Dump {
        /// Dump display listings instead of the raw movie map
        #[arg(long)]
        listings: bool,
    },

    /// Sanity-check a feed against known counts
    Check {
        /// Expected number of dates in the feed
        #[arg(long)]
        dates: Option<usize>,

        /// Movie key to inspect, e.g. "THE ROOM Movie Party (Digital)"
        #[arg(long)]
        movie: Option<String>,

        /// Expected total showtimes for --movie
        #[arg(long, requires = "movie")]
        showtimes: Option<usize>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let options = build_options(&cli)?;

    let start = Instant::now();
    let feed = Feed::load(&cli.feed)
        .with_context(|| format!("Failed to load showtime feed {}", cli.feed.display()))?;
    let aggregation = aggregate_with(&feed, &options).context("Failed to aggregate showtime feed")?;
    for warning in &aggregation.warnings {
        warn!("{}", warning);
    }
    info!(
        "Collected {} movies ({} showtimes) from {} dates in {:?}",
        aggregation.movies.len(),
        aggregation.movies.total_showtimes(),
        feed.date_count(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::List { details } => handle_list(&aggregation.movies, details),
        Commands::Search { title } => handle_search(&aggregation.movies, &title),
        Commands::Dump { listings } => handle_dump(&aggregation.movies, listings)?,
        Commands::Check {
            dates,
            movie,
            showtimes,
        } => handle_check(&feed, &aggregation.movies, dates, movie.as_deref(), showtimes)?,
    }

    Ok(())
}

fn build_options(cli: &Cli) -> Result<FeedOptions> {
    let naive_offset = cli
        .offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| anyhow!("UTC offset out of range: {} hours", cli.offset_hours))?;
    let duplicates = if cli.collapse_duplicates {
        DuplicatePolicy::Collapse
    } else {
        DuplicatePolicy::Keep
    };

    Ok(FeedOptions::new()
        .with_link_base(cli.link_base.clone())
        .with_duplicates(duplicates)
        .with_naive_offset(naive_offset))
}

/// Handle the 'list' command
fn handle_list(movies: &MovieMap, details: bool) {
    let listings = build_listings(movies);

    println!("{}", "Now Showing:".bold().blue());
    for listing in &listings {
        print_listing(listing, details);
    }
}

/// Handle the 'search' command
fn handle_search(movies: &MovieMap, title: &str) {
    let title_lower = title.to_lowercase();

    // Exact matches first, then substring matches; listing order within each
    let mut matches: Vec<(u8, MovieListing)> = build_listings(movies)
        .into_iter()
        .filter_map(|listing| {
            let listing_lower = listing.title.to_lowercase();
            if listing_lower == title_lower {
                Some((0, listing))
            } else if listing_lower.contains(&title_lower) {
                Some((1, listing))
            } else {
                None
            }
        })
        .collect();
    matches.sort_by_key(|(rank, _)| *rank);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for (_, listing) in matches.iter().take(20) {
        print_listing(listing, true);
    }
}

/// Handle the 'dump' command
///
/// `Movie` serializes as `format`, `link`, `runTime`, `theaters`; each
/// showtime keeps the offset it was parsed with (`+00:00` rather than `Z`).
fn handle_dump(movies: &MovieMap, listings: bool) -> Result<()> {
    let json = if listings {
        serde_json::to_string_pretty(&build_listings(movies))?
    } else {
        serde_json::to_string_pretty(movies)?
    };
    println!("{}", json);
    Ok(())
}

/// Handle the 'check' command
fn handle_check(
    feed: &Feed,
    movies: &MovieMap,
    expected_dates: Option<usize>,
    movie_key: Option<&str>,
    expected_showtimes: Option<usize>,
) -> Result<()> {
    let mut failures = 0;

    if let Some(expected) = expected_dates {
        let found = feed.date_count();
        failures += report(
            found == expected,
            format!("Expected {} dates in feed, found {}", expected, found),
        );
    }

    if let Some(key) = movie_key {
        let movie = movies
            .get(key)
            .ok_or_else(|| anyhow!("Movie '{}' not found in feed", key))?;

        if let Some(expected) = expected_showtimes {
            let found = movie.showtime_count();
            failures += report(
                found == expected,
                format!("Expected {} to have {} showtimes, found {}", key, expected, found),
            );
        }

        let duplicates: Vec<String> = movie
            .duplicate_showtimes()
            .iter()
            .map(|showtime| showtime.to_string())
            .collect();
        failures += report(
            duplicates.is_empty(),
            if duplicates.is_empty() {
                format!("No duplicate showtimes for {}", key)
            } else {
                format!("Found duplicate showtimes for {}: {}", key, duplicates.join(", "))
            },
        );
    }

    if failures > 0 {
        bail!("{} feed check(s) failed", failures);
    }
    Ok(())
}

/// Print one check line, returning 1 for a failure so callers can tally
fn report(passed: bool, message: String) -> usize {
    if passed {
        println!("{} {}", "✓".green(), message);
        0
    } else {
        println!("{} {}", "✗".red(), message);
        1
    }
}

/// Helper function to format and print one movie row
fn print_listing(listing: &MovieListing, details: bool) {
    println!(
        "{}  {}  {}",
        listing.title.bold(),
        listing.date_range_text().cyan(),
        listing.theaters.join(", ")
    );
    if details {
        println!("   {}", listing.link);
        println!("   Runtime: {} minutes", listing.run_time);
        for screening in &listing.screenings {
            println!("   {}{} at {}", "• ".green(), screening.showtime, screening.theater);
        }
    }
}
