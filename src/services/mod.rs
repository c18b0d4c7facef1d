use std::collections::HashMap;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Report, WrapErr, eyre};
use sea_orm::{ConnectionTrait, EntityTrait, TransactionError};

use crate::entities;

pub mod artist;
pub mod show;
pub mod venue;

pub use artist::ArtistService;
pub use show::ShowService;
pub use venue::VenueService;

pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for SearchResults<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Whether `name` contains `term`, ignoring case. A blank term matches
/// everything. Done in Rust so non-ASCII names fold too and `%` or `_` in a
/// term are plain characters.
pub(crate) fn name_matches(name: &str, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || name.to_lowercase().contains(&term.to_lowercase())
}

/// Flatten the error of a `conn.transaction(..)` call. The transaction has
/// already been rolled back when this is reached.
pub(crate) fn transaction_error(err: TransactionError<Report>) -> Report {
    match err {
        TransactionError::Connection(e) => eyre!("Database transaction failed: {}", e),
        TransactionError::Transaction(e) => e,
    }
}

/// Upcoming (start_time >= now) show counts keyed by venue id or artist id.
pub(crate) async fn upcoming_show_counts<C>(
    conn: &C,
    key: fn(&entities::show::Model) -> i64,
    now: DateTime<Utc>,
) -> color_eyre::Result<HashMap<i64, usize>>
where
    C: ConnectionTrait,
{
    let shows = entities::show::Entity::find()
        .all(conn)
        .await
        .wrap_err("Failed to load shows")?;

    let mut counts = HashMap::new();
    for show in shows.iter().filter(|s| s.start_time >= now) {
        *counts.entry(key(show)).or_insert(0) += 1;
    }
    Ok(counts)
}
