use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{OptionExt, Result, WrapErr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set,
    TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::forms::NewShow;
use crate::services::transaction_error;

/// One show seen from a venue or an artist page: the other side of the
/// booking and when it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowAppearance {
    pub show_id: i64,
    pub counterpart_id: i64,
    pub counterpart_name: String,
    pub counterpart_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowPartition {
    pub past: Vec<ShowAppearance>,
    pub upcoming: Vec<ShowAppearance>,
}

impl ShowPartition {
    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }
}

/// Split shows into past (`start_time < now`) and upcoming (`start_time >= now`),
/// each ordered by start time.
pub fn partition_shows(mut shows: Vec<ShowAppearance>, now: DateTime<Utc>) -> ShowPartition {
    shows.sort_by_key(|s| (s.start_time, s.show_id));
    let (past, upcoming) = shows.into_iter().partition(|s| s.start_time < now);
    ShowPartition { past, upcoming }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowListing {
    pub id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<ShowListing>> {
        let shows = entities::show::Entity::find()
            .order_by_asc(entities::show::Column::StartTime)
            .order_by_asc(entities::show::Column::Id)
            .all(&self.db.conn)
            .await
            .wrap_err("Failed to fetch shows")?;

        let mut listings = Vec::with_capacity(shows.len());
        for show in shows {
            listings.push(self.listing(show).await?);
        }
        Ok(listings)
    }

    async fn listing(&self, show: entities::show::Model) -> Result<ShowListing> {
        let venue = show
            .find_related(entities::venue::Entity)
            .one(&self.db.conn)
            .await
            .wrap_err("Failed to fetch show venue")?
            .ok_or_eyre("Show has no venue")?;
        let artist = show
            .find_related(entities::artist::Entity)
            .one(&self.db.conn)
            .await
            .wrap_err("Failed to fetch show artist")?
            .ok_or_eyre("Show has no artist")?;

        Ok(ShowListing {
            id: show.id,
            venue_id: venue.id,
            venue_name: venue.name,
            artist_id: artist.id,
            artist_name: artist.name,
            artist_image_link: artist.image_link,
            start_time: show.start_time,
        })
    }

    /// Insert a show. Venue and artist are checked inside the same
    /// transaction, so a missing side leaves nothing behind.
    pub async fn create(&self, new_show: NewShow) -> Result<entities::show::Model> {
        let NewShow {
            artist_id,
            venue_id,
            start_time,
        } = new_show;

        let show = self
            .db
            .conn
            .transaction::<_, entities::show::Model, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move {
                    entities::venue::Entity::find_by_id(venue_id)
                        .one(txn)
                        .await
                        .wrap_err("Failed to find venue")?
                        .ok_or_eyre(format!("Venue {} does not exist", venue_id))?;
                    entities::artist::Entity::find_by_id(artist_id)
                        .one(txn)
                        .await
                        .wrap_err("Failed to find artist")?
                        .ok_or_eyre(format!("Artist {} does not exist", artist_id))?;

                    let show = entities::show::ActiveModel {
                        venue_id: Set(venue_id),
                        artist_id: Set(artist_id),
                        start_time: Set(start_time),
                        ..entities::show::ActiveModel::new()
                    };
                    show.insert(txn).await.wrap_err("Failed to insert show")
                })
            })
            .await
            .map_err(transaction_error)?;

        log::info!(
            "Show created: venue {} / artist {} at {} (ID: {})",
            show.venue_id,
            show.artist_id,
            show.start_time,
            show.id
        );
        Ok(show)
    }

    pub async fn delete(&self, id: i64) -> Result<Option<entities::show::Model>> {
        let deleted = self
            .db
            .conn
            .transaction::<_, Option<entities::show::Model>, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move {
                    let Some(show) = entities::show::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .wrap_err("Failed to find show")?
                    else {
                        return Ok(None);
                    };
                    show.clone()
                        .delete(txn)
                        .await
                        .wrap_err("Failed to delete show")?;
                    Ok(Some(show))
                })
            })
            .await
            .map_err(transaction_error)?;

        if deleted.is_some() {
            log::info!("Show deleted (ID: {})", id);
        }
        Ok(deleted)
    }
}
