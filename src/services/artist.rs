use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::forms::{ArtistChanges, NewArtist, join_genres, split_genres};
use crate::services::show::{ShowAppearance, ShowPartition, partition_shows};
use crate::services::{SearchResults, name_matches, transaction_error, upcoming_show_counts};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone)]
pub struct ArtistDetail {
    pub artist: entities::artist::Model,
    pub genres: Vec<String>,
    /// Counterparts are venues
    pub shows: ShowPartition,
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<ArtistSummary>> {
        self.find_by_name("").await
    }

    pub async fn search(&self, term: &str) -> Result<SearchResults<ArtistSummary>> {
        log::debug!("Searching artists for '{}'", term);
        Ok(self.find_by_name(term).await?.into())
    }

    /// Names containing `term`, ignoring case, sorted by name.
    async fn find_by_name(&self, term: &str) -> Result<Vec<ArtistSummary>> {
        let artists = entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Name)
            .all(&self.db.conn)
            .await
            .wrap_err("Failed to fetch artists")?;
        let upcoming = upcoming_show_counts(&self.db.conn, |s| s.artist_id, Utc::now()).await?;

        Ok(artists
            .into_iter()
            .filter(|artist| name_matches(&artist.name, term))
            .map(|artist| ArtistSummary {
                id: artist.id,
                num_upcoming_shows: upcoming.get(&artist.id).copied().unwrap_or(0),
                name: artist.name,
            })
            .collect())
    }

    pub async fn list_all(&self) -> Result<Vec<entities::artist::Model>> {
        entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Name)
            .all(&self.db.conn)
            .await
            .wrap_err("Failed to fetch artists")
    }

    pub async fn get(&self, id: i64) -> Result<Option<entities::artist::Model>> {
        entities::artist::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await
            .wrap_err("Failed to find artist")
    }

    pub async fn get_detail(&self, id: i64) -> Result<Option<ArtistDetail>> {
        let Some(artist) = self.get(id).await? else {
            return Ok(None);
        };

        let appearances = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.eq(id))
            .find_also_related(entities::venue::Entity)
            .all(&self.db.conn)
            .await
            .wrap_err("Failed to fetch artist shows")?
            .into_iter()
            .filter_map(|(show, venue)| {
                venue.map(|venue| ShowAppearance {
                    show_id: show.id,
                    counterpart_id: venue.id,
                    counterpart_name: venue.name,
                    counterpart_image_link: venue.image_link,
                    start_time: show.start_time,
                })
            })
            .collect();

        Ok(Some(ArtistDetail {
            genres: split_genres(&artist.genres),
            shows: partition_shows(appearances, Utc::now()),
            artist,
        }))
    }

    pub async fn create(&self, new_artist: NewArtist) -> Result<entities::artist::Model> {
        log::debug!("Creating artist: '{}'", new_artist.name);

        let artist = entities::artist::ActiveModel {
            name: Set(new_artist.name),
            city: Set(new_artist.city),
            state: Set(new_artist.state),
            phone: Set(new_artist.phone),
            website: Set(new_artist.website),
            genres: Set(join_genres(&new_artist.genres)),
            image_link: Set(new_artist.image_link),
            facebook_link: Set(new_artist.facebook_link),
            seeking_venue: Set(new_artist.seeking_venue),
            seeking_description: Set(new_artist.seeking_description),
            ..entities::artist::ActiveModel::new()
        };

        let model = self
            .db
            .conn
            .transaction::<_, entities::artist::Model, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move { artist.insert(txn).await.wrap_err("Failed to insert artist") })
            })
            .await
            .map_err(transaction_error)?;

        log::info!("Artist created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    pub async fn update(
        &self,
        id: i64,
        changes: ArtistChanges,
    ) -> Result<Option<entities::artist::Model>> {
        let updated = self
            .db
            .conn
            .transaction::<_, Option<entities::artist::Model>, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move {
                    let Some(artist) = entities::artist::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .wrap_err("Failed to find artist")?
                    else {
                        return Ok(None);
                    };

                    let mut active: entities::artist::ActiveModel = artist.into();
                    if let Some(name) = changes.name {
                        active.name = Set(name);
                    }
                    if let Some(city) = changes.city {
                        active.city = Set(city);
                    }
                    if let Some(state) = changes.state {
                        active.state = Set(state);
                    }
                    if let Some(phone) = changes.phone {
                        active.phone = Set(phone);
                    }
                    if let Some(website) = changes.website {
                        active.website = Set(website);
                    }
                    if let Some(image_link) = changes.image_link {
                        active.image_link = Set(image_link);
                    }
                    if let Some(facebook_link) = changes.facebook_link {
                        active.facebook_link = Set(facebook_link);
                    }
                    if let Some(genres) = changes.genres {
                        active.genres = Set(join_genres(&genres));
                    }
                    if let Some(seeking_venue) = changes.seeking_venue {
                        active.seeking_venue = Set(seeking_venue);
                    }
                    if let Some(seeking_description) = changes.seeking_description {
                        active.seeking_description = Set(seeking_description);
                    }

                    let model = active.update(txn).await.wrap_err("Failed to update artist")?;
                    Ok(Some(model))
                })
            })
            .await
            .map_err(transaction_error)?;

        if let Some(artist) = &updated {
            log::info!("Artist updated: '{}' (ID: {})", artist.name, artist.id);
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<Option<entities::artist::Model>> {
        let deleted = self
            .db
            .conn
            .transaction::<_, Option<entities::artist::Model>, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move {
                    let Some(artist) = entities::artist::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .wrap_err("Failed to find artist")?
                    else {
                        return Ok(None);
                    };
                    artist
                        .clone()
                        .delete(txn)
                        .await
                        .wrap_err("Failed to delete artist")?;
                    Ok(Some(artist))
                })
            })
            .await
            .map_err(transaction_error)?;

        if let Some(artist) = &deleted {
            log::info!("Artist deleted: '{}' (ID: {})", artist.name, artist.id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::ArtistForm;
    use crate::seed::seed_demo_data;
    use crate::test_utils::test_db;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = ArtistService::new(db);

        let artists = service.list().await.unwrap();
        let names: Vec<&str> = artists.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"]);
    }

    #[tokio::test]
    async fn test_search_single_letter() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = ArtistService::new(db);

        assert_eq!(service.search("A").await.unwrap().count, 3);
        assert_eq!(service.search("a").await.unwrap().count, 3);
    }

    #[tokio::test]
    async fn test_search_band() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = ArtistService::new(db);

        let results = service.search("band").await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].name, "The Wild Sax Band");
        assert_eq!(results.data[0].num_upcoming_shows, 3);
    }

    #[tokio::test]
    async fn test_search_matches_names_as_written() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = ArtistService::new(db);

        assert_eq!(service.search("_").await.unwrap().count, 0);
        assert_eq!(service.search("N_P").await.unwrap().count, 0);

        service
            .create(NewArtist {
                name: "Ñandú Ensemble".into(),
                city: "San Francisco".into(),
                state: "CA".into(),
                phone: None,
                website: None,
                image_link: None,
                facebook_link: None,
                genres: vec!["Folk".into()],
                seeking_venue: false,
                seeking_description: None,
            })
            .await
            .unwrap();
        let results = service.search("ÑANDÚ").await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].name, "Ñandú Ensemble");
    }

    #[tokio::test]
    async fn test_detail_lists_venues_as_counterparts() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = ArtistService::new(db);
        let gnp = service.search("Guns").await.unwrap().data.remove(0);

        let detail = service.get_detail(gnp.id).await.unwrap().unwrap();
        assert_eq!(detail.genres, vec!["Rock n Roll"]);
        assert_eq!(detail.shows.past_count(), 1);
        assert_eq!(detail.shows.upcoming_count(), 0);
        assert_eq!(detail.shows.past[0].counterpart_name, "The Musical Hop");
    }

    #[tokio::test]
    async fn test_edit_changes_only_submitted_fields() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = ArtistService::new(db);
        let before = service
            .get(service.search("Quevedo").await.unwrap().data[0].id)
            .await
            .unwrap()
            .unwrap();

        let form = ArtistForm {
            city: Some("Brooklyn".into()),
            genres: vec!["Jazz".into(), "Blues".into()],
            ..Default::default()
        };
        let changes = form.validate_changes().unwrap();
        let after = service.update(before.id, changes).await.unwrap().unwrap();

        assert_eq!(after.city, "Brooklyn");
        assert_eq!(after.genres, "Jazz,Blues");
        assert_eq!(after.name, before.name);
        assert_eq!(after.state, before.state);
        assert_eq!(after.phone, before.phone);
        assert_eq!(after.image_link, before.image_link);
        assert_eq!(after.facebook_link, before.facebook_link);
        assert_eq!(after.seeking_venue, before.seeking_venue);
        assert_eq!(after.seeking_description, before.seeking_description);
    }

    #[tokio::test]
    async fn test_delete_artist_removes_its_shows() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = ArtistService::new(db.clone());
        let sax = service.search("Sax").await.unwrap().data.remove(0);

        assert!(service.delete(sax.id).await.unwrap().is_some());
        assert!(service.get(sax.id).await.unwrap().is_none());
        assert_eq!(entities::show::Entity::find().count(&db.conn).await.unwrap(), 2);
        assert!(service.delete(sax.id).await.unwrap().is_none());
    }
}
