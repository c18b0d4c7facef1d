use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::forms::{NewVenue, VenueChanges, join_genres, split_genres};
use crate::services::show::{ShowAppearance, ShowPartition, partition_shows};
use crate::services::{SearchResults, name_matches, transaction_error, upcoming_show_counts};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues that share a city and state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone)]
pub struct VenueDetail {
    pub venue: entities::venue::Model,
    pub genres: Vec<String>,
    /// Counterparts are artists
    pub shows: ShowPartition,
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every venue grouped by (city, state), ordered by state, city, then name.
    pub async fn list_areas(&self) -> Result<Vec<VenueArea>> {
        let venues = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::State)
            .order_by_asc(entities::venue::Column::City)
            .order_by_asc(entities::venue::Column::Name)
            .all(&self.db.conn)
            .await
            .wrap_err("Failed to fetch venues")?;
        let upcoming = upcoming_show_counts(&self.db.conn, |s| s.venue_id, Utc::now()).await?;

        let mut areas: Vec<VenueArea> = Vec::new();
        for venue in venues {
            let summary = VenueSummary {
                id: venue.id,
                num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            };
            match areas.last_mut() {
                Some(area) if area.city == venue.city && area.state == venue.state => {
                    area.venues.push(summary)
                }
                _ => areas.push(VenueArea {
                    city: venue.city,
                    state: venue.state,
                    venues: vec![summary],
                }),
            }
        }

        Ok(areas)
    }

    /// Case-insensitive substring match on the venue name.
    pub async fn search(&self, term: &str) -> Result<SearchResults<VenueSummary>> {
        log::debug!("Searching venues for '{}'", term);

        let venues = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::Name)
            .all(&self.db.conn)
            .await
            .wrap_err("Failed to search venues")?;
        let upcoming = upcoming_show_counts(&self.db.conn, |s| s.venue_id, Utc::now()).await?;

        Ok(venues
            .into_iter()
            .filter(|venue| name_matches(&venue.name, term))
            .map(|venue| VenueSummary {
                id: venue.id,
                num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            })
            .collect::<Vec<_>>()
            .into())
    }

    pub async fn list_all(&self) -> Result<Vec<entities::venue::Model>> {
        entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::Name)
            .all(&self.db.conn)
            .await
            .wrap_err("Failed to fetch venues")
    }

    pub async fn get(&self, id: i64) -> Result<Option<entities::venue::Model>> {
        entities::venue::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await
            .wrap_err("Failed to find venue")
    }

    pub async fn get_detail(&self, id: i64) -> Result<Option<VenueDetail>> {
        let Some(venue) = self.get(id).await? else {
            return Ok(None);
        };

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.eq(id))
            .find_also_related(entities::artist::Entity)
            .all(&self.db.conn)
            .await
            .wrap_err("Failed to fetch venue shows")?;

        let appearances = shows
            .into_iter()
            .filter_map(|(show, artist)| {
                artist.map(|artist| ShowAppearance {
                    show_id: show.id,
                    counterpart_id: artist.id,
                    counterpart_name: artist.name,
                    counterpart_image_link: artist.image_link,
                    start_time: show.start_time,
                })
            })
            .collect();

        Ok(Some(VenueDetail {
            genres: split_genres(&venue.genres),
            shows: partition_shows(appearances, Utc::now()),
            venue,
        }))
    }

    pub async fn create(&self, new_venue: NewVenue) -> Result<entities::venue::Model> {
        log::debug!("Creating venue: '{}'", new_venue.name);

        let venue = entities::venue::ActiveModel {
            name: Set(new_venue.name),
            city: Set(new_venue.city),
            state: Set(new_venue.state),
            address: Set(new_venue.address),
            phone: Set(new_venue.phone),
            website: Set(new_venue.website),
            genres: Set(join_genres(&new_venue.genres)),
            image_link: Set(new_venue.image_link),
            facebook_link: Set(new_venue.facebook_link),
            seeking_talent: Set(new_venue.seeking_talent),
            seeking_description: Set(new_venue.seeking_description),
            ..entities::venue::ActiveModel::new()
        };

        let model = self
            .db
            .conn
            .transaction::<_, entities::venue::Model, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move { venue.insert(txn).await.wrap_err("Failed to insert venue") })
            })
            .await
            .map_err(transaction_error)?;

        log::info!("Venue created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Overwrite the submitted fields of a venue. `Ok(None)` when the id is unknown.
    pub async fn update(
        &self,
        id: i64,
        changes: VenueChanges,
    ) -> Result<Option<entities::venue::Model>> {
        let updated = self
            .db
            .conn
            .transaction::<_, Option<entities::venue::Model>, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move {
                    let Some(venue) = entities::venue::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .wrap_err("Failed to find venue")?
                    else {
                        return Ok(None);
                    };

                    let mut active: entities::venue::ActiveModel = venue.into();
                    if let Some(name) = changes.name {
                        active.name = Set(name);
                    }
                    if let Some(city) = changes.city {
                        active.city = Set(city);
                    }
                    if let Some(state) = changes.state {
                        active.state = Set(state);
                    }
                    if let Some(address) = changes.address {
                        active.address = Set(address);
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
                    if let Some(seeking_talent) = changes.seeking_talent {
                        active.seeking_talent = Set(seeking_talent);
                    }
                    if let Some(seeking_description) = changes.seeking_description {
                        active.seeking_description = Set(seeking_description);
                    }

                    let model = active.update(txn).await.wrap_err("Failed to update venue")?;
                    Ok(Some(model))
                })
            })
            .await
            .map_err(transaction_error)?;

        if let Some(venue) = &updated {
            log::info!("Venue updated: '{}' (ID: {})", venue.name, venue.id);
        }
        Ok(updated)
    }

    /// Delete a venue and, through the foreign key, its shows.
    pub async fn delete(&self, id: i64) -> Result<Option<entities::venue::Model>> {
        let deleted = self
            .db
            .conn
            .transaction::<_, Option<entities::venue::Model>, color_eyre::eyre::Report>(|txn| {
                Box::pin(async move {
                    let Some(venue) = entities::venue::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .wrap_err("Failed to find venue")?
                    else {
                        return Ok(None);
                    };
                    venue
                        .clone()
                        .delete(txn)
                        .await
                        .wrap_err("Failed to delete venue")?;
                    Ok(Some(venue))
                })
            })
            .await
            .map_err(transaction_error)?;

        if let Some(venue) = &deleted {
            log::info!("Venue deleted: '{}' (ID: {})", venue.name, venue.id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_demo_data;
    use crate::test_utils::{test_db, utc};
    use sea_orm::PaginatorTrait;

    fn new_venue(name: &str) -> NewVenue {
        NewVenue {
            name: name.into(),
            city: "Seattle".into(),
            state: "WA".into(),
            address: "1 Pike Place".into(),
            phone: Some("206-555-0100".into()),
            website: None,
            image_link: None,
            facebook_link: None,
            genres: vec!["Blues".into(), "Soul".into()],
            seeking_talent: true,
            seeking_description: Some("Looking for weekend acts".into()),
        }
    }

    fn names(results: &SearchResults<VenueSummary>) -> Vec<&str> {
        results.data.iter().map(|v| v.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_search_hop() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = VenueService::new(db);

        let results = service.search("Hop").await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(names(&results), vec!["The Musical Hop"]);
    }

    #[tokio::test]
    async fn test_search_music_is_case_insensitive() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = VenueService::new(db);

        for term in ["Music", "music", "MUSIC"] {
            let results = service.search(term).await.unwrap();
            assert_eq!(results.count, 2, "{term}");
            assert_eq!(
                names(&results),
                vec!["Park Square Live Music & Coffee", "The Musical Hop"]
            );
        }
    }

    #[tokio::test]
    async fn test_search_empty_term_matches_all() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = VenueService::new(db);

        assert_eq!(service.search("").await.unwrap().count, 3);
        assert_eq!(service.search("no such venue").await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = VenueService::new(db);

        assert_eq!(service.search("_").await.unwrap().count, 0);
        assert_eq!(service.search("%").await.unwrap().count, 0);
        assert_eq!(service.search("\\").await.unwrap().count, 0);

        service.create(new_venue("100% Jazz")).await.unwrap();
        assert_eq!(names(&service.search("%").await.unwrap()), vec!["100% Jazz"]);
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let db = test_db().await;
        let service = VenueService::new(db);
        service.create(new_venue("Café Élan")).await.unwrap();

        for term in ["Café Élan", "café élan", "CAFÉ ÉLAN", "élan"] {
            assert_eq!(names(&service.search(term).await.unwrap()), vec!["Café Élan"], "{term}");
        }
    }

    #[tokio::test]
    async fn test_list_areas_groups_by_city_and_state() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = VenueService::new(db);

        let areas = service.list_areas().await.unwrap();
        let keys: Vec<(&str, &str, usize)> = areas
            .iter()
            .map(|a| (a.city.as_str(), a.state.as_str(), a.venues.len()))
            .collect();
        assert_eq!(keys, vec![("San Francisco", "CA", 2), ("New York", "NY", 1)]);

        let park_square = areas[0]
            .venues
            .iter()
            .find(|v| v.name == "Park Square Live Music & Coffee")
            .unwrap();
        assert_eq!(park_square.num_upcoming_shows, 3);
    }

    #[tokio::test]
    async fn test_create_venue_is_retrievable() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        let created = service.create(new_venue("The Blue Door")).await.unwrap();

        assert_eq!(entities::venue::Entity::find().count(&db.conn).await.unwrap(), 1);
        let fetched = service.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "The Blue Door");
        assert_eq!(fetched.genres, "Blues,Soul");
        assert!(fetched.seeking_talent);

        let detail = service.get_detail(created.id).await.unwrap().unwrap();
        assert_eq!(detail.genres, vec!["Blues", "Soul"]);
        assert_eq!(detail.shows, ShowPartition::default());
    }

    #[tokio::test]
    async fn test_detail_partitions_past_and_upcoming() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = VenueService::new(db.clone());
        let venue = service.search("Park Square").await.unwrap().data.remove(0);

        let detail = service.get_detail(venue.id).await.unwrap().unwrap();

        let total = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.eq(venue.id))
            .count(&db.conn)
            .await
            .unwrap() as usize;
        assert_eq!(detail.shows.past_count() + detail.shows.upcoming_count(), total);
        assert_eq!(detail.shows.past_count(), 1);
        assert_eq!(detail.shows.upcoming_count(), 3);
        assert_eq!(detail.shows.past[0].counterpart_name, "Matt Quevedo");
        assert!(detail.shows.past.iter().all(|s| s.start_time < Utc::now()));
        assert!(
            detail
                .shows
                .upcoming
                .iter()
                .all(|s| s.start_time >= Utc::now() && s.counterpart_name == "The Wild Sax Band")
        );
    }

    #[tokio::test]
    async fn test_detail_unknown_id() {
        let db = test_db().await;
        let service = VenueService::new(db);
        assert!(service.get_detail(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_only_touches_submitted_fields() {
        let db = test_db().await;
        let service = VenueService::new(db);
        let created = service.create(new_venue("The Blue Door")).await.unwrap();

        let updated = service
            .update(
                created.id,
                VenueChanges {
                    name: Some("The Red Door".into()),
                    website: Some(Some("https://reddoor.example".into())),
                    phone: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "The Red Door");
        assert_eq!(updated.website.as_deref(), Some("https://reddoor.example"));
        assert_eq!(updated.phone, None);
        assert_eq!(updated.city, created.city);
        assert_eq!(updated.genres, created.genres);
        assert_eq!(updated.seeking_description, created.seeking_description);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_venue() {
        let db = test_db().await;
        let service = VenueService::new(db);
        let result = service.update(7, VenueChanges::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_venue_removes_its_shows() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let service = VenueService::new(db.clone());
        let venue = service.search("Park Square").await.unwrap().data.remove(0);

        let deleted = service.delete(venue.id).await.unwrap().unwrap();
        assert_eq!(deleted.name, "Park Square Live Music & Coffee");
        assert!(service.get(venue.id).await.unwrap().is_none());

        let remaining = entities::show::Entity::find().all(&db.conn).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|s| s.venue_id != venue.id));
    }

    #[tokio::test]
    async fn test_upcoming_counts_ignore_past_shows() {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();

        let counts = upcoming_show_counts(&db.conn, |s| s.venue_id, utc(2019, 6, 1, 0, 0))
            .await
            .unwrap();
        assert_eq!(counts.values().sum::<usize>(), 4);
    }
}
