use chrono::{DateTime, TimeZone, Utc};
use color_eyre::eyre::{OptionExt, Report, Result, WrapErr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, PaginatorTrait, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::services::transaction_error;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .ok_or_eyre("Invalid seed timestamp")
}

/// Insert the demo venues, artists and shows. Does nothing when any venue
/// already exists.
pub async fn seed_demo_data(db: &Database) -> Result<()> {
    let existing = entities::venue::Entity::find()
        .count(&db.conn)
        .await
        .wrap_err("Failed to count venues")?;
    if existing > 0 {
        log::info!("Database already has {} venues, skipping seed", existing);
        return Ok(());
    }

    let show_times = [
        at(2019, 5, 21, 21, 30)?,
        at(2019, 6, 15, 23, 0)?,
        at(2035, 4, 1, 20, 0)?,
        at(2035, 4, 8, 20, 0)?,
        at(2035, 4, 15, 20, 0)?,
    ];

    db.conn
        .transaction::<_, (), Report>(|txn| {
            Box::pin(async move {
                let musical_hop = entities::venue::ActiveModel {
                    name: Set("The Musical Hop".into()),
                    city: Set("San Francisco".into()),
                    state: Set("CA".into()),
                    address: Set("1015 Folsom Street".into()),
                    phone: Set(Some("123-123-1234".into())),
                    website: Set(Some("https://www.themusicalhop.com".into())),
                    genres: Set("Jazz,Reggae,Swing,Classical,Folk".into()),
                    image_link: Set(Some("https://images.unsplash.com/photo-1543900694-133f37abaaa5?w=400".into())),
                    facebook_link: Set(Some("https://www.facebook.com/TheMusicalHop".into())),
                    seeking_talent: Set(true),
                    seeking_description: Set(Some(
                        "We are on the lookout for a local artist to play every two weeks. Please call us."
                            .into(),
                    )),
                    ..entities::venue::ActiveModel::new()
                }
                .insert(txn)
                .await?;

                entities::venue::ActiveModel {
                    name: Set("The Dueling Pianos Bar".into()),
                    city: Set("New York".into()),
                    state: Set("NY".into()),
                    address: Set("335 Delancey Street".into()),
                    phone: Set(Some("914-003-1132".into())),
                    website: Set(Some("https://www.theduelingpianos.com".into())),
                    genres: Set("Classical,R&B,Hip-Hop".into()),
                    image_link: Set(Some("https://images.unsplash.com/photo-1497032205916-ac775f0649ae?w=400".into())),
                    facebook_link: Set(Some("https://www.facebook.com/theduelingpianos".into())),
                    ..entities::venue::ActiveModel::new()
                }
                .insert(txn)
                .await?;

                let park_square = entities::venue::ActiveModel {
                    name: Set("Park Square Live Music & Coffee".into()),
                    city: Set("San Francisco".into()),
                    state: Set("CA".into()),
                    address: Set("34 Whiskey Moore Ave".into()),
                    phone: Set(Some("415-000-1234".into())),
                    website: Set(Some("https://www.parksquarelivemusicandcoffee.com".into())),
                    genres: Set("Rock n Roll,Jazz,Classical,Folk".into()),
                    image_link: Set(Some("https://images.unsplash.com/photo-1485686531765-ba63b07845a7?w=400".into())),
                    facebook_link: Set(Some(
                        "https://www.facebook.com/ParkSquareLiveMusicAndCoffee".into(),
                    )),
                    ..entities::venue::ActiveModel::new()
                }
                .insert(txn)
                .await?;

                let guns_n_petals = entities::artist::ActiveModel {
                    name: Set("Guns N Petals".into()),
                    city: Set("San Francisco".into()),
                    state: Set("CA".into()),
                    phone: Set(Some("326-123-5000".into())),
                    genres: Set("Rock n Roll".into()),
                    website: Set(Some("https://www.gunsnpetalsband.com".into())),
                    image_link: Set(Some("https://images.unsplash.com/photo-1549213783-8284d0336c4f?w=300".into())),
                    facebook_link: Set(Some("https://www.facebook.com/GunsNPetals".into())),
                    seeking_venue: Set(true),
                    seeking_description: Set(Some(
                        "Looking for shows to perform at in the San Francisco Bay Area!".into(),
                    )),
                    ..entities::artist::ActiveModel::new()
                }
                .insert(txn)
                .await?;

                let matt_quevedo = entities::artist::ActiveModel {
                    name: Set("Matt Quevedo".into()),
                    city: Set("New York".into()),
                    state: Set("NY".into()),
                    phone: Set(Some("300-400-5000".into())),
                    genres: Set("Jazz".into()),
                    image_link: Set(Some("https://images.unsplash.com/photo-1495223153807-b916f75de8c5?w=334".into())),
                    facebook_link: Set(Some("https://www.facebook.com/mattquevedo923251523".into())),
                    ..entities::artist::ActiveModel::new()
                }
                .insert(txn)
                .await?;

                let wild_sax = entities::artist::ActiveModel {
                    name: Set("The Wild Sax Band".into()),
                    city: Set("San Francisco".into()),
                    state: Set("CA".into()),
                    phone: Set(Some("432-325-5432".into())),
                    genres: Set("Jazz,Classical".into()),
                    image_link: Set(Some("https://images.unsplash.com/photo-1558369981-f9ca78462e61?w=794".into())),
                    ..entities::artist::ActiveModel::new()
                }
                .insert(txn)
                .await?;

                let bookings = [
                    (musical_hop.id, guns_n_petals.id, show_times[0]),
                    (park_square.id, matt_quevedo.id, show_times[1]),
                    (park_square.id, wild_sax.id, show_times[2]),
                    (park_square.id, wild_sax.id, show_times[3]),
                    (park_square.id, wild_sax.id, show_times[4]),
                ];
                for (venue_id, artist_id, start_time) in bookings {
                    entities::show::ActiveModel {
                        venue_id: Set(venue_id),
                        artist_id: Set(artist_id),
                        start_time: Set(start_time),
                        ..entities::show::ActiveModel::new()
                    }
                    .insert(txn)
                    .await?;
                }

                Ok(())
            })
        })
        .await
        .map_err(transaction_error)
        .wrap_err("Failed to insert demo data")?;

    log::info!("Seeded 3 venues, 3 artists and 5 shows");
    Ok(())
}
