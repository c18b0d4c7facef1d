pub use sea_orm_migration::prelude::*;

mod m20200401_000001_create_tables;
mod m20200403_145915_add_venue_website;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20200401_000001_create_tables::Migration),
            Box::new(m20200403_145915_add_venue_website::Migration),
        ]
    }
}
