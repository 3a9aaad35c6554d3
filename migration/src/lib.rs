pub use sea_orm_migration::prelude::*;

mod m20251002_000001_create_vertiports;
mod m20251002_000002_create_birds;
mod m20251002_000003_create_bookings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251002_000001_create_vertiports::Migration),
            Box::new(m20251002_000002_create_birds::Migration),
            Box::new(m20251002_000003_create_bookings::Migration),
        ]
    }
}
