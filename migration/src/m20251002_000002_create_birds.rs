use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};
use uuid::Uuid;

use super::m20251002_000001_create_vertiports::Vertiport;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(BirdStatus::Enum)
                    .values([BirdStatus::Available, BirdStatus::InFlight, BirdStatus::Maintenance])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bird::Table)
                    .if_not_exists()
                    .col(uuid(Bird::Id).primary_key())
                    .col(string_len(Bird::Registration, 20).not_null().unique_key())
                    .col(string_len(Bird::AircraftType, 100).not_null())
                    .col(integer(Bird::Seats).not_null())
                    .col(
                        ColumnDef::new(Bird::Status)
                            .custom(BirdStatus::Enum)
                            .not_null(),
                    )
                    .col(double(Bird::Latitude).not_null())
                    .col(double(Bird::Longitude).not_null())
                    .col(integer_null(Bird::VertiportId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bird_vertiport")
                            .from(Bird::Table, Bird::VertiportId)
                            .to(Vertiport::Table, Vertiport::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed the fleet across the Bhopal and Indore vertiports
        let fleet = [
            ("VT-SFA", "Shipra S4", 4, "available", 23.2875, 77.3374, 1),
            ("VT-SFB", "Shipra S4", 4, "available", 23.2332, 77.4343, 2),
            ("VT-SFC", "Shipra S2", 2, "available", 22.7218, 75.8011, 3),
            ("VT-SFD", "Shipra S4", 4, "maintenance", 22.7218, 75.8011, 3),
        ];

        let mut insert = Query::insert()
            .into_table(Bird::Table)
            .columns([
                Bird::Id,
                Bird::Registration,
                Bird::AircraftType,
                Bird::Seats,
                Bird::Status,
                Bird::Latitude,
                Bird::Longitude,
                Bird::VertiportId,
            ])
            .to_owned();

        for (registration, aircraft_type, seats, status, lat, lng, vertiport_id) in fleet {
            insert.values_panic([
                Uuid::new_v4().into(),
                registration.into(),
                aircraft_type.into(),
                seats.into(),
                Expr::val(status).as_enum(BirdStatus::Enum),
                lat.into(),
                lng.into(),
                vertiport_id.into(),
            ]);
        }

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bird::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(BirdStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Bird {
    Table,
    Id,
    Registration,
    AircraftType,
    Seats,
    Status,
    Latitude,
    Longitude,
    VertiportId,
}

#[derive(DeriveIden)]
pub enum BirdStatus {
    #[sea_orm(iden = "bird_status")]
    Enum,
    #[sea_orm(iden = "available")]
    Available,
    #[sea_orm(iden = "in_flight")]
    InFlight,
    #[sea_orm(iden = "maintenance")]
    Maintenance,
}
