use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20251002_000002_create_birds::Bird;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(BookingStatus::Enum)
                    .values([BookingStatus::Confirmed, BookingStatus::Cancelled])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(string_len(Booking::Reference, 16).not_null().unique_key())
                    .col(string_len(Booking::PassengerName, 100).not_null())
                    .col(string_len(Booking::PassengerPhone, 16).not_null())
                    .col(uuid_null(Booking::BirdId))
                    .col(string_len(Booking::PickupName, 255).not_null())
                    .col(double(Booking::PickupLat).not_null())
                    .col(double(Booking::PickupLng).not_null())
                    .col(string_len(Booking::DropName, 255).not_null())
                    .col(double(Booking::DropLat).not_null())
                    .col(double(Booking::DropLng).not_null())
                    .col(json_binary(Booking::Stops).not_null())
                    .col(double(Booking::DistanceKm).not_null())
                    .col(integer(Booking::DurationMinutes).not_null())
                    .col(integer(Booking::Fare).not_null())
                    .col(timestamp_with_time_zone(Booking::DepartureTime).not_null())
                    .col(
                        ColumnDef::new(Booking::Status)
                            .custom(BookingStatus::Enum)
                            .not_null(),
                    )
                    .col(integer_null(Booking::RefundAmount))
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Booking::CancelledAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_bird")
                            .from(Booking::Table, Booking::BirdId)
                            .to(Bird::Table, Bird::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Bookings are looked up by passenger phone
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_passenger_phone")
                    .table(Booking::Table)
                    .col(Booking::PassengerPhone)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(BookingStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    Reference,
    PassengerName,
    PassengerPhone,
    BirdId,
    PickupName,
    PickupLat,
    PickupLng,
    DropName,
    DropLat,
    DropLng,
    Stops,
    DistanceKm,
    DurationMinutes,
    Fare,
    DepartureTime,
    Status,
    RefundAmount,
    CreatedAt,
    CancelledAt,
}

#[derive(DeriveIden)]
pub enum BookingStatus {
    #[sea_orm(iden = "booking_status")]
    Enum,
    #[sea_orm(iden = "confirmed")]
    Confirmed,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}
