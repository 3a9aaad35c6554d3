use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vertiport::Table)
                    .if_not_exists()
                    .col(pk_auto(Vertiport::Id))
                    .col(string_len(Vertiport::Name, 100).not_null().unique_key())
                    .col(string_len(Vertiport::City, 100).not_null())
                    .col(double(Vertiport::Latitude).not_null())
                    .col(double(Vertiport::Longitude).not_null())
                    .col(double(Vertiport::ServiceRadiusKm).not_null())
                    .to_owned(),
            )
            .await?;

        // Seed the launch network
        let insert = Query::insert()
            .into_table(Vertiport::Table)
            .columns([
                Vertiport::Name,
                Vertiport::City,
                Vertiport::Latitude,
                Vertiport::Longitude,
                Vertiport::ServiceRadiusKm,
            ])
            .values_panic(["Raja Bhoj Airport".into(), "Bhopal".into(), (23.2875).into(), (77.3374).into(), (15.0).into()])
            .values_panic(["MP Nagar Skyport".into(), "Bhopal".into(), (23.2332).into(), (77.4343).into(), (8.0).into()])
            .values_panic(["Devi Ahilya Bai Holkar Airport".into(), "Indore".into(), (22.7218).into(), (75.8011).into(), (15.0).into()])
            .values_panic(["Mahakal Helipad".into(), "Ujjain".into(), (23.1828).into(), (75.7681).into(), (10.0).into()])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vertiport::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Vertiport {
    Table,
    Id,
    Name,
    City,
    Latitude,
    Longitude,
    ServiceRadiusKm,
}
