use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "bird_status")]
#[serde(rename_all = "snake_case")]
pub enum BirdStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "in_flight")]
    InFlight,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

/// An eVTOL aircraft in the fleet
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bird")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub registration: String,
    pub aircraft_type: String,
    pub seats: i32,
    pub status: BirdStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub vertiport_id: Option<i32>,
}

impl Model {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vertiport::Entity",
        from = "Column::VertiportId",
        to = "super::vertiport::Column::Id"
    )]
    Vertiport,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::vertiport::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vertiport.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
