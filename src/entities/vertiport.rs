use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::geo::GeoPoint;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vertiport")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub service_radius_km: f64,
}

impl Model {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bird::Entity")]
    Birds,
}

impl Related<super::bird::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Birds.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
