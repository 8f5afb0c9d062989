use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::models::{BookingRecord, BookingStatus, NewBooking};

/// Sea-ORM entity for the bookings table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub start_date: DateTime,
    pub end_date: DateTime,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: BookingStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BookingRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            start: model.start_date,
            end: model.end_date,
            item_id: model.item_id,
            booker_id: model.booker_id,
            status: model.status,
        }
    }
}

impl From<NewBooking> for ActiveModel {
    fn from(input: NewBooking) -> Self {
        ActiveModel {
            id: NotSet,
            start_date: Set(input.start),
            end_date: Set(input.end),
            item_id: Set(input.item_id),
            booker_id: Set(input.booker_id),
            status: Set(input.status),
        }
    }
}
