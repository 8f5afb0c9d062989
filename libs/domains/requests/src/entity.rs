use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::ItemRequest;

/// Sea-ORM entity for the requests table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub description: String,
    pub requester_id: i64,
    pub created: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ItemRequest {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            requester_id: model.requester_id,
            created: model.created,
        }
    }
}

impl Model {
    pub fn for_insert(
        description: String,
        requester_id: i64,
        created: DateTime,
    ) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            description: Set(description),
            requester_id: Set(requester_id),
            created: Set(created),
        }
    }
}
