//! Sea-ORM entities for the items and comments tables

use crate::models::{CommentRecord, Item, NewComment};

pub mod item {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "items")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub name: String,
        pub description: String,
        pub is_available: bool,
        pub owner_id: i64,
        pub request_id: Option<i64>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod comment {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "comments")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub text: String,
        pub item_id: i64,
        pub author_id: i64,
        pub created: DateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<item::Model> for Item {
    fn from(model: item::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            available: model.is_available,
            owner_id: model.owner_id,
            request_id: model.request_id,
        }
    }
}

impl From<comment::Model> for CommentRecord {
    fn from(model: comment::Model) -> Self {
        Self {
            id: model.id,
            text: model.text,
            item_id: model.item_id,
            author_id: model.author_id,
            created: model.created,
        }
    }
}

impl From<NewComment> for comment::ActiveModel {
    fn from(input: NewComment) -> Self {
        use sea_orm::ActiveValue::{NotSet, Set};

        Self {
            id: NotSet,
            text: Set(input.text),
            item_id: Set(input.item_id),
            author_id: Set(input.author_id),
            created: Set(input.created),
        }
    }
}
