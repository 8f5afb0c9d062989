use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{ActiveValue::Set, Condition, QueryOrder, QuerySelect};
use std::collections::HashMap;

use crate::entity::{comment, item};
use crate::error::{ItemError, ItemResult};
use crate::models::{CommentRecord, CreateItem, Item, NewComment, UpdateItem};
use crate::repository::ItemRepository;

/// PostgreSQL implementation of ItemRepository using Sea-ORM
#[derive(Clone)]
pub struct PgItemRepository {
    db: DatabaseConnection,
}

impl PgItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn internal(err: DbErr) -> ItemError {
    ItemError::Internal(err.to_string())
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn create(&self, owner_id: i64, input: CreateItem) -> ItemResult<Item> {
        let active = item::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            is_available: Set(input.available),
            owner_id: Set(owner_id),
            request_id: Set(input.request_id),
            ..Default::default()
        };

        let model = active.insert(&self.db).await.map_err(internal)?;
        tracing::info!(item_id = model.id, owner_id, "Created item");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> ItemResult<Option<Item>> {
        let model = item::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(internal)?;
        Ok(model.map(Item::from))
    }

    async fn get_many(&self, ids: Vec<i64>) -> ItemResult<Vec<Item>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let models = item::Entity::find()
            .filter(item::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(internal)?;
        Ok(models.into_iter().map(Item::from).collect())
    }

    async fn list_for_owner(
        &self,
        owner_id: i64,
        offset: u64,
        limit: u64,
    ) -> ItemResult<Vec<Item>> {
        let models = item::Entity::find()
            .filter(item::Column::OwnerId.eq(owner_id))
            .order_by_asc(item::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(internal)?;
        Ok(models.into_iter().map(Item::from).collect())
    }

    async fn ids_for_owner(&self, owner_id: i64) -> ItemResult<Vec<i64>> {
        let models = item::Entity::find()
            .filter(item::Column::OwnerId.eq(owner_id))
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await
            .map_err(internal)?;
        Ok(models.into_iter().map(|m| m.id).collect())
    }

    async fn list_for_requests(&self, request_ids: Vec<i64>) -> ItemResult<Vec<Item>> {
        if request_ids.is_empty() {
            return Ok(vec![]);
        }

        let models = item::Entity::find()
            .filter(item::Column::RequestId.is_in(request_ids))
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await
            .map_err(internal)?;
        Ok(models.into_iter().map(Item::from).collect())
    }

    async fn update(&self, id: i64, input: UpdateItem) -> ItemResult<Item> {
        let model = item::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(internal)?
            .ok_or(ItemError::NotFound(id))?;

        let mut active: item::ActiveModel = model.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(available) = input.available {
            active.is_available = Set(available);
        }

        let updated = active.update(&self.db).await.map_err(internal)?;
        tracing::info!(item_id = id, "Updated item");
        Ok(updated.into())
    }

    async fn search(&self, text: String, offset: u64, limit: u64) -> ItemResult<Vec<Item>> {
        let pattern = format!("%{}%", text.to_lowercase());
        let matches = Condition::any()
            .add(Expr::expr(Func::lower(Expr::col(item::Column::Name))).like(&pattern))
            .add(Expr::expr(Func::lower(Expr::col(item::Column::Description))).like(&pattern));

        let models = item::Entity::find()
            .filter(item::Column::IsAvailable.eq(true))
            .filter(matches)
            .order_by_asc(item::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(internal)?;
        Ok(models.into_iter().map(Item::from).collect())
    }

    async fn add_comment(&self, input: NewComment) -> ItemResult<CommentRecord> {
        let active: comment::ActiveModel = input.into();
        let model = active.insert(&self.db).await.map_err(internal)?;

        tracing::info!(comment_id = model.id, item_id = model.item_id, "Created comment");
        Ok(model.into())
    }

    async fn comments_for_item(&self, item_id: i64) -> ItemResult<Vec<CommentRecord>> {
        let models = comment::Entity::find()
            .filter(comment::Column::ItemId.eq(item_id))
            .order_by_asc(comment::Column::Created)
            .all(&self.db)
            .await
            .map_err(internal)?;
        Ok(models.into_iter().map(CommentRecord::from).collect())
    }

    async fn comments_for_items(
        &self,
        item_ids: Vec<i64>,
    ) -> ItemResult<HashMap<i64, Vec<CommentRecord>>> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let models = comment::Entity::find()
            .filter(comment::Column::ItemId.is_in(item_ids))
            .order_by_asc(comment::Column::Created)
            .all(&self.db)
            .await
            .map_err(internal)?;

        let mut grouped: HashMap<i64, Vec<CommentRecord>> = HashMap::new();
        for model in models {
            grouped.entry(model.item_id).or_default().push(model.into());
        }
        Ok(grouped)
    }
}
