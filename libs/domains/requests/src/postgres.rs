use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};

use crate::entity::{Column, Entity as Requests, Model};
use crate::error::{RequestError, RequestResult};
use crate::models::ItemRequest;
use crate::repository::{NewRequest, RequestRepository};

/// PostgreSQL implementation of RequestRepository using Sea-ORM
#[derive(Clone)]
pub struct PgRequestRepository {
    db: DatabaseConnection,
}

impl PgRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn internal(err: DbErr) -> RequestError {
    RequestError::Internal(err.to_string())
}

#[async_trait]
impl RequestRepository for PgRequestRepository {
    async fn create(&self, input: NewRequest) -> RequestResult<ItemRequest> {
        let active = Model::for_insert(input.description, input.requester_id, input.created);
        let model = active.insert(&self.db).await.map_err(internal)?;

        tracing::info!(request_id = model.id, requester_id = model.requester_id, "Created request");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> RequestResult<Option<ItemRequest>> {
        let model = Requests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(internal)?;
        Ok(model.map(ItemRequest::from))
    }

    async fn list_for_requester(&self, requester_id: i64) -> RequestResult<Vec<ItemRequest>> {
        let models = Requests::find()
            .filter(Column::RequesterId.eq(requester_id))
            .order_by_desc(Column::Created)
            .all(&self.db)
            .await
            .map_err(internal)?;
        Ok(models.into_iter().map(ItemRequest::from).collect())
    }

    async fn list_others(
        &self,
        requester_id: i64,
        offset: u64,
        limit: u64,
    ) -> RequestResult<Vec<ItemRequest>> {
        let models = Requests::find()
            .filter(Column::RequesterId.ne(requester_id))
            .order_by_desc(Column::Created)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(internal)?;
        Ok(models.into_iter().map(ItemRequest::from).collect())
    }
}
