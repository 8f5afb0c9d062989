use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, SqlErr,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{CreateUser, UpdateUser, User},
    repository::UserRepository,
};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Maps unique-constraint violations on the email column to DuplicateEmail
fn map_insert_error(err: sea_orm::DbErr, email: &str) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email.to_string()),
        _ => UserError::Internal(format!("Database error: {}", err)),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let email = input.email.clone();
        let active_model = entity::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            email: Set(input.email),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_insert_error(e, &email))?;

        tracing::info!(user_id = model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<User> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?
            .ok_or(UserError::NotFound(id))?;

        let mut user: User = model.into();
        user.apply_update(input);
        let email = user.email.clone();

        let active_model = entity::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
        };

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| map_insert_error(e, &email))?;

        tracing::info!(user_id = id, "Updated user");
        Ok(updated.into())
    }

    async fn delete(&self, id: i64) -> UserResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
