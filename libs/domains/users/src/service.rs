use std::sync::Arc;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new user
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i64) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// List all users
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    /// Apply a partial update to a user
    pub async fn update_user(&self, id: i64, input: UpdateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> UserResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(UserError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    fn alice() -> User {
        User {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_email_before_repository() {
        // No repository expectations: validation must fail first
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(mock_repo);

        let result = service
            .create_user(CreateUser {
                name: "Alice".to_string(),
                email: "nope".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(42))
            .returning(|_| Ok(None));

        let service = UserService::new(mock_repo);
        let result = service.get_user(42).await;

        assert!(matches!(result, Err(UserError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_get_user_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(alice())));

        let service = UserService::new(mock_repo);
        let user = service.get_user(1).await.unwrap();

        assert_eq!(user.name, "Alice");
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_delete().with(eq(9)).returning(|_| Ok(false));

        let service = UserService::new(mock_repo);
        let result = service.delete_user(9).await;

        assert!(matches!(result, Err(UserError::NotFound(9))));
    }
}
