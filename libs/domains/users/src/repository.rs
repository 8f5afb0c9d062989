use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Register a new user
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: i64) -> UserResult<Option<User>>;

    /// List all users
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Apply a partial update to an existing user
    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<User>;

    /// Delete a user by ID
    async fn delete(&self, id: i64) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        let email_taken = users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&input.email));
        if email_taken {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            name: input.name,
            email: input.email,
        };
        users.insert(id, user.clone());

        tracing::info!(user_id = id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by_key(|u| u.id);
        Ok(result)
    }

    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&id) {
            return Err(UserError::NotFound(id));
        }

        if let Some(ref new_email) = input.email {
            let email_taken = users
                .values()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(new_email));
            if email_taken {
                return Err(UserError::DuplicateEmail(new_email.clone()));
            }
        }

        let user = users
            .get_mut(&id)
            .ok_or(UserError::NotFound(id))?;
        user.apply_update(input);
        let updated = user.clone();

        tracing::info!(user_id = id, "Updated user");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(name: &str, email: &str) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let user = repo
            .create(create_input("Alice", "alice@example.com"))
            .await
            .unwrap();
        assert_eq!(user.id, 1);

        let fetched = repo.get_by_id(user.id).await.unwrap();
        assert_eq!(fetched.unwrap().email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(create_input("Alice", "alice@example.com"))
            .await
            .unwrap();

        let result = repo
            .create(create_input("Other Alice", "Alice@Example.com"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_update_email_to_own_value_allowed() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .create(create_input("Alice", "alice@example.com"))
            .await
            .unwrap();

        let updated = repo
            .update(
                user.id,
                UpdateUser {
                    name: Some("Alice B".to_string()),
                    email: Some("alice@example.com".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Alice B");
    }

    #[tokio::test]
    async fn test_update_to_taken_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(create_input("Alice", "alice@example.com"))
            .await
            .unwrap();
        let bob = repo
            .create(create_input("Bob", "bob@example.com"))
            .await
            .unwrap();

        let result = repo
            .update(
                bob.id,
                UpdateUser {
                    name: None,
                    email: Some("alice@example.com".to_string()),
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .create(create_input("Alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());
        assert!(repo.get_by_id(user.id).await.unwrap().is_none());
    }
}
