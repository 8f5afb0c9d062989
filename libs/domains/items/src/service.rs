use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use crate::directory::{BookingAnnotator, UserDirectory, UserSummary};
use crate::error::{ItemError, ItemResult};
use crate::models::{
    Comment, CommentRecord, CreateComment, CreateItem, Item, ItemDetails, ItemPage, NewComment,
    UpdateItem,
};
use crate::repository::ItemRepository;

/// Service layer for items and their comments
pub struct ItemService<R, U, B> {
    repository: Arc<R>,
    users: Arc<U>,
    bookings: Arc<B>,
}

impl<R, U, B> Clone for ItemService<R, U, B> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            users: Arc::clone(&self.users),
            bookings: Arc::clone(&self.bookings),
        }
    }
}

impl<R, U, B> ItemService<R, U, B>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingAnnotator,
{
    pub fn new(repository: Arc<R>, users: Arc<U>, bookings: Arc<B>) -> Self {
        Self {
            repository,
            users,
            bookings,
        }
    }

    async fn require_user(&self, user_id: i64) -> ItemResult<UserSummary> {
        self.users
            .get(user_id)
            .await?
            .ok_or(ItemError::UserNotFound(user_id))
    }

    pub async fn create_item(&self, user_id: i64, input: CreateItem) -> ItemResult<Item> {
        self.require_user(user_id).await?;
        self.repository.create(user_id, input).await
    }

    /// Patch an item. Only its owner may change it.
    pub async fn update_item(
        &self,
        user_id: i64,
        item_id: i64,
        input: UpdateItem,
    ) -> ItemResult<Item> {
        self.require_user(user_id).await?;

        let item = self
            .repository
            .get_by_id(item_id)
            .await?
            .ok_or(ItemError::NotFound(item_id))?;
        if item.owner_id != user_id {
            return Err(ItemError::NotOwner {
                user: user_id,
                item: item_id,
            });
        }

        self.repository.update(item_id, input).await
    }

    /// Fetch one item with comments. Booking annotations are only shown to
    /// the item's owner.
    pub async fn get_item(&self, user_id: i64, item_id: i64) -> ItemResult<ItemDetails> {
        self.require_user(user_id).await?;

        let item = self
            .repository
            .get_by_id(item_id)
            .await?
            .ok_or(ItemError::NotFound(item_id))?;
        let is_owner = item.owner_id == user_id;

        let comments = self.repository.comments_for_item(item_id).await?;
        let mut details = ItemDetails::bare(item);
        details.comments = self.with_authors(comments).await?;

        if is_owner {
            let schedule = self
                .bookings
                .schedule(item_id, Utc::now().naive_utc())
                .await?;
            details.last_booking = schedule.last;
            details.next_booking = schedule.next;
        }

        Ok(details)
    }

    /// All items of the acting user, annotated with bookings and comments,
    /// ordered by ID
    pub async fn get_owner_items(
        &self,
        user_id: i64,
        page: ItemPage,
    ) -> ItemResult<Vec<ItemDetails>> {
        self.require_user(user_id).await?;
        let (offset, limit) = page.to_offset_limit()?;

        let items = self.repository.list_for_owner(user_id, offset, limit).await?;
        if items.is_empty() {
            return Ok(vec![]);
        }

        let item_ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        let mut schedules = self
            .bookings
            .schedules(item_ids.clone(), Utc::now().naive_utc())
            .await?;
        let mut comments = self.repository.comments_for_items(item_ids).await?;

        let mut result = Vec::with_capacity(items.len());
        for item in items {
            let id = item.id;
            let mut details = ItemDetails::bare(item);
            if let Some(schedule) = schedules.remove(&id) {
                details.last_booking = schedule.last;
                details.next_booking = schedule.next;
            }
            details.comments = self
                .with_authors(comments.remove(&id).unwrap_or_default())
                .await?;
            result.push(details);
        }

        Ok(result)
    }

    /// Text search over available items. Blank text yields nothing.
    pub async fn search_items(&self, text: &str, page: ItemPage) -> ItemResult<Vec<Item>> {
        let (offset, limit) = page.to_offset_limit()?;
        if text.trim().is_empty() {
            return Ok(vec![]);
        }

        self.repository.search(text.to_string(), offset, limit).await
    }

    /// Post a comment on an item. Only users who completed an approved
    /// booking of the item may comment.
    pub async fn add_comment(
        &self,
        user_id: i64,
        item_id: i64,
        input: CreateComment,
    ) -> ItemResult<Comment> {
        let author = self.require_user(user_id).await?;
        self.repository
            .get_by_id(item_id)
            .await?
            .ok_or(ItemError::NotFound(item_id))?;

        let now = Utc::now().naive_utc();
        if !self
            .bookings
            .has_finished_booking(item_id, user_id, now)
            .await?
        {
            return Err(ItemError::NoCompletedBooking {
                user: user_id,
                item: item_id,
            });
        }

        let record = self
            .repository
            .add_comment(NewComment {
                text: input.text,
                item_id,
                author_id: user_id,
                created: now,
            })
            .await?;

        Ok(Comment {
            id: record.id,
            text: record.text,
            author_name: author.name,
            created: record.created,
        })
    }

    async fn with_authors(&self, records: Vec<CommentRecord>) -> ItemResult<Vec<Comment>> {
        if records.is_empty() {
            return Ok(vec![]);
        }

        let mut author_ids: Vec<i64> = records.iter().map(|c| c.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<i64, String> = self
            .users
            .get_many(author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        records
            .into_iter()
            .map(|record| {
                let author_name = authors.get(&record.author_id).cloned().ok_or_else(|| {
                    ItemError::Internal(format!(
                        "User {} referenced by comment {} is missing",
                        record.author_id, record.id
                    ))
                })?;
                Ok(Comment {
                    id: record.id,
                    text: record.text,
                    author_name,
                    created: record.created,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{
        BookingRef, MockBookingAnnotator, MockUserDirectory, ScheduleView,
    };
    use crate::repository::MockItemRepository;
    use mockall::predicate::eq;

    fn user(id: i64) -> UserSummary {
        UserSummary {
            id,
            name: format!("user-{}", id),
        }
    }

    fn item(id: i64, owner_id: i64) -> Item {
        Item {
            id,
            name: format!("item-{}", id),
            description: "something useful".to_string(),
            available: true,
            owner_id,
            request_id: None,
        }
    }

    fn service(
        repo: MockItemRepository,
        users: MockUserDirectory,
        bookings: MockBookingAnnotator,
    ) -> ItemService<MockItemRepository, MockUserDirectory, MockBookingAnnotator> {
        ItemService::new(Arc::new(repo), Arc::new(users), Arc::new(bookings))
    }

    fn known_users() -> MockUserDirectory {
        let mut users = MockUserDirectory::new();
        users.expect_get().returning(|id| Ok(Some(user(id))));
        users
            .expect_get_many()
            .returning(|ids| Ok(ids.into_iter().map(user).collect()));
        users
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let mut repo = MockItemRepository::new();
        repo.expect_get_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(item(id, 1))));

        let err = service(repo, known_users(), MockBookingAnnotator::new())
            .update_item(2, 3, UpdateItem::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ItemError::NotOwner { user: 2, item: 3 }));
    }

    #[tokio::test]
    async fn test_get_item_annotates_only_for_owner() {
        let schedule = ScheduleView {
            last: Some(BookingRef { id: 7, booker_id: 2 }),
            next: None,
        };

        let mut repo = MockItemRepository::new();
        repo.expect_get_by_id().returning(|id| Ok(Some(item(id, 1))));
        repo.expect_comments_for_item().returning(|_| Ok(vec![]));

        let mut bookings = MockBookingAnnotator::new();
        bookings.expect_schedule().returning(move |_, _| Ok(schedule));

        let svc = service(repo, known_users(), bookings);

        let as_owner = svc.get_item(1, 3).await.unwrap();
        assert_eq!(as_owner.last_booking, Some(BookingRef { id: 7, booker_id: 2 }));

        let as_visitor = svc.get_item(2, 3).await.unwrap();
        assert_eq!(as_visitor.last_booking, None);
        assert_eq!(as_visitor.next_booking, None);
    }

    #[tokio::test]
    async fn test_search_blank_text_yields_nothing() {
        // The repository must not be queried for a blank search
        let svc = service(
            MockItemRepository::new(),
            known_users(),
            MockBookingAnnotator::new(),
        );

        let found = svc.search_items("   ", ItemPage::default()).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_comment_requires_finished_booking() {
        let mut repo = MockItemRepository::new();
        repo.expect_get_by_id().returning(|id| Ok(Some(item(id, 1))));

        let mut bookings = MockBookingAnnotator::new();
        bookings
            .expect_has_finished_booking()
            .returning(|_, _, _| Ok(false));

        let err = service(repo, known_users(), bookings)
            .add_comment(
                2,
                3,
                CreateComment {
                    text: "great".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ItemError::NoCompletedBooking { user: 2, item: 3 }));
    }

    #[tokio::test]
    async fn test_comment_carries_author_name() {
        let mut repo = MockItemRepository::new();
        repo.expect_get_by_id().returning(|id| Ok(Some(item(id, 1))));
        repo.expect_add_comment().returning(|input| {
            Ok(CommentRecord {
                id: 1,
                text: input.text,
                item_id: input.item_id,
                author_id: input.author_id,
                created: input.created,
            })
        });

        let mut bookings = MockBookingAnnotator::new();
        bookings
            .expect_has_finished_booking()
            .returning(|_, _, _| Ok(true));

        let comment = service(repo, known_users(), bookings)
            .add_comment(
                2,
                3,
                CreateComment {
                    text: "great".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(comment.author_name, "user-2");
        assert_eq!(comment.text, "great");
    }
}
