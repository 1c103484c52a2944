//! Action repository (append-only activity log).

use std::sync::Arc;

use crate::entities::{Action, action};
use bookmarks_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Action repository for database operations.
///
/// Actions are append-only; this repository intentionally exposes no update
/// or delete operations.
#[derive(Clone)]
pub struct ActionRepository {
    db: Arc<DatabaseConnection>,
}

impl ActionRepository {
    /// Create a new action repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a new action.
    pub async fn create(&self, model: action::ActiveModel) -> AppResult<action::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch feed rows: actions excluding a viewer's own, optionally
    /// restricted to a set of authors, newest-first.
    pub async fn find_feed(
        &self,
        exclude_user_id: &str,
        author_ids: Option<&[String]>,
        limit: u64,
    ) -> AppResult<Vec<action::Model>> {
        let mut query = Action::find().filter(action::Column::UserId.ne(exclude_user_id));

        if let Some(ids) = author_ids {
            query = query.filter(action::Column::UserId.is_in(ids.iter().map(String::as_str)));
        }

        query
            .order_by_desc(action::Column::CreatedAt)
            .order_by_desc(action::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::action::TargetType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_action(id: &str, user_id: &str, verb: &str) -> action::Model {
        action::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            verb: verb.to_string(),
            target_type: None,
            target_id: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_feed_returns_rows() {
        let a1 = create_test_action("a2", "user2", "created an account");
        let a2 = create_test_action("a1", "user3", "is following");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[a1, a2]])
                .into_connection(),
        );

        let repo = ActionRepository::new(db);
        let result = repo.find_feed("user1", None, 10).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "a2");
    }

    #[tokio::test]
    async fn test_find_feed_with_author_filter() {
        let a1 = action::Model {
            id: "a1".to_string(),
            user_id: "user2".to_string(),
            verb: "likes".to_string(),
            target_type: Some(TargetType::Image),
            target_id: Some("img1".to_string()),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[a1]])
                .into_connection(),
        );

        let repo = ActionRepository::new(db);
        let authors = vec!["user2".to_string()];
        let result = repo.find_feed("user1", Some(&authors), 10).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].target_type, Some(TargetType::Image));
    }
}
