//! Contact repository (follow edges).

use std::sync::Arc;

use crate::entities::{Contact, contact};
use bookmarks_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Contact repository for database operations.
#[derive(Clone)]
pub struct ContactRepository {
    db: Arc<DatabaseConnection>,
}

impl ContactRepository {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow edge by follower and followee.
    pub async fn find_by_pair(
        &self,
        user_from_id: &str,
        user_to_id: &str,
    ) -> AppResult<Option<contact::Model>> {
        Contact::find()
            .filter(contact::Column::UserFromId.eq(user_from_id))
            .filter(contact::Column::UserToId.eq(user_to_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, user_from_id: &str, user_to_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_from_id, user_to_id).await?.is_some())
    }

    /// Create a new follow edge.
    pub async fn create(&self, model: contact::ActiveModel) -> AppResult<contact::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a follow edge by pair. Returns whether an edge was removed.
    pub async fn delete_by_pair(&self, user_from_id: &str, user_to_id: &str) -> AppResult<bool> {
        let deleted = Contact::delete_many()
            .filter(contact::Column::UserFromId.eq(user_from_id))
            .filter(contact::Column::UserToId.eq(user_to_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }

    /// Get the IDs of all users a user is following.
    pub async fn following_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let contacts = Contact::find()
            .filter(contact::Column::UserFromId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(contacts.into_iter().map(|c| c.user_to_id).collect())
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        Contact::find()
            .filter(contact::Column::UserToId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_contact(id: &str, user_from_id: &str, user_to_id: &str) -> contact::Model {
        contact::Model {
            id: id.to_string(),
            user_from_id: user_from_id.to_string(),
            user_to_id: user_to_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let edge = create_test_contact("c1", "user1", "user2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge.clone()]])
                .into_connection(),
        );

        let repo = ContactRepository::new(db);
        let result = repo.find_by_pair("user1", "user2").await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.user_from_id, "user1");
        assert_eq!(found.user_to_id, "user2");
    }

    #[tokio::test]
    async fn test_is_following_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<contact::Model>::new()])
                .into_connection(),
        );

        let repo = ContactRepository::new(db);
        let result = repo.is_following("user1", "user3").await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_delete_by_pair_absent_edge_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ContactRepository::new(db);
        let deleted = repo.delete_by_pair("user1", "user2").await.unwrap();

        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_following_ids() {
        let c1 = create_test_contact("c1", "user1", "user2");
        let c2 = create_test_contact("c2", "user1", "user3");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = ContactRepository::new(db);
        let ids = repo.following_ids("user1").await.unwrap();

        assert_eq!(ids, vec!["user2".to_string(), "user3".to_string()]);
    }
}
