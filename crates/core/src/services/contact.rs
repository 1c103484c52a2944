//! Contact service (follow/unfollow toggles over the social graph).

use bookmarks_common::{AppError, AppResult, IdGenerator};
use bookmarks_db::{
    entities::{action::TargetType, contact},
    repositories::{ActionRepository, ContactRepository, UserRepository},
};
use sea_orm::Set;

use super::action::{VERB_IS_FOLLOWING, new_action};

/// Contact service for business logic.
#[derive(Clone)]
pub struct ContactService {
    contact_repo: ContactRepository,
    user_repo: UserRepository,
    action_repo: ActionRepository,
    id_gen: IdGenerator,
}

impl ContactService {
    /// Create a new contact service.
    #[must_use]
    pub const fn new(
        contact_repo: ContactRepository,
        user_repo: UserRepository,
        action_repo: ActionRepository,
    ) -> Self {
        Self {
            contact_repo,
            user_repo,
            action_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user.
    ///
    /// Get-or-create semantics: following someone already followed is a
    /// no-op success. The "is following" action is recorded only when the
    /// edge is newly created.
    pub async fn follow(&self, user_from_id: &str, user_to_id: &str) -> AppResult<()> {
        // Can't follow yourself
        if user_from_id == user_to_id {
            return Err(AppError::Validation("Cannot follow yourself".to_string()));
        }

        // The target must exist
        let target = self.user_repo.get_by_id(user_to_id).await?;

        // Already following: nothing to do
        if self
            .contact_repo
            .is_following(user_from_id, user_to_id)
            .await?
        {
            return Ok(());
        }

        let now = chrono::Utc::now();

        let model = contact::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_from_id: Set(user_from_id.to_string()),
            user_to_id: Set(target.id.clone()),
            created_at: Set(now.into()),
        };

        self.contact_repo.create(model).await?;

        let action_model = new_action(
            self.id_gen.generate(),
            user_from_id,
            VERB_IS_FOLLOWING,
            Some((TargetType::User, target.id)),
            now,
        );

        self.action_repo.create(action_model).await?;

        Ok(())
    }

    /// Unfollow a user.
    ///
    /// Deleting an absent edge is a no-op success. Unfollows are not
    /// recorded in the activity log.
    pub async fn unfollow(&self, user_from_id: &str, user_to_id: &str) -> AppResult<()> {
        // The target must exist
        self.user_repo.get_by_id(user_to_id).await?;

        let removed = self
            .contact_repo
            .delete_by_pair(user_from_id, user_to_id)
            .await?;

        if !removed {
            tracing::debug!(
                user_from_id = %user_from_id,
                user_to_id = %user_to_id,
                "Unfollow of an absent edge"
            );
        }

        Ok(())
    }

    /// Check if a user is following another.
    pub async fn is_following(&self, user_from_id: &str, user_to_id: &str) -> AppResult<bool> {
        self.contact_repo
            .is_following(user_from_id, user_to_id)
            .await
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        self.contact_repo.count_followers(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bookmarks_db::entities::user;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            first_name: None,
            last_name: None,
            email: None,
            token: None,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_contact(id: &str, user_from_id: &str, user_to_id: &str) -> contact::Model {
        contact::Model {
            id: id.to_string(),
            user_from_id: user_from_id.to_string(),
            user_to_id: user_to_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_service(db: Arc<sea_orm::DatabaseConnection>) -> ContactService {
        ContactService::new(
            ContactRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            ActionRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_follow_yourself_returns_error() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(db);

        let result = service.follow("user1", "user1").await;

        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("yourself")),
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_follow_missing_user_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = create_test_service(db);

        let result = service.follow("user1", "ghost").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_follow_twice_is_idempotent() {
        let target = create_test_user("user2", "bob");
        let edge = create_test_contact("c1", "user1", "user2");

        // Only two queries expected: the target lookup and the edge lookup.
        // A second insert would exhaust the mock and fail the test.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[target]])
                .append_query_results([[edge]])
                .into_connection(),
        );
        let service = create_test_service(db);

        let result = service.follow("user1", "user2").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unfollow_never_followed_is_noop_success() {
        let target = create_test_user("user2", "bob");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[target]])
                .append_exec_results([sea_orm::MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = create_test_service(db);

        let result = service.unfollow("user1", "user2").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unfollow_missing_user_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = create_test_service(db);

        let result = service.unfollow("user1", "ghost").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }
}
