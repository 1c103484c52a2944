//! Action service (activity log and dashboard feed assembly).

use std::collections::HashMap;

use bookmarks_common::{AppResult, IdGenerator};
use bookmarks_db::{
    entities::{action, action::TargetType, image, user},
    repositories::{ActionRepository, ContactRepository, ImageRepository, UserRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// Verb recorded when an account is registered.
pub const VERB_CREATED_ACCOUNT: &str = "created an account";
/// Verb recorded when a user follows another user.
pub const VERB_IS_FOLLOWING: &str = "is following";
/// Verb recorded when a user bookmarks an image.
pub const VERB_BOOKMARKED_IMAGE: &str = "bookmarked image";
/// Verb recorded when a user likes an image.
pub const VERB_LIKES: &str = "likes";

/// Maximum number of entries in the dashboard feed.
const FEED_LIMIT: u64 = 10;

/// A fully resolved feed entry.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub id: String,
    pub actor: FeedActor,
    pub verb: String,
    pub target: Option<FeedTarget>,
    pub created_at: String,
}

/// The acting user of a feed entry.
#[derive(Debug, Clone, Serialize)]
pub struct FeedActor {
    pub id: String,
    pub username: String,
}

/// A resolved feed target.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FeedTarget {
    User { id: String, username: String },
    Image { id: String, title: String, slug: String },
}

/// Action service for business logic.
#[derive(Clone)]
pub struct ActionService {
    action_repo: ActionRepository,
    contact_repo: ContactRepository,
    user_repo: UserRepository,
    image_repo: ImageRepository,
    id_gen: IdGenerator,
}

impl ActionService {
    /// Create a new action service.
    #[must_use]
    pub const fn new(
        action_repo: ActionRepository,
        contact_repo: ContactRepository,
        user_repo: UserRepository,
        image_repo: ImageRepository,
    ) -> Self {
        Self {
            action_repo,
            contact_repo,
            user_repo,
            image_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append an action to the activity log.
    pub async fn record(
        &self,
        user_id: &str,
        verb: &str,
        target: Option<(TargetType, String)>,
    ) -> AppResult<action::Model> {
        let model = new_action(
            self.id_gen.generate(),
            user_id,
            verb,
            target,
            chrono::Utc::now(),
        );
        self.action_repo.create(model).await
    }

    /// Assemble the dashboard feed for a viewer.
    ///
    /// Excludes the viewer's own actions. When the viewer follows at least
    /// one user the feed is restricted to those users; otherwise it falls
    /// back to actions from everyone. Newest-first, at most 10 entries.
    ///
    /// Actors and targets are resolved in batches - one user query and one
    /// image query per feed build - so rendering never pays a per-row fetch.
    pub async fn dashboard_feed(&self, viewer_id: &str) -> AppResult<Vec<FeedItem>> {
        let following = self.contact_repo.following_ids(viewer_id).await?;
        let authors = if following.is_empty() {
            None
        } else {
            Some(following.as_slice())
        };

        let actions = self
            .action_repo
            .find_feed(viewer_id, authors, FEED_LIMIT)
            .await?;

        let users = self.resolve_users(&actions).await?;
        let images = self.resolve_images(&actions).await?;

        let mut items = Vec::with_capacity(actions.len());
        for act in actions {
            // An actor row can be gone only if the user was deleted outright;
            // such entries cannot be rendered.
            let Some(actor) = users.get(&act.user_id) else {
                continue;
            };

            let target = match (act.target_type, act.target_id.as_deref()) {
                (Some(TargetType::User), Some(id)) => {
                    users.get(id).map(|u| FeedTarget::User {
                        id: u.id.clone(),
                        username: u.username.clone(),
                    })
                }
                (Some(TargetType::Image), Some(id)) => {
                    images.get(id).map(|i| FeedTarget::Image {
                        id: i.id.clone(),
                        title: i.title.clone(),
                        slug: i.slug.clone(),
                    })
                }
                _ => None,
            };

            items.push(FeedItem {
                id: act.id,
                actor: FeedActor {
                    id: actor.id.clone(),
                    username: actor.username.clone(),
                },
                verb: act.verb,
                target,
                created_at: act.created_at.to_rfc3339(),
            });
        }

        Ok(items)
    }

    /// Batch-resolve every user a set of actions references (actors plus
    /// user targets).
    async fn resolve_users(
        &self,
        actions: &[action::Model],
    ) -> AppResult<HashMap<String, user::Model>> {
        let mut ids: Vec<String> = actions.iter().map(|a| a.user_id.clone()).collect();
        for act in actions {
            if act.target_type == Some(TargetType::User)
                && let Some(ref id) = act.target_id
            {
                ids.push(id.clone());
            }
        }
        ids.sort_unstable();
        ids.dedup();

        let users = self.user_repo.find_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }

    /// Batch-resolve every image a set of actions references.
    async fn resolve_images(
        &self,
        actions: &[action::Model],
    ) -> AppResult<HashMap<String, image::Model>> {
        let mut ids: Vec<String> = actions
            .iter()
            .filter(|a| a.target_type == Some(TargetType::Image))
            .filter_map(|a| a.target_id.clone())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let images = self.image_repo.find_by_ids(&ids).await?;
        Ok(images.into_iter().map(|i| (i.id.clone(), i)).collect())
    }
}

/// Build an activity-log row.
pub(crate) fn new_action(
    id: String,
    user_id: &str,
    verb: &str,
    target: Option<(TargetType, String)>,
    now: chrono::DateTime<chrono::Utc>,
) -> action::ActiveModel {
    let (target_type, target_id) = match target {
        Some((t, tid)) => (Some(t), Some(tid)),
        None => (None, None),
    };

    action::ActiveModel {
        id: Set(id),
        user_id: Set(user_id.to_string()),
        verb: Set(verb.to_string()),
        target_type: Set(target_type),
        target_id: Set(target_id),
        created_at: Set(now.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bookmarks_db::entities::contact;
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

    fn create_test_action(
        id: &str,
        user_id: &str,
        verb: &str,
        target: Option<(TargetType, &str)>,
    ) -> action::Model {
        let (target_type, target_id) = match target {
            Some((t, tid)) => (Some(t), Some(tid.to_string())),
            None => (None, None),
        };
        action::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            verb: verb.to_string(),
            target_type,
            target_id,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_service(db: Arc<sea_orm::DatabaseConnection>) -> ActionService {
        ActionService::new(
            ActionRepository::new(Arc::clone(&db)),
            ContactRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            ImageRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_record_appends_row() {
        let stored = create_test_action("a1", "user1", VERB_LIKES, Some((TargetType::Image, "img1")));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );
        let service = create_test_service(db);

        let action = service
            .record("user1", VERB_LIKES, Some((TargetType::Image, "img1".to_string())))
            .await
            .unwrap();

        assert_eq!(action.verb, VERB_LIKES);
        assert_eq!(action.target_type, Some(TargetType::Image));
    }

    #[tokio::test]
    async fn test_feed_discover_fallback_when_following_nobody() {
        let a1 = create_test_action("a2", "user2", VERB_CREATED_ACCOUNT, None);
        let a2 = create_test_action("a1", "user3", VERB_IS_FOLLOWING, Some((TargetType::User, "user2")));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // following_ids: viewer follows nobody
                .append_query_results([Vec::<contact::Model>::new()])
                // feed rows (newest-first, from anyone)
                .append_query_results([[a1, a2]])
                // batched user resolution (actors + user targets)
                .append_query_results([[
                    create_test_user("user2", "bob"),
                    create_test_user("user3", "carol"),
                ]])
                .into_connection(),
        );
        let service = create_test_service(db);

        let feed = service.dashboard_feed("user1").await.unwrap();

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].actor.username, "bob");
        assert_eq!(feed[0].verb, VERB_CREATED_ACCOUNT);
        assert!(feed[0].target.is_none());
        match feed[1].target {
            Some(FeedTarget::User { ref username, .. }) => assert_eq!(username, "bob"),
            _ => panic!("Expected a resolved user target"),
        }
    }

    #[tokio::test]
    async fn test_feed_resolves_image_targets_in_one_batch() {
        let a1 = create_test_action("a1", "user2", VERB_LIKES, Some((TargetType::Image, "img1")));
        let img = image::Model {
            id: "img1".to_string(),
            user_id: "user3".to_string(),
            title: "Sunset".to_string(),
            slug: "sunset".to_string(),
            url: "https://example.com/sunset.jpg".to_string(),
            description: None,
            total_likes: 3,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // viewer follows user2
                .append_query_results([[contact::Model {
                    id: "c1".to_string(),
                    user_from_id: "user1".to_string(),
                    user_to_id: "user2".to_string(),
                    created_at: Utc::now().into(),
                }]])
                // feed rows restricted to followed users
                .append_query_results([[a1]])
                // actor resolution
                .append_query_results([[create_test_user("user2", "bob")]])
                // image target resolution
                .append_query_results([[img]])
                .into_connection(),
        );
        let service = create_test_service(db);

        let feed = service.dashboard_feed("user1").await.unwrap();

        assert_eq!(feed.len(), 1);
        match feed[0].target {
            Some(FeedTarget::Image { ref slug, .. }) => assert_eq!(slug, "sunset"),
            _ => panic!("Expected a resolved image target"),
        }
    }

    #[tokio::test]
    async fn test_feed_skips_dangling_actor_keeps_dangling_target() {
        // Action whose image target no longer resolves still renders, with
        // target None; an action whose actor is gone is dropped.
        let a1 = create_test_action("a1", "user2", VERB_LIKES, Some((TargetType::Image, "gone")));
        let a2 = create_test_action("a2", "ghost", VERB_CREATED_ACCOUNT, None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<contact::Model>::new()])
                .append_query_results([[a1, a2]])
                // only user2 resolves
                .append_query_results([[create_test_user("user2", "bob")]])
                // the image target is dangling
                .append_query_results([Vec::<image::Model>::new()])
                .into_connection(),
        );
        let service = create_test_service(db);

        let feed = service.dashboard_feed("user1").await.unwrap();

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].actor.username, "bob");
        assert!(feed[0].target.is_none());
    }
}
