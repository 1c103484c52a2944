//! Image service (bookmarking, like toggles, most-liked listing).

use bookmarks_common::{AppError, AppResult, IdGenerator};
use bookmarks_db::{
    entities::{action::TargetType, image, image_like},
    repositories::{ActionRepository, ImageRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::action::{VERB_BOOKMARKED_IMAGE, VERB_LIKES, new_action};

/// Fixed page size for the image list.
pub const PAGE_SIZE: u64 = 8;

/// Input for bookmarking an image.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateImageInput {
    pub url: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// One page of the image list.
#[derive(Debug, Clone)]
pub struct ImagePage {
    pub items: Vec<image::Model>,
    pub page: u64,
    pub total_pages: u64,
}

impl ImagePage {
    /// Whether a further page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Image service for business logic.
#[derive(Clone)]
pub struct ImageService {
    image_repo: ImageRepository,
    action_repo: ActionRepository,
    id_gen: IdGenerator,
}

impl ImageService {
    /// Create a new image service.
    #[must_use]
    pub const fn new(image_repo: ImageRepository, action_repo: ActionRepository) -> Self {
        Self {
            image_repo,
            action_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Bookmark a new image.
    ///
    /// Derives a unique slug from the title and records the
    /// "bookmarked image" action.
    pub async fn create(&self, user_id: &str, input: CreateImageInput) -> AppResult<image::Model> {
        input.validate()?;

        if url::Url::parse(&input.url).is_err() {
            return Err(AppError::Validation("Enter a valid image URL".to_string()));
        }

        let slug = self.unique_slug(&input.title).await?;
        let now = chrono::Utc::now();
        let id = self.id_gen.generate();

        let model = image::ActiveModel {
            id: Set(id.clone()),
            user_id: Set(user_id.to_string()),
            title: Set(input.title),
            slug: Set(slug),
            url: Set(input.url),
            description: Set(input.description),
            total_likes: Set(0),
            created_at: Set(now.into()),
        };

        let created = self.image_repo.create(model).await?;

        let action_model = new_action(
            self.id_gen.generate(),
            user_id,
            VERB_BOOKMARKED_IMAGE,
            Some((TargetType::Image, id)),
            now,
        );

        self.action_repo.create(action_model).await?;

        Ok(created)
    }

    /// Get an image by ID and slug pair.
    pub async fn get(&self, id: &str, slug: &str) -> AppResult<image::Model> {
        self.image_repo
            .find_by_id_and_slug(id, slug)
            .await?
            .ok_or_else(|| AppError::ImageNotFound(id.to_string()))
    }

    /// Like an image.
    ///
    /// Idempotent: liking an already-liked image is a no-op success. The
    /// "likes" action is recorded only when the state actually transitions.
    pub async fn like(&self, user_id: &str, image_id: &str) -> AppResult<()> {
        let image = self.image_repo.get_by_id(image_id).await?;

        if self.image_repo.has_liked(image_id, user_id).await? {
            return Ok(());
        }

        let now = chrono::Utc::now();

        let model = image_like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            image_id: Set(image.id.clone()),
            created_at: Set(now.into()),
        };

        self.image_repo.like(model).await?;

        let action_model = new_action(
            self.id_gen.generate(),
            user_id,
            VERB_LIKES,
            Some((TargetType::Image, image.id)),
            now,
        );

        self.action_repo.create(action_model).await?;

        Ok(())
    }

    /// Unlike an image.
    ///
    /// Idempotent: unliking a never-liked image is a no-op success. No
    /// action is recorded.
    pub async fn unlike(&self, user_id: &str, image_id: &str) -> AppResult<()> {
        // The image must exist
        self.image_repo.get_by_id(image_id).await?;

        self.image_repo.unlike(image_id, user_id).await
    }

    /// Check if a user has liked an image.
    pub async fn has_liked(&self, user_id: &str, image_id: &str) -> AppResult<bool> {
        self.image_repo.has_liked(image_id, user_id).await
    }

    /// List all images bookmarked by a user, newest-first.
    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<image::Model>> {
        self.image_repo.find_by_user_id(user_id).await
    }

    /// Fetch one page of the image list, most-liked-first.
    ///
    /// `page` is 1-based; values above the last page return an empty item
    /// set with `total_pages` intact so callers can clamp.
    pub async fn list_page(&self, page: u64) -> AppResult<ImagePage> {
        let page = page.max(1);
        let total = self.image_repo.count_all().await?;
        let total_pages = (total.div_ceil(PAGE_SIZE)).max(1);

        let offset = (page - 1) * PAGE_SIZE;
        let items = self.image_repo.find_page(PAGE_SIZE, offset).await?;

        Ok(ImagePage {
            items,
            page,
            total_pages,
        })
    }

    /// Derive a slug from the title, suffixing a counter on collision.
    async fn unique_slug(&self, title: &str) -> AppResult<String> {
        let base = slugify(title);

        if !self.image_repo.slug_exists(&base).await? {
            return Ok(base);
        }

        let mut n = 2u32;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.image_repo.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

/// Turn a title into a URL-safe slug: lowercase ASCII letters and digits,
/// hyphen-separated.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_hyphen = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "image".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn create_test_image(id: &str, user_id: &str, title: &str, slug: &str) -> image::Model {
        image::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
            url: "https://example.com/photo.jpg".to_string(),
            description: None,
            total_likes: 1,
            created_at: Utc::now().into(),
        }
    }

    fn count_result(n: i64) -> BTreeMap<&'static str, Value> {
        btreemap! { "num_items" => Value::BigInt(Some(n)) }
    }

    fn create_test_service(db: Arc<sea_orm::DatabaseConnection>) -> ImageService {
        ImageService::new(
            ImageRepository::new(Arc::clone(&db)),
            ActionRepository::new(db),
        )
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Sunset at the Beach"), "sunset-at-the-beach");
        assert_eq!(slugify("  Hello,  World!  "), "hello-world");
        assert_eq!(slugify("CamelCase42"), "camelcase42");
    }

    #[test]
    fn test_slugify_degenerate_title_falls_back() {
        assert_eq!(slugify("!!!"), "image");
        assert_eq!(slugify(""), "image");
    }

    #[tokio::test]
    async fn test_create_invalid_url_persists_nothing() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(db);

        let result = service
            .create(
                "u1",
                CreateImageInput {
                    url: "not a url".to_string(),
                    title: "Sunset".to_string(),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_empty_title_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(db);

        let result = service
            .create(
                "u1",
                CreateImageInput {
                    url: "https://example.com/photo.jpg".to_string(),
                    title: String::new(),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_like_twice_is_idempotent() {
        let image = create_test_image("img1", "u2", "Sunset", "sunset");

        // Image lookup, then the has-liked count; an insert afterwards would
        // exhaust the mock and fail the test.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image]])
                .append_query_results([[count_result(1)]])
                .into_connection(),
        );
        let service = create_test_service(db);

        let result = service.like("u1", "img1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_like_missing_image_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<image::Model>::new()])
                .into_connection(),
        );
        let service = create_test_service(db);

        let result = service.like("u1", "ghost").await;

        assert!(matches!(result, Err(AppError::ImageNotFound(_))));
    }

    #[tokio::test]
    async fn test_unlike_never_liked_is_noop_success() {
        let image = create_test_image("img1", "u2", "Sunset", "sunset");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image]])
                .append_exec_results([sea_orm::MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = create_test_service(db);

        let result = service.unlike("u1", "img1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_list_page_reports_total_pages() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // 17 images -> 3 pages of 8
                .append_query_results([[count_result(17)]])
                .append_query_results([vec![
                    create_test_image("i1", "u1", "A", "a"),
                    create_test_image("i2", "u1", "B", "b"),
                ]])
                .into_connection(),
        );
        let service = create_test_service(db);

        let page = service.list_page(3).await.unwrap();

        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn test_list_page_zero_is_clamped_to_one() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_result(0)]])
                .append_query_results([Vec::<image::Model>::new()])
                .into_connection(),
        );
        let service = create_test_service(db);

        let page = service.list_page(0).await.unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }
}
