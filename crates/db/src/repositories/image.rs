//! Image repository.

use std::sync::Arc;

use crate::entities::{Image, ImageLike, image, image_like};
use bookmarks_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Image repository for database operations.
#[derive(Clone)]
pub struct ImageRepository {
    db: Arc<DatabaseConnection>,
}

impl ImageRepository {
    /// Create a new image repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Image Operations ====================

    /// Find an image by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<image::Model>> {
        Image::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an image by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<image::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ImageNotFound(id.to_string()))
    }

    /// Find an image by ID and slug pair.
    pub async fn find_by_id_and_slug(
        &self,
        id: &str,
        slug: &str,
    ) -> AppResult<Option<image::Model>> {
        Image::find()
            .filter(image::Column::Id.eq(id))
            .filter(image::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a slug is already taken.
    pub async fn slug_exists(&self, slug: &str) -> AppResult<bool> {
        let count = Image::find()
            .filter(image::Column::Slug.eq(slug))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Find images by IDs (batch lookup).
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<image::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Image::find()
            .filter(image::Column::Id.is_in(ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all images bookmarked by a user, newest-first.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<image::Model>> {
        Image::find()
            .filter(image::Column::UserId.eq(user_id))
            .order_by_desc(image::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find one page of images, most-liked-first (ID as tie-break so
    /// pagination stays stable).
    pub async fn find_page(&self, limit: u64, offset: u64) -> AppResult<Vec<image::Model>> {
        Image::find()
            .order_by_desc(image::Column::TotalLikes)
            .order_by_desc(image::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all images.
    pub async fn count_all(&self) -> AppResult<u64> {
        Image::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new image.
    pub async fn create(&self, model: image::ActiveModel) -> AppResult<image::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Like Operations ====================

    /// Check if a user has liked an image.
    pub async fn has_liked(&self, image_id: &str, user_id: &str) -> AppResult<bool> {
        let count = ImageLike::find()
            .filter(image_like::Column::ImageId.eq(image_id))
            .filter(image_like::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Like an image.
    pub async fn like(&self, model: image_like::ActiveModel) -> AppResult<image_like::Model> {
        let like = model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Update total likes
        let image_id = &like.image_id;
        let image = self.get_by_id(image_id).await?;
        let mut active: image::ActiveModel = image.into();
        active.total_likes = Set(active.total_likes.unwrap() + 1);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(like)
    }

    /// Unlike an image.
    pub async fn unlike(&self, image_id: &str, user_id: &str) -> AppResult<()> {
        let deleted = ImageLike::delete_many()
            .filter(image_like::Column::ImageId.eq(image_id))
            .filter(image_like::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if deleted.rows_affected > 0 {
            // Update total likes
            let image = self.get_by_id(image_id).await?;
            let mut active: image::ActiveModel = image.into();
            let current_count = active.total_likes.clone().unwrap();
            active.total_likes = Set(if current_count > 0 { current_count - 1 } else { 0 });
            active
                .update(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        Ok(())
    }
}
