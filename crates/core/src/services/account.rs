//! Account service (registration, profile editing, authentication).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use bookmarks_common::{AppError, AppResult, IdGenerator};
use bookmarks_db::{
    entities::{user, user_profile},
    repositories::{ActionRepository, UserProfileRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::{Validate, ValidateEmail};

use super::action::{VERB_CREATED_ACCOUNT, new_action};

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    profile_repo: UserProfileRepository,
    action_repo: ActionRepository,
    id_gen: IdGenerator,
}

/// Input for registering a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub password_confirm: String,
}

/// Input for editing a profile.
///
/// Spans both the user row (name, email) and the profile row (date of birth,
/// photo); validation is all-or-nothing across the two.
#[derive(Debug, Default, Deserialize)]
pub struct EditProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
    pub photo_url: Option<String>,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        profile_repo: UserProfileRepository,
        action_repo: ActionRepository,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            action_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account.
    ///
    /// Creates the user row, then the profile row, then records the
    /// "created an account" action. Nothing persists on validation failure.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        input.validate()?;

        if !input
            .username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'))
        {
            return Err(AppError::Validation(
                "Username may only contain letters, digits and @/./+/-/_".to_string(),
            ));
        }

        if input.password != input.password_confirm {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        // Check if username is taken (case-insensitive)
        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Validation("Username already taken".to_string()));
        }

        // Hash password
        let password_hash = hash_password(&input.password)?;

        // Generate token and user ID
        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();
        let now = chrono::Utc::now();

        // Create user
        let user_model = user::ActiveModel {
            id: Set(user_id.clone()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            token: Set(Some(token)),
            is_active: Set(true),
            created_at: Set(now.into()),
            ..Default::default()
        };

        let user = self.user_repo.create(user_model).await?;

        // Create user profile with password hash
        let profile_model = user_profile::ActiveModel {
            user_id: Set(user_id.clone()),
            password: Set(Some(password_hash)),
            created_at: Set(now.into()),
            ..Default::default()
        };

        self.profile_repo.create(profile_model).await?;

        // Record the registration in the activity log
        let action_model = new_action(
            self.id_gen.generate(),
            &user_id,
            VERB_CREATED_ACCOUNT,
            None,
            now,
        );

        self.action_repo.create(action_model).await?;

        Ok(user)
    }

    /// Edit a user's profile.
    ///
    /// Every field across both sub-entities is validated first; any failure
    /// reports all errors together and persists nothing.
    pub async fn edit_profile(
        &self,
        user_id: &str,
        input: EditProfileInput,
    ) -> AppResult<(user::Model, user_profile::Model)> {
        let mut errors = Vec::new();

        if let Some(ref first_name) = input.first_name
            && first_name.len() > 150
        {
            errors.push("First name must be at most 150 characters".to_string());
        }
        if let Some(ref last_name) = input.last_name
            && last_name.len() > 150
        {
            errors.push("Last name must be at most 150 characters".to_string());
        }
        if let Some(ref email) = input.email
            && !email.validate_email()
        {
            errors.push("Enter a valid email address".to_string());
        }
        if let Some(ref date_of_birth) = input.date_of_birth
            && chrono::NaiveDate::parse_from_str(date_of_birth, "%Y-%m-%d").is_err()
        {
            errors.push("Date of birth must be in YYYY-MM-DD format".to_string());
        }
        if let Some(ref photo_url) = input.photo_url
            && url::Url::parse(photo_url).is_err()
        {
            errors.push("Enter a valid photo URL".to_string());
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors.join("; ")));
        }

        let user = self.user_repo.get_by_id(user_id).await?;
        let profile = self.profile_repo.get_by_user_id(user_id).await?;
        let now = chrono::Utc::now();

        let mut user_active: user::ActiveModel = user.into();
        if let Some(first_name) = input.first_name {
            user_active.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = input.last_name {
            user_active.last_name = Set(Some(last_name));
        }
        if let Some(email) = input.email {
            user_active.email = Set(Some(email));
        }
        user_active.updated_at = Set(Some(now.into()));

        let mut profile_active: user_profile::ActiveModel = profile.into();
        if let Some(date_of_birth) = input.date_of_birth {
            profile_active.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(photo_url) = input.photo_url {
            profile_active.photo_url = Set(Some(photo_url));
        }
        profile_active.updated_at = Set(Some(now.into()));

        let user = self.user_repo.update(user_active).await?;
        let profile = self.profile_repo.update(profile_active).await?;

        Ok((user, profile))
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Get an active user by username.
    pub async fn get_active_by_username(&self, username: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;

        if !user.is_active {
            return Err(AppError::UserNotFound(username.to_string()));
        }

        Ok(user)
    }

    /// Get a user's profile.
    pub async fn profile(&self, user_id: &str) -> AppResult<user_profile::Model> {
        self.profile_repo.get_by_user_id(user_id).await
    }

    /// List active users.
    pub async fn list_users(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_active().await
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Authenticate a user by username and password.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        // Get user profile to check password
        let profile = self
            .profile_repo
            .find_by_user_id(&user.id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // Verify password
        let password_hash = profile.password.ok_or(AppError::Unauthorized)?;
        if !verify_password(password, &password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Deactivate an account (removes it from listings, never deletes).
    pub async fn deactivate(&self, user_id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();
        active.is_active = Set(false);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
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
            token: Some("test_token".to_string()),
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_service(db: Arc<sea_orm::DatabaseConnection>) -> AccountService {
        AccountService::new(
            UserRepository::new(Arc::clone(&db)),
            UserProfileRepository::new(Arc::clone(&db)),
            ActionRepository::new(db),
        )
    }

    // Unit tests for password functions
    #[test]
    fn test_hash_password() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hash.len() > 50);
    }

    #[test]
    fn test_verify_password_roundtrip() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_mismatched_passwords_creates_nothing() {
        // No query results appended: any persistence attempt would fail the mock.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(db);

        let result = service
            .register(RegisterInput {
                username: "alice".to_string(),
                password: "password123".to_string(),
                password_confirm: "password456".to_string(),
            })
            .await;

        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("do not match")),
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_username_returns_error() {
        let existing = create_test_user("u1", "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let service = create_test_service(db);

        let result = service
            .register(RegisterInput {
                username: "Alice".to_string(),
                password: "password123".to_string(),
                password_confirm: "password123".to_string(),
            })
            .await;

        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("already taken")),
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_register_short_password_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(db);

        let result = service
            .register(RegisterInput {
                username: "alice".to_string(),
                password: "short".to_string(),
                password_confirm: "short".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_bad_username_charset_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(db);

        let result = service
            .register(RegisterInput {
                username: "al ice!".to_string(),
                password: "password123".to_string(),
                password_confirm: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_edit_profile_invalid_fields_reported_together() {
        // Validation fails before any query is issued.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(db);

        let result = service
            .edit_profile(
                "u1",
                EditProfileInput {
                    email: Some("not-an-email".to_string()),
                    date_of_birth: Some("31/12/1990".to_string()),
                    ..Default::default()
                },
            )
            .await;

        match result {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("email"));
                assert!(msg.contains("YYYY-MM-DD"));
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_get_active_by_username_inactive_is_not_found() {
        let mut user = create_test_user("u1", "alice");
        user.is_active = false;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let service = create_test_service(db);

        let result = service.get_active_by_username("alice").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }
}
