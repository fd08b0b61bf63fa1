//! Account service: registration, sessions, and profiles.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use atelier_common::{id::IdGenerator, AppError, AppResult};
use atelier_db::entities::{user, user_profile};
use atelier_db::repositories::{ArtworkRepository, UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::media::MediaService;

/// Input for registering an account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 3, max = 30))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Input for logging in.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Input for updating a profile.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileInput {
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

/// A user as returned to clients.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            is_staff: u.is_staff,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Session token plus the authenticated user.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Public profile view.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub avatar: Option<String>,
    pub artworks_count: u64,
    pub created_at: String,
}

/// Service managing accounts and sessions.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    artwork_repo: ArtworkRepository,
    media: MediaService,
    id_gen: IdGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        artwork_repo: ArtworkRepository,
        media: MediaService,
    ) -> Self {
        Self {
            user_repo,
            artwork_repo,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account and open a session.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthResponse> {
        input.validate()?;
        validate_username_charset(&input.username)?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }
        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let token = self.id_gen.generate_token();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            email: Set(input.email),
            password_hash: Set(password_hash),
            token: Set(Some(token.clone())),
            is_staff: Set(false),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.user_repo.create(model).await?;
        Ok(AuthResponse {
            token,
            user: created.into(),
        })
    }

    /// Log in with username and password, rotating the session token.
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        let Some(user) = self.user_repo.find_by_username(&input.username).await? else {
            return Err(AppError::Unauthorized);
        };

        if !verify_password(&input.password, &user.password_hash) {
            return Err(AppError::Unauthorized);
        }
        if !user.is_active {
            return Err(AppError::Forbidden("Account is disabled".to_string()));
        }

        let token = self.id_gen.generate_token();
        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(token.clone()));
        let updated = self.user_repo.update(active).await?;

        Ok(AuthResponse {
            token,
            user: updated.into(),
        })
    }

    /// Close the user's session.
    pub async fn logout(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();
        active.token = Set(None);
        self.user_repo.update(active).await?;
        Ok(())
    }

    /// Resolve a session token to its active user.
    pub async fn authenticate(&self, token: &str) -> AppResult<Option<user::Model>> {
        Ok(self
            .user_repo
            .find_by_token(token)
            .await?
            .filter(|u| u.is_active))
    }

    /// Public profile for a username.
    pub async fn profile(&self, username: &str) -> AppResult<ProfileResponse> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User: {username}")))?;

        let profile = self.user_repo.find_profile(&user.id).await?;
        let artworks_count = self.artwork_repo.count_by_user_id(&user.id).await?;

        let (bio, location, website, avatar_key) = match profile {
            Some(p) => (p.bio, p.location, p.website, p.avatar_key),
            None => (None, None, None, None),
        };

        Ok(ProfileResponse {
            id: user.id,
            username: user.username,
            bio,
            location,
            website,
            avatar: avatar_key.map(|k| self.media.public_url(&k)),
            artworks_count,
            created_at: user.created_at.to_rfc3339(),
        })
    }

    /// Update the caller's profile fields.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<ProfileResponse> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if let Some(bio) = input.bio.as_deref()
            && bio.len() > 1000
        {
            return Err(AppError::Validation(
                "Bio must be at most 1000 characters".to_string(),
            ));
        }

        match self.user_repo.find_profile(user_id).await? {
            Some(existing) => {
                let mut active: user_profile::ActiveModel = existing.into();
                if let Some(bio) = input.bio {
                    active.bio = Set(Some(bio));
                }
                if let Some(location) = input.location {
                    active.location = Set(Some(location));
                }
                if let Some(website) = input.website {
                    active.website = Set(Some(website));
                }
                self.user_repo.update_profile(active).await?;
            }
            None => {
                self.user_repo
                    .create_profile(user_profile::ActiveModel {
                        user_id: Set(user_id.to_string()),
                        bio: Set(input.bio),
                        location: Set(input.location),
                        website: Set(input.website),
                        avatar_key: Set(None),
                    })
                    .await?;
            }
        }

        self.profile(&user.username).await
    }

    /// Replace the caller's avatar image.
    pub async fn update_avatar(
        &self,
        user_id: &str,
        image_data: &[u8],
        content_type: &str,
    ) -> AppResult<ProfileResponse> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let stored = self.media.store_avatar(image_data, content_type).await?;

        match self.user_repo.find_profile(user_id).await? {
            Some(existing) => {
                let old_key = existing.avatar_key.clone();
                let mut active: user_profile::ActiveModel = existing.into();
                active.avatar_key = Set(Some(stored.key));
                self.user_repo.update_profile(active).await?;

                if let Some(key) = old_key
                    && let Err(e) = self.media.delete(&key).await
                {
                    tracing::warn!(user_id = user_id, key = %key, error = %e, "Failed to delete old avatar");
                }
            }
            None => {
                self.user_repo
                    .create_profile(user_profile::ActiveModel {
                        user_id: Set(user_id.to_string()),
                        bio: Set(None),
                        location: Set(None),
                        website: Set(None),
                        avatar_key: Set(Some(stored.key)),
                    })
                    .await?;
            }
        }

        self.profile(&user.username).await
    }
}

fn validate_username_charset(username: &str) -> AppResult<()> {
    let ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Username may only contain letters, digits and underscores".to_string(),
        ))
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
