//! Account registration, login and token identity.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use bloodlink_common::{AppError, AppResult, IdGenerator};
use bloodlink_db::{
    entities::{UserRole, user},
    repositories::UserRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(custom(function = validate_contact_number))]
    pub contact_number: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    pub role: UserRole,
}

/// Input for changing a user's name or email.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateContactInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
}

/// A user together with the bearer token that identifies them.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: user::Model,
    pub token: String,
}

/// Contact numbers are exactly ten ASCII digits.
fn validate_contact_number(contact: &str) -> Result<(), ValidationError> {
    if contact.len() == 10 && contact.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("contact_number")
            .with_message("Contact number must be 10 digits".into()))
    }
}

/// Account service.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a user and issue their first token.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthSession> {
        input.validate()?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Name must not be blank".to_string()));
        }

        if self
            .user_repo
            .find_by_contact_number(&input.contact_number)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(
                "Contact number already registered".to_string(),
            ));
        }

        let email = input.email.map(|e| e.trim().to_lowercase());
        if let Some(email) = &email {
            if self.user_repo.find_by_email(email).await?.is_some() {
                return Err(AppError::AlreadyExists(
                    "Email already registered".to_string(),
                ));
            }
        }

        let password_hash = hash_password(&input.password)?;
        let token = self.id_gen.generate_token();
        let now = chrono::Utc::now();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name),
            contact_number: Set(input.contact_number),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(input.role),
            token: Set(token.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = %user.id, role = ?user.role, "Registered user");

        Ok(AuthSession { user, token })
    }

    /// Exchange a contact number and password for the user's token.
    pub async fn login(&self, contact_number: &str, password: &str) -> AppResult<AuthSession> {
        let user = self
            .user_repo
            .find_by_contact_number(contact_number)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthenticated);
        }

        let token = user.token.clone();
        Ok(AuthSession { user, token })
    }

    /// Resolve a bearer token to its user.
    pub async fn resolve_identity(&self, token: &str) -> AppResult<user::Model> {
        if token.is_empty() {
            return Err(AppError::Unauthenticated);
        }
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthenticated)
    }

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Change a user's display name or email.
    pub async fn update_contact_details(
        &self,
        user_id: &str,
        input: UpdateContactInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.clone().into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation("Name must not be blank".to_string()));
            }
            active.name = Set(name);
        }

        if let Some(email) = input.email {
            let email = email.trim().to_lowercase();
            if user.email.as_deref() != Some(email.as_str()) {
                if let Some(other) = self.user_repo.find_by_email(&email).await? {
                    if other.id != user.id {
                        return Err(AppError::AlreadyExists(
                            "Email already registered".to_string(),
                        ));
                    }
                }
                active.email = Set(Some(email));
            }
        }

        active.updated_at = Set(chrono::Utc::now().into());
        self.user_repo.update(active).await
    }

    /// Replace a user's token, invalidating the old one.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<AuthSession> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(token.clone());
        active.updated_at = Set(chrono::Utc::now().into());

        let user = self.user_repo.update(active).await?;
        info!(user_id = %user.id, "Regenerated token");

        Ok(AuthSession { user, token })
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(password: &str) -> user::Model {
        user::Model {
            id: "u1".to_string(),
            name: "Dev".to_string(),
            contact_number: "9876543210".to_string(),
            email: Some("dev@example.com".to_string()),
            password_hash: hash_password(password).unwrap(),
            role: UserRole::Donor,
            token: "tok".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn register_input() -> RegisterInput {
        RegisterInput {
            name: "Dev".to_string(),
            contact_number: "9876543210".to_string(),
            email: Some("Dev@Example.com".to_string()),
            password: "secret123".to_string(),
            role: UserRole::Donor,
        }
    }

    fn service(db: MockDatabase) -> AccountService {
        AccountService::new(UserRepository::new(Arc::new(db.into_connection())))
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("secret123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_register_input_validation() {
        assert!(register_input().validate().is_ok());

        let mut input = register_input();
        input.contact_number = "98765".to_string();
        assert!(input.validate().is_err());

        let mut input = register_input();
        input.contact_number = "98765abcde".to_string();
        assert!(input.validate().is_err());

        let mut input = register_input();
        input.email = Some("not-an-email".to_string());
        assert!(input.validate().is_err());

        let mut input = register_input();
        input.password = "12345".to_string();
        assert!(input.validate().is_err());

        let mut input = register_input();
        input.email = None;
        assert!(input.validate().is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_contact() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("x")]]),
        );

        let result = service.register(register_input()).await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[create_test_user("x")]]),
        );

        let result = service.register(register_input()).await;

        assert!(matches!(result, Err(AppError::AlreadyExists(msg)) if msg.contains("Email")));
    }

    #[tokio::test]
    async fn test_register_success() {
        let created = create_test_user("secret123");
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[created]]),
        );

        let session = service.register(register_input()).await.unwrap();

        assert_eq!(session.user.id, "u1");
        assert_eq!(session.token.len(), 32);
    }

    #[tokio::test]
    async fn test_login() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("secret123")]])
                .append_query_results([[create_test_user("secret123")]]),
        );

        let session = service.login("9876543210", "secret123").await.unwrap();
        assert_eq!(session.token, "tok");

        let wrong = service.login("9876543210", "nope").await;
        assert!(matches!(wrong, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_login_unknown_contact() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let result = service.login("0000000000", "secret123").await;

        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_resolve_identity() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        assert!(matches!(
            service.resolve_identity("").await,
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            service.resolve_identity("stale").await,
            Err(AppError::Unauthenticated)
        ));
    }
}
