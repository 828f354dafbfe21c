//! Account registration, login and lookup.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{hash_password, verify_password, TokenService};
use crate::error::AppError;
use crate::models::{LoginUserRequest, NewUser, RegisterUserRequest, User};
use crate::store::{StoreError, UserStore, USERS_EMAIL_KEY};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            store,
            tokens,
            bcrypt_cost,
        }
    }

    /// Creates an account.
    ///
    /// The store's unique index on email is the only duplicate check, so two
    /// concurrent registrations with the same email cannot both succeed.
    pub async fn register(&self, input: RegisterUserRequest) -> Result<User, AppError> {
        let password_hash = hash_password(&input.password, self.bcrypt_cost).await?;
        let new_user = NewUser {
            id: Uuid::new_v4().to_string(),
            email: input.email,
            password_hash,
            name: input.name.trim().to_string(),
        };

        match self.store.insert_user(new_user).await {
            Ok(user) => {
                log::info!("Registered user {}", user.id);
                Ok(user)
            }
            Err(StoreError::UniqueViolation { constraint }) if constraint == USERS_EMAIL_KEY => {
                Err(AppError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Verifies credentials and issues a bearer token.
    ///
    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    pub async fn login(&self, input: LoginUserRequest) -> Result<(User, String), AppError> {
        let user = self
            .store
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.id)?;
        log::info!("User {} logged in", user.id);
        Ok((user, token))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<User, AppError> {
        if id.trim().is_empty() {
            return Err(AppError::invalid("validation error: id is required"));
        }

        self.store
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service(secret: Option<&str>) -> UserService {
        UserService::new(
            Arc::new(MemoryStore::new()),
            TokenService::new(secret.map(str::to_string)),
            4,
        )
    }

    fn register_request(email: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            email: email.into(),
            password: "Password123!".into(),
            name: "  Jane Doe ".into(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginUserRequest {
        LoginUserRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[actix_rt::test]
    async fn test_register_hashes_and_trims() {
        let users = service(Some("secret"));
        let user = users.register(register_request("jane@example.com")).await.unwrap();
        assert_eq!(user.name, "Jane Doe");
        assert_ne!(user.password_hash, "Password123!");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[actix_rt::test]
    async fn test_duplicate_email() {
        let users = service(Some("secret"));
        users.register(register_request("dup@example.com")).await.unwrap();
        let err = users
            .register(register_request("dup@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[actix_rt::test]
    async fn test_concurrent_duplicate_registration_admits_one() {
        let users = service(Some("secret"));
        let (a, b) = futures::join!(
            users.register(register_request("race@example.com")),
            users.register(register_request("race@example.com")),
        );
        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(AppError::DuplicateEmail))));
    }

    #[actix_rt::test]
    async fn test_login_issues_token_for_subject() {
        let tokens = TokenService::new(Some("secret".into()));
        let users = UserService::new(Arc::new(MemoryStore::new()), tokens.clone(), 4);
        let registered = users.register(register_request("login@example.com")).await.unwrap();

        let (user, token) = users
            .login(login_request("login@example.com", "Password123!"))
            .await
            .unwrap();
        assert_eq!(user.id, registered.id);
        assert_eq!(tokens.verify(&token).unwrap().sub, registered.id);
    }

    #[actix_rt::test]
    async fn test_login_failures_are_indistinguishable() {
        let users = service(Some("secret"));
        users.register(register_request("known@example.com")).await.unwrap();

        let wrong_password = users
            .login(login_request("known@example.com", "nope"))
            .await
            .unwrap_err();
        let unknown_email = users
            .login(login_request("ghost@example.com", "Password123!"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[actix_rt::test]
    async fn test_login_without_secret_is_configuration_error() {
        let users = service(None);
        users.register(register_request("nosecret@example.com")).await.unwrap();
        let err = users
            .login(login_request("nosecret@example.com", "Password123!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[actix_rt::test]
    async fn test_get_by_id() {
        let users = service(Some("secret"));
        let user = users.register(register_request("me@example.com")).await.unwrap();

        assert_eq!(users.get_by_id(&user.id).await.unwrap().email, "me@example.com");
        assert!(matches!(
            users.get_by_id("").await,
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            users.get_by_id("missing").await,
            Err(AppError::NotFound(_))
        ));
    }
}
