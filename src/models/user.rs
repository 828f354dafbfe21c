use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::validation::{null_as_empty, RequestBody};

/// A stored user account.
///
/// Deliberately not `Serialize`: responses go through [`UserView`] so the
/// password hash can never reach the wire.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    /// bcrypt hash of the password.
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub name: String,
}

/// A user ready for insertion; timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

/// Response-safe projection of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub name: String,
    /// Bearer token, present only in login responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl User {
    pub fn to_public_view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            email: self.email.clone(),
            name: self.name.clone(),
            token: None,
        }
    }
}

impl UserView {
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }
}

/// Payload for `POST /users/register`. Only `name` is constrained.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterUserRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, code = "required"))]
    pub name: String,
}

impl RequestBody for RegisterUserRequest {
    const TARGET: &'static str = "/users/register";
}

/// Payload for `POST /users/login`.
///
/// Carries no constraints: an empty email is just another unknown account.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginUserRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
}

impl RequestBody for LoginUserRequest {
    const TARGET: &'static str = "/users/login";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_view_omits_password() {
        let now = Utc::now();
        let user = User {
            id: "u1".into(),
            created_at: now,
            updated_at: now,
            email: "test@example.com".into(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuv".into(),
            name: "Test".into(),
        };
        let json = serde_json::to_string(&user.to_public_view()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$"));
        assert!(!json.contains("token"));
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterUserRequest {
            email: "test@example.com".into(),
            password: "password123".into(),
            name: "Test".into(),
        };
        assert!(valid.validate().is_ok());

        let free_form_email = RegisterUserRequest {
            email: "testexample.com".into(),
            ..valid
        };
        assert!(free_form_email.validate().is_ok());

        let nameless = RegisterUserRequest {
            name: String::new(),
            ..free_form_email
        };
        let errors = nameless.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert_eq!(errors.field_errors()["name"][0].code, "required");
    }

    #[test]
    fn test_login_request_accepts_empty_fields() {
        let empty: LoginUserRequest = serde_json::from_str(r#"{"email": null}"#).unwrap();
        assert_eq!(empty.email, "");
        assert_eq!(empty.password, "");
        assert!(empty.validate().is_ok());
    }
}
