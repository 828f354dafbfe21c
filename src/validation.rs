//! Request binding and validation.
//!
//! Bodies are parsed with `serde_json` and then checked against the
//! `validator` constraints declared on the target type. Parsing failures and
//! constraint failures are reported as distinct [`AppError`] variants.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;
use crate::response::FieldError;

pub const VALIDATION_FAILED: &str = "Failed! Validation error.";

/// A request payload bound by [`ValidatedJson`].
///
/// `TARGET` is the route path reported in every field error, independent of
/// path parameters in the concrete request.
pub trait RequestBody: DeserializeOwned + Validate {
    const TARGET: &'static str;
}

/// Reads a JSON string field, treating `null` like an absent field.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses `body` into `T` and applies its declared constraints.
///
/// `target` is copied into every reported [`FieldError`].
pub fn bind_and_validate<T>(body: &[u8], target: &str) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_slice(body).map_err(|e| AppError::Parse(e.to_string()))?;
    value.validate().map_err(|errors| AppError::Validation {
        message: VALIDATION_FAILED.into(),
        errors: field_errors(&errors, target),
    })?;
    Ok(value)
}

/// Flattens `validator` output into field errors, ordered by field name.
pub fn field_errors(errors: &ValidationErrors, target: &str) -> Vec<FieldError> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, violations)| {
            violations.iter().map(move |violation| {
                let value = match violation.params.get("value") {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(serde_json::Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                FieldError {
                    field: field.to_string(),
                    value,
                    message: format!("Field '{}' is {}", field, describe(violation)),
                    target: target.to_string(),
                    tag: violation.code.to_string(),
                }
            })
        })
        .collect()
}

fn describe(violation: &ValidationError) -> String {
    match violation.code.as_ref() {
        "required" => "required".into(),
        "email" => "not a valid email".into(),
        "length" => "of invalid length".into(),
        code => match &violation.message {
            Some(message) => message.to_string(),
            None => format!("invalid ({})", code),
        },
    }
}

/// JSON body extractor that runs [`bind_and_validate`] with `T::TARGET`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: RequestBody + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Bytes::from_request(req, payload);
        Box::pin(async move {
            let body = body.await.map_err(|e| AppError::Parse(e.to_string()))?;
            let value = bind_and_validate::<T>(&body, T::TARGET)?;
            Ok(ValidatedJson(value))
        })
    }
}
