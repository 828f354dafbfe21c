#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    middleware::Logger,
    test, App, Error,
};
use serde_json::{json, Value};
use taskly::{
    auth::TokenService, config::OwnershipPolicy, store::MemoryStore, AppServices,
};

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Password123!";

pub fn services_with(secret: Option<&str>, ownership: OwnershipPolicy) -> AppServices {
    let store = Arc::new(MemoryStore::new());
    AppServices::from_parts(
        store.clone(),
        store,
        TokenService::new(secret.map(str::to_string)),
        4,
        ownership,
    )
}

pub fn services() -> AppServices {
    services_with(Some(SECRET), OwnershipPolicy::Owner)
}

pub async fn init_app(
    services: &AppServices,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let services = services.clone();
    test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| services.configure(cfg)),
    )
    .await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Calls the service and returns the status together with the parsed JSON body.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "response body is not JSON ({}): {:?}",
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}

pub async fn register<S, B>(app: &S, email: &str, name: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users/register")
        .set_json(json!({ "email": email, "password": PASSWORD, "name": name }))
        .to_request();
    send(app, req).await
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    send(app, req).await
}

/// Registers and logs in a user, returning `(user_id, token)`.
pub async fn signed_in_user<S, B>(app: &S, email: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let (status, body) = register(app, email, "Test User").await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    let (status, body) = login(app, email, PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);

    let id = body["data"]["id"].as_str().unwrap().to_string();
    let token = body["data"]["token"].as_str().unwrap().to_string();
    (id, token)
}
