use actix_web::{post, web, HttpResponse};

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{LoginUserRequest, RegisterUserRequest, UserView},
    response::ApiResponse,
    services::UserService,
    validation::ValidatedJson,
};

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: the new user's public view.
/// - `400 Bad Request`: malformed body or missing `name`.
/// - `409 Conflict`: the email is already registered.
#[post("/register")]
pub async fn register(
    users: web::Data<UserService>,
    body: ValidatedJson<RegisterUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = users.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Success! User registered.",
        user.to_public_view(),
    )))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: the user's public view including a bearer `token`.
/// - `400 Bad Request`: malformed body.
/// - `401 Unauthorized`: unknown email or wrong password.
/// - `500 Internal Server Error`: no signing secret is configured.
#[post("/login")]
pub async fn login(
    users: web::Data<UserService>,
    body: ValidatedJson<LoginUserRequest>,
) -> Result<HttpResponse, AppError> {
    let (user, token) = users.login(body.into_inner()).await?;
    let view: UserView = user.to_public_view().with_token(token);
    Ok(HttpResponse::Ok().json(ApiResponse::success("Success! Login success.", view)))
}

/// The authenticated caller's own account. Mounted behind `AuthMiddleware`.
pub async fn me(
    users: web::Data<UserService>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = users.get_by_id(caller.user_id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Success! user found.",
        user.to_public_view(),
    )))
}
