use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTaskRequest, EditTaskRequest, PageRequest, TaskListQuery},
    response::ApiResponse,
    services::TaskService,
    validation::ValidatedJson,
};
use actix_web::{delete, get, post, put, web, HttpResponse};

/// Lists tasks, newest first.
///
/// ## Query Parameters:
/// - `page` (optional): 1-based page number, default 1.
/// - `limit` (optional): page size, default 10, clamped to 1..=100.
///
/// Unparseable values fall back to the defaults.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    query: web::Query<TaskListQuery>,
) -> Result<HttpResponse, AppError> {
    let page = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());
    let (items, pagination) = tasks.list(page).await?;

    Ok(HttpResponse::Ok()
        .json(ApiResponse::success("Success! tasks found.", items).with_pagination(pagination)))
}

/// Creates a task owned by the caller.
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `400 Bad Request`: malformed body, or `title`/`label` missing or empty.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedUser,
    body: ValidatedJson<CreateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let task = tasks
        .create(caller.user_id(), body.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Success! task created.", task)))
}

/// Fetches a single task.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `404 Not Found`: no task with that id.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let task = tasks.get(&task_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Success! task found.", task)))
}

/// Replaces a task's title, description and label.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: malformed body, or `title`/`label` missing or empty.
/// - `404 Not Found`: no such task, or (owner policy) the caller is not its creator.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedUser,
    task_id: web::Path<String>,
    body: ValidatedJson<EditTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let task = tasks
        .update(caller.user_id(), &task_id, body.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Success! task updated.", task)))
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: deletion confirmation, no data.
/// - `404 Not Found`: no such task, or (owner policy) the caller is not its creator.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    caller: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    tasks.delete(caller.user_id(), &task_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Success! task deleted.")))
}
