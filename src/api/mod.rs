pub mod extract;

use axum::Json;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use tracing::{debug, info};

use crate::db::repository;
use crate::error::{AppError, ErrorResponse};
use crate::models::*;
use crate::state::AppState;

use self::extract::{ApiJson, ApiPath};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

pub async fn route_not_found() -> AppError {
    AppError::NotFound("404 Not Found: no such route".to_string())
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/todos",
    tag = "todos",
    responses(
        (status = 200, description = "All todos", body = Vec<Todo>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = repository::fetch_todos(&state.db).await?;
    debug!(count = todos.len(), "listed todos");
    Ok(Json(todos))
}

#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The todo", body = Todo),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No todo with this id", body = ErrorResponse),
    )
)]
pub async fn get_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Todo>, AppError> {
    let todo = repository::fetch_todo(&state.db, id)
        .await?
        .ok_or_else(|| AppError::todo_not_found(id))?;
    Ok(Json(todo))
}

#[utoipa::path(
    post,
    path = "/todos",
    tag = "todos",
    request_body = NewTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Missing title or invalid field", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn create_todo(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let new = req.validate()?;
    let todo = repository::insert_todo(&state.db, new).await?;
    info!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[utoipa::path(
    put,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = Todo),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "No todo with this id", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    let changes = req.validate()?;
    let todo = repository::update_todo(&state.db, id, changes)
        .await?
        .ok_or_else(|| AppError::todo_not_found(id))?;
    info!(id, "updated todo");
    Ok(Json(todo))
}

#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No todo with this id", body = ErrorResponse),
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_todo(&state.db, id).await?;
    if ok {
        info!(id, "deleted todo");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::todo_not_found(id))
    }
}
