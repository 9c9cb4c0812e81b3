use axum::{
    extract::{Path, State},
    routing::{delete, get, patch},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
    todos::{
        dto::{CreateTodoRequest, MoveTodoRequest, ToggleResponse},
        repo::{Status, Todo},
    },
};

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/:id/toggle", patch(toggle_todo))
        .route("/:id/move", patch(move_todo))
        .route("/:id", delete(delete_todo))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_todos(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Todo>>> {
    let todos = Todo::list_by_user(&state.db, user.id).await?;
    Ok(Json(todos))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn create_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTodoRequest>,
) -> ApiResult<Json<Todo>> {
    let (title, status, year_bucket) = payload.validate()?;
    let completed = status.completed();

    let todo = Todo::create(&state.db, user.id, title, status, completed, year_bucket).await?;
    info!(todo_id = todo.id, "todo created");
    Ok(Json(todo))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn toggle_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ToggleResponse>> {
    let completed = Todo::find_completed(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let next_status = Status::after_toggle(completed);
    let next_completed = next_status.completed();

    // The row may vanish between the read and this write; zero affected
    // rows is the authoritative NotFound.
    let affected = Todo::set_state(&state.db, user.id, id, next_status, next_completed).await?;
    if affected == 0 {
        return Err(ApiError::NotFound);
    }

    info!(todo_id = id, completed = next_completed, "todo toggled");
    Ok(Json(ToggleResponse {
        id,
        completed: next_completed,
        status: next_status,
    }))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn move_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<MoveTodoRequest>,
) -> ApiResult<Json<Todo>> {
    let (status, year_bucket) = payload.validate()?;
    let completed = status.completed();

    let todo = Todo::move_to(&state.db, user.id, id, status, year_bucket, completed)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!(todo_id = id, %status, year_bucket, "todo moved");
    Ok(Json(todo))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let affected = Todo::delete(&state.db, user.id, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound);
    }

    info!(todo_id = id, "todo deleted");
    Ok(Json(json!({ "ok": true })))
}
