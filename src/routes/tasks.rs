use actix_web::{web, HttpResponse, Responder};
use log::info;
use serde_json::json;
use validator::Validate;

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{NewTask, TaskUpdate},
    usecases::TaskUseCase,
};

/// Retrieves every task.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Task` objects, `[]` when there are none.
/// - `401 Unauthorized`: missing or invalid token.
pub async fn get_tasks(tasks: web::Data<TaskUseCase>) -> Result<impl Responder, AppError> {
    let all = tasks.get_all_tasks().await?;
    Ok(HttpResponse::Ok().json(all))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `400 Bad Request`: malformed id.
/// - `404 Not Found`: no task with that id.
pub async fn get_task(
    tasks: web::Data<TaskUseCase>,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get_task_by_id(&task_id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Creates a new task (admin only).
///
/// ## Request Body:
/// - `title`, `description`: required, non-empty.
/// - `due_date`: required, RFC 3339, strictly in the future.
/// - `status` (optional): `pending` (default), `in_progress` or `completed`.
///
/// ## Responses:
/// - `201 Created`: the stored `Task`.
/// - `400 Bad Request`: a business rule failed; the message names it.
/// - `403 Forbidden`: caller is not an admin.
/// - `422 Unprocessable Entity`: title or description too long.
pub async fn create_task(
    tasks: web::Data<TaskUseCase>,
    task_data: web::Json<NewTask>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks.create_task(task_data.into_inner()).await?;

    info!("Admin {} created task {}", caller.username, task.id);
    Ok(HttpResponse::Created().json(task))
}

/// Updates the supplied fields of an existing task (admin only).
///
/// ## Responses:
/// - `200 OK`: `{"message": ..., "updated_task": Task}`.
/// - `400 Bad Request`: nothing to update, bad status or past due date.
/// - `404 Not Found`: no task with that id.
pub async fn update_task(
    tasks: web::Data<TaskUseCase>,
    task_id: web::Path<String>,
    task_data: web::Json<TaskUpdate>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let updated = tasks.update_task(&task_id, task_data.into_inner()).await?;

    info!("Admin {} updated task {}", caller.username, updated.id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "task updated successfully",
        "updated_task": updated,
    })))
}

/// Deletes a task by its ID (admin only).
///
/// ## Responses:
/// - `200 OK`: `{"message": "task deleted successfully"}`.
/// - `404 Not Found`: no task with that id.
pub async fn delete_task(
    tasks: web::Data<TaskUseCase>,
    task_id: web::Path<String>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    tasks.delete_task(&task_id).await?;

    info!("Admin {} deleted task {}", caller.username, task_id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "task deleted successfully"
    })))
}
