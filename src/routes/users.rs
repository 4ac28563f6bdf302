use actix_web::{web, HttpResponse, Responder};
use log::info;
use serde_json::json;
use validator::Validate;

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Credentials, NewUser},
    usecases::UserUseCase,
};

/// Register a new user
///
/// The first account ever registered becomes an admin.
///
/// ## Responses:
/// - `201 Created`: `{"message": ..., "user": {id, username, role}}`.
/// - `400 Bad Request`: missing username/password or password too short.
/// - `409 Conflict`: username already taken.
/// - `422 Unprocessable Entity`: username longer than 50 characters.
pub async fn register(
    users: web::Data<UserUseCase>,
    payload: web::Json<NewUser>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let user = users.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "user created successfully",
        "user": user,
    })))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: an `AuthResponse` with the token and the user.
/// - `401 Unauthorized`: unknown username or wrong password, indistinguishably.
pub async fn login(
    users: web::Data<UserUseCase>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    let response = users.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Promote a user to admin (admin only)
///
/// ## Responses:
/// - `200 OK` on success, including for users who already are admins.
/// - `400 Bad Request`: malformed id.
/// - `404 Not Found`: no such user.
pub async fn promote_to_admin(
    users: web::Data<UserUseCase>,
    user_id: web::Path<String>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user_id = user_id.into_inner();
    users.promote_to_admin(&user_id).await?;

    info!("Admin {} promoted user {}", caller.username, user_id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "user promoted to admin successfully"
    })))
}
