//! User admission routes.

use actix_web::{web, Result};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::repos::users::User;
use crate::state::app_state::AppState;

#[derive(Deserialize)]
struct CreateUserRequest {
    username: String,
}

#[derive(Serialize)]
struct UserResponse {
    id: i64,
    username: String,
    created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at.to_string(),
        }
    }
}

#[derive(Serialize)]
struct DetailResponse {
    detail: String,
}

/// POST /users
///
/// Admit a user: rejected with SERVER_AT_CAPACITY when the active-user limit
/// is reached, otherwise get-or-create by username and mark active.
async fn connect_user(
    body: web::Json<CreateUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<UserResponse>, AppError> {
    let user = app_state.flow.connect_user(&body.username).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// DELETE /users/{user_id}
///
/// End a user's connected session (drops them from the active-user set).
async fn disconnect_user(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<DetailResponse>, AppError> {
    let user_id = path.into_inner();
    app_state.flow.disconnect_user(user_id).await?;
    Ok(web::Json(DetailResponse {
        detail: "User session ended".to_string(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users").route(web::post().to(connect_user)));
    cfg.service(web::resource("/users/{user_id}").route(web::delete().to(disconnect_user)));
}
