//! AI personality routes.

use actix_web::{web, Result};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::repos::personalities::AiPersonality;
use crate::state::app_state::AppState;

#[derive(Deserialize)]
struct CreatePersonalityRequest {
    name: String,
    description: Option<String>,
    created_by: Option<i64>,
}

#[derive(Serialize)]
struct PersonalityResponse {
    id: i64,
    name: String,
    description: Option<String>,
    created_by: Option<i64>,
}

impl From<AiPersonality> for PersonalityResponse {
    fn from(personality: AiPersonality) -> Self {
        Self {
            id: personality.id,
            name: personality.name,
            description: personality.description,
            created_by: personality.created_by,
        }
    }
}

/// GET /ai-personalities
async fn list_personalities(
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<PersonalityResponse>>, AppError> {
    let personalities = app_state.flow.list_personalities().await?;
    Ok(web::Json(
        personalities.into_iter().map(PersonalityResponse::from).collect(),
    ))
}

/// POST /ai-personalities
async fn create_personality(
    body: web::Json<CreatePersonalityRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<PersonalityResponse>, AppError> {
    let personality = app_state
        .flow
        .create_personality(&body.name, body.description.as_deref(), body.created_by)
        .await?;
    Ok(web::Json(PersonalityResponse::from(personality)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/ai-personalities")
            .route(web::get().to(list_personalities))
            .route(web::post().to(create_personality)),
    );
}
