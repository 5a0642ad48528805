//! Questionnaire intake. These endpoints exist to seed and extend the
//! questionnaire; the admin screens consuming them live elsewhere.

use crate::models::ErrorResponse;
use actix_web::{post, web, HttpResponse, Responder};
use encuesta_core::{Database, NO_BRANCH};
use shared_types::{CreateChoiceRequest, CreateQuestionRequest, CreatedResponse};
use std::sync::Arc;
use tracing::{error, info};

#[post("/questions")]
pub async fn create_question(
    req: web::Json<CreateQuestionRequest>,
    db: web::Data<Arc<Database>>,
) -> impl Responder {
    info!(text = %req.text, "Creating question");

    match db.create_question(
        &req.text,
        req.allows_other,
        req.allows_image,
        req.allows_multiple,
        req.allows_observation,
    ) {
        Ok(id) => HttpResponse::Created().json(CreatedResponse { id }),
        Err(e) => {
            error!(error = %e, "Failed to create question");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to create question: {}", e),
            })
        }
    }
}

#[post("/questions/{id}/choices")]
pub async fn create_choice(
    question_id: web::Path<i64>,
    req: web::Json<CreateChoiceRequest>,
    db: web::Data<Arc<Database>>,
) -> impl Responder {
    let question_id = question_id.into_inner();
    info!(question_id, text = %req.text, "Creating choice");

    match db.create_choice(
        question_id,
        &req.text,
        req.image.as_deref(),
        req.next_question.unwrap_or(NO_BRANCH),
    ) {
        Ok(id) => HttpResponse::Created().json(CreatedResponse { id }),
        Err(e) => {
            error!(error = %e, question_id, "Failed to create choice");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to create choice: {}", e),
            })
        }
    }
}
