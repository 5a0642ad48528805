pub mod beneficiaries;
pub mod export;
pub mod questions;
pub mod survey;

use crate::models::ErrorResponse;
use actix_web::HttpResponse;
use encuesta_core::FlowError;

/// Map engine failures onto the HTTP surface: unknown indexes and unresolved
/// identities read as not-found, validation failures re-present the question
/// with the message, storage trouble is a plain 500.
pub(crate) fn flow_error_response(err: FlowError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    match err {
        FlowError::OutOfRange { .. } | FlowError::NotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        FlowError::Validation(_) => HttpResponse::BadRequest().json(body),
        FlowError::Storage(_) => HttpResponse::InternalServerError().json(body),
    }
}
