use crate::config::ApiConfig;
use crate::models::ErrorResponse;
use actix_web::{get, web, HttpResponse, Responder};
use encuesta_core::{export_table, Database, Questionnaire};
use shared_types::ExportResponse;
use std::sync::Arc;
use tracing::{error, info};

/// Tabular dump of every respondent's answers. The spreadsheet itself is
/// produced by the consumer; this endpoint returns header and rows.
#[get("/survey/export")]
pub async fn export_answers(
    db: web::Data<Arc<Database>>,
    config: web::Data<ApiConfig>,
) -> impl Responder {
    info!("Exporting answers");

    let questionnaire = match Questionnaire::load(db.get_ref().as_ref()) {
        Ok(questionnaire) => questionnaire,
        Err(e) => {
            error!(error = %e, "Failed to load questionnaire");
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to load questionnaire: {}", e),
            });
        }
    };

    let beneficiaries = match db.get_beneficiaries() {
        Ok(beneficiaries) => beneficiaries,
        Err(e) => {
            error!(error = %e, "Failed to load beneficiaries");
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to load beneficiaries: {}", e),
            });
        }
    };

    match export_table(
        db.get_ref().as_ref(),
        &questionnaire,
        &beneficiaries,
        &config.describe_options(),
    ) {
        Ok(table) => HttpResponse::Ok().json(ExportResponse {
            header: table.header,
            rows: table.rows,
        }),
        Err(e) => {
            error!(error = %e, "Failed to export answers");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to export answers: {}", e),
            })
        }
    }
}
