use crate::handlers::flow_error_response;
use crate::models::ErrorResponse;
use crate::uploads::ImageStore;
use actix_web::{get, post, web, HttpResponse, Responder};
use encuesta_core::{coincidence, flow, Database, Questionnaire, Respondent, SubmitOutcome};
use serde::Deserialize;
use shared_types::survey::{
    CoincidenceEntry, CoincidenceResponse, ProgressResponse, SubmitAnswerRequest,
    SubmitAnswerResponse,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Deserialize)]
pub struct RespondentQuery {
    pub user_id: i64,
    pub beneficiary_id: Option<i64>,
}

impl RespondentQuery {
    fn respondent(&self) -> Respondent {
        Respondent {
            user_id: self.user_id,
            beneficiary_id: self.beneficiary_id,
        }
    }
}

fn load_questionnaire(db: &Database) -> Result<Questionnaire, HttpResponse> {
    Questionnaire::load(db).map_err(|e| {
        error!(error = %e, "Failed to load questionnaire");
        HttpResponse::InternalServerError().json(ErrorResponse {
            error: format!("Failed to load questionnaire: {}", e),
        })
    })
}

#[get("/survey/questions/{index}")]
pub async fn get_question(
    index: web::Path<usize>,
    query: web::Query<RespondentQuery>,
    db: web::Data<Arc<Database>>,
) -> impl Responder {
    let index = index.into_inner();
    let respondent = query.respondent();
    info!(index, user_id = respondent.user_id, "Rendering question");

    let questionnaire = match load_questionnaire(&db) {
        Ok(questionnaire) => questionnaire,
        Err(response) => return response,
    };

    match flow::render(db.get_ref().as_ref(), &questionnaire, &respondent, index) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => {
            warn!(error = %e, index, "Cannot render question");
            flow_error_response(e)
        }
    }
}

#[post("/survey/questions/{index}/answer")]
pub async fn submit_answer(
    index: web::Path<usize>,
    req: web::Json<SubmitAnswerRequest>,
    db: web::Data<Arc<Database>>,
    images: web::Data<Arc<dyn ImageStore>>,
) -> impl Responder {
    let index = index.into_inner();
    let req = req.into_inner();
    let respondent = Respondent {
        user_id: req.user_id,
        beneficiary_id: req.beneficiary_id,
    };
    info!(index, user_id = respondent.user_id, "Submitting answer");

    // The beneficiary identity must resolve through the registry.
    if let Some(beneficiary_id) = respondent.beneficiary_id {
        match db.get_beneficiary(beneficiary_id) {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(beneficiary_id, "Unknown beneficiary");
                return HttpResponse::NotFound().json(ErrorResponse {
                    error: format!("Beneficiary {} not found", beneficiary_id),
                });
            }
            Err(e) => {
                error!(error = %e, beneficiary_id, "Failed to resolve beneficiary");
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: format!("Failed to resolve beneficiary: {}", e),
                });
            }
        }
    }

    let questionnaire = match load_questionnaire(&db) {
        Ok(questionnaire) => questionnaire,
        Err(response) => return response,
    };

    let image = match (&req.imagen, questionnaire.question(index)) {
        (Some(payload), Some(question)) if question.allows_image => {
            match images.store("answer", payload) {
                Ok(name) => Some(name),
                Err(e) => {
                    warn!(error = %e, index, "Rejecting image attachment");
                    return HttpResponse::BadRequest().json(ErrorResponse {
                        error: e.to_string(),
                    });
                }
            }
        }
        (Some(_), Some(_)) => {
            warn!(index, "Question does not allow images, ignoring attachment");
            None
        }
        _ => None,
    };

    let form = flow::AnswerForm {
        choice: req.choice,
        checks: flow::parse_checks(&req.checks),
        other_text: req.other_text,
        observations: req.observations,
        image,
    };

    match flow::submit(db.get_ref().as_ref(), &questionnaire, &respondent, index, &form) {
        Ok(SubmitOutcome::Next(next)) => HttpResponse::Ok().json(SubmitAnswerResponse {
            next: Some(next),
            completed: false,
        }),
        Ok(SubmitOutcome::Completed) => HttpResponse::Ok().json(SubmitAnswerResponse {
            next: None,
            completed: true,
        }),
        Err(e) => {
            warn!(error = %e, index, "Submission rejected");
            flow_error_response(e)
        }
    }
}

#[get("/survey/progress")]
pub async fn get_progress(
    query: web::Query<RespondentQuery>,
    db: web::Data<Arc<Database>>,
) -> impl Responder {
    let respondent = query.respondent();

    let questionnaire = match load_questionnaire(&db) {
        Ok(questionnaire) => questionnaire,
        Err(response) => return response,
    };

    match flow::progress(db.get_ref().as_ref(), &questionnaire, &respondent) {
        Ok(progress) => HttpResponse::Ok().json(ProgressResponse {
            first_unanswered: progress.first_unanswered,
            completed: progress.completed(),
            answered: progress.answered,
            total: progress.total,
            progress_percent: progress.percent(),
        }),
        Err(e) => flow_error_response(e),
    }
}

#[get("/survey/coincidences")]
pub async fn get_coincidences(
    query: web::Query<RespondentQuery>,
    db: web::Data<Arc<Database>>,
) -> impl Responder {
    let respondent = query.respondent();
    info!(user_id = respondent.user_id, "Computing coincidence report");

    let questionnaire = match load_questionnaire(&db) {
        Ok(questionnaire) => questionnaire,
        Err(response) => return response,
    };

    // Only respondents that finished the questionnaire get compared.
    match flow::first_unanswered(db.get_ref().as_ref(), &questionnaire, &respondent) {
        Ok(None) => {}
        Ok(Some(_)) => {
            return HttpResponse::Ok().json(CoincidenceResponse {
                entries: Vec::new(),
            });
        }
        Err(e) => return flow_error_response(e),
    }

    match coincidence::match_scores(db.get_ref().as_ref(), &questionnaire, &respondent) {
        Ok(entries) => HttpResponse::Ok().json(CoincidenceResponse {
            entries: entries
                .into_iter()
                .map(|entry| CoincidenceEntry {
                    user_id: entry.respondent.user_id,
                    beneficiary_id: entry.respondent.beneficiary_id,
                    score: entry.score,
                })
                .collect(),
        }),
        Err(e) => {
            error!(error = %e, "Failed to compute coincidences");
            flow_error_response(e)
        }
    }
}
