use crate::models::ErrorResponse;
use crate::uploads::ImageStore;
use actix_web::{get, post, web, HttpResponse, Responder};
use encuesta_core::{Beneficiary, Database};
use shared_types::{BeneficiaryListResponse, BeneficiaryView, CreatedResponse, RegisterBeneficiaryRequest};
use std::sync::Arc;
use tracing::{error, info, warn};

fn view(beneficiary: Beneficiary) -> BeneficiaryView {
    BeneficiaryView {
        id: beneficiary.id,
        registered_by: beneficiary.registered_by,
        name: beneficiary.name,
        document_number: beneficiary.document_number,
        address: beneficiary.address,
        household_size: beneficiary.household_size,
        dni_image: beneficiary.dni_image,
        created_at: beneficiary.created_at,
    }
}

#[post("/beneficiaries")]
pub async fn register_beneficiary(
    req: web::Json<RegisterBeneficiaryRequest>,
    db: web::Data<Arc<Database>>,
    images: web::Data<Arc<dyn ImageStore>>,
) -> impl Responder {
    info!(registered_by = req.registered_by, "Registering beneficiary");

    let dni_image = match &req.dni_image {
        Some(payload) => match images.store("dni", payload) {
            Ok(name) => Some(name),
            Err(e) => {
                warn!(error = %e, "Rejecting DNI image");
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: e.to_string(),
                });
            }
        },
        None => None,
    };

    match db.create_beneficiary(
        req.registered_by,
        &req.name,
        &req.document_number,
        req.address.as_deref(),
        req.household_size,
        dni_image.as_deref(),
    ) {
        Ok(id) => HttpResponse::Created().json(CreatedResponse { id }),
        Err(e) => {
            error!(error = %e, "Failed to register beneficiary");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to register beneficiary: {}", e),
            })
        }
    }
}

#[get("/beneficiaries")]
pub async fn list_beneficiaries(db: web::Data<Arc<Database>>) -> impl Responder {
    match db.get_beneficiaries() {
        Ok(beneficiaries) => HttpResponse::Ok().json(BeneficiaryListResponse {
            beneficiaries: beneficiaries.into_iter().map(view).collect(),
        }),
        Err(e) => {
            error!(error = %e, "Failed to list beneficiaries");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to list beneficiaries: {}", e),
            })
        }
    }
}
