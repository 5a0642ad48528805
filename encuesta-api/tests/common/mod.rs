use actix_web::{test, web, App};
use encuesta_api::config::ApiConfig;
use encuesta_api::handlers::beneficiaries::{list_beneficiaries, register_beneficiary};
use encuesta_api::handlers::export::export_answers;
use encuesta_api::handlers::questions::{create_choice, create_question};
use encuesta_api::handlers::survey::{get_coincidences, get_progress, get_question, submit_answer};
use encuesta_api::uploads::{FsImageStore, ImageStore};
use encuesta_core::Database;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp<S> {
    pub db: Arc<Database>,
    pub uploads_dir: TempDir,
    pub app: S,
}

pub async fn setup_test_app() -> anyhow::Result<
    TestApp<
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    >,
> {
    let db = Arc::new(Database::new(&PathBuf::from(":memory:"))?);
    let uploads_dir = TempDir::new()?;
    let images: Arc<dyn ImageStore> =
        Arc::new(FsImageStore::new(uploads_dir.path().to_path_buf())?);
    let config = ApiConfig::default();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(images))
            .service(get_question)
            .service(submit_answer)
            .service(get_progress)
            .service(get_coincidences)
            .service(register_beneficiary)
            .service(list_beneficiaries)
            .service(create_question)
            .service(create_choice)
            .service(export_answers),
    )
    .await;

    Ok(TestApp {
        db,
        uploads_dir,
        app,
    })
}

/// Four questions about housing conditions. Answering "No" (choice 1) on
/// the first one jumps straight to the transport question at position 3.
pub fn seed_questionnaire(db: &Database) -> anyhow::Result<()> {
    let q0 = db.create_question("¿Tiene agua potable?", false, false, false, true)?;
    db.create_choice(q0, "Sí", None, -1)?;
    db.create_choice(q0, "No", None, 3)?;

    let q1 = db.create_question("¿De dónde obtiene el agua?", true, false, false, true)?;
    db.create_choice(q1, "Red pública", None, -1)?;
    db.create_choice(q1, "Pozo", None, -1)?;

    let q2 = db.create_question("¿Qué tratamiento le da al agua?", false, false, true, false)?;
    db.create_choice(q2, "La hierve", None, -1)?;
    db.create_choice(q2, "La clora", None, -1)?;
    db.create_choice(q2, "Ninguno", None, -1)?;

    let q3 = db.create_question("¿Cómo se traslada?", true, true, false, true)?;
    db.create_choice(q3, "Colectivo", None, -1)?;
    db.create_choice(q3, "Caminando", None, -1)?;

    Ok(())
}
