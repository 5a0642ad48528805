mod common;

use actix_web::test;
use actix_web::test::TestRequest;
use common::{seed_questionnaire, setup_test_app};
use serde_json::json;

#[actix_rt::test]
async fn test_branching_submission_skips_to_target() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    seed_questionnaire(&test_app.db)?;

    // "No" on the water question jumps straight to the transport question.
    let req = TestRequest::post()
        .uri("/survey/questions/0/answer")
        .set_json(json!({"user_id": 1, "choice": "1"}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert_eq!(body["next"], 3);
    assert_eq!(body["completed"], false);

    // The two questions in between were auto-filled with the skip sentinel.
    for index in [1, 2] {
        let req = TestRequest::get()
            .uri(format!("/survey/questions/{}?user_id=1", index).as_str())
            .to_request();
        let resp = test::call_service(&test_app.app, req).await;
        assert!(resp.status().is_success());

        let view: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
        assert_eq!(view["has_answer"], true, "question {} not skipped", index);
        assert_eq!(view["selection"], -1);
    }

    let req = TestRequest::get()
        .uri("/survey/progress?user_id=1")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let progress: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert_eq!(progress["first_unanswered"], 3);
    assert_eq!(progress["completed"], false);
    assert_eq!(progress["answered"], 3);
    assert_eq!(progress["progress_percent"], 75);

    // Answering the transport question finishes the questionnaire.
    let req = TestRequest::post()
        .uri("/survey/questions/3/answer")
        .set_json(json!({"user_id": 1, "choice": "0"}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert_eq!(body["completed"], true);
    assert!(body.get("next").is_none());

    let req = TestRequest::get()
        .uri("/survey/progress?user_id=1")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let progress: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert_eq!(progress["completed"], true);
    assert_eq!(progress["progress_percent"], 100);

    Ok(())
}

#[actix_rt::test]
async fn test_no_branch_advances_to_next_question() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    seed_questionnaire(&test_app.db)?;

    let req = TestRequest::post()
        .uri("/survey/questions/0/answer")
        .set_json(json!({"user_id": 1, "choice": "0"}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert_eq!(body["next"], 1);

    // No skip sentinel was written anywhere.
    let req = TestRequest::get()
        .uri("/survey/questions/1?user_id=1")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let view: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert_eq!(view["has_answer"], false);

    Ok(())
}

#[actix_rt::test]
async fn test_resubmission_overwrites_in_place() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    seed_questionnaire(&test_app.db)?;

    for _ in 0..2 {
        let req = TestRequest::post()
            .uri("/survey/questions/1/answer")
            .set_json(json!({
                "user_id": 1,
                "choice": "99",
                "other_text": "Aljibe",
                "observations": "compartido con vecinos"
            }))
            .to_request();
        let resp = test::call_service(&test_app.app, req).await;
        assert!(resp.status().is_success());
    }

    let req = TestRequest::get()
        .uri("/survey/questions/1?user_id=1")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let view: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert_eq!(view["has_answer"], true);
    assert_eq!(view["selection"], 99);
    assert_eq!(view["other_text"], "Aljibe");

    let req = TestRequest::get()
        .uri("/survey/progress?user_id=1")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let progress: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert_eq!(progress["answered"], 1);

    Ok(())
}

#[actix_rt::test]
async fn test_missing_choice_is_rejected_without_mutation() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    seed_questionnaire(&test_app.db)?;

    let req = TestRequest::post()
        .uri("/survey/questions/0/answer")
        .set_json(json!({"user_id": 1}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("No elegiste ninguna opción"));

    let req = TestRequest::get()
        .uri("/survey/questions/0?user_id=1")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let view: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert_eq!(view["has_answer"], false);

    Ok(())
}

#[actix_rt::test]
async fn test_other_selection_requires_free_text() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    seed_questionnaire(&test_app.db)?;

    let req = TestRequest::post()
        .uri("/survey/questions/1/answer")
        .set_json(json!({"user_id": 1, "choice": "99"}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), 400);

    Ok(())
}

#[actix_rt::test]
async fn test_multi_choice_submission() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    seed_questionnaire(&test_app.db)?;

    // The treatment question takes checkN fields instead of a choice.
    let req = TestRequest::post()
        .uri("/survey/questions/2/answer")
        .set_json(json!({"user_id": 2, "check0": "on", "check2": "on"}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert_eq!(body["next"], 3);

    let req = TestRequest::get()
        .uri("/survey/questions/2?user_id=2")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let view: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert_eq!(view["multi_selections"], json!([0, 2]));

    // And rejects an empty selection.
    let req = TestRequest::post()
        .uri("/survey/questions/2/answer")
        .set_json(json!({"user_id": 3}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), 400);

    Ok(())
}

#[actix_rt::test]
async fn test_unknown_question_index_is_not_found() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    seed_questionnaire(&test_app.db)?;

    let req = TestRequest::get()
        .uri("/survey/questions/9?user_id=1")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), 404);

    let req = TestRequest::post()
        .uri("/survey/questions/9/answer")
        .set_json(json!({"user_id": 1, "choice": "0"}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), 404);

    Ok(())
}

#[actix_rt::test]
async fn test_unknown_beneficiary_is_not_found() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    seed_questionnaire(&test_app.db)?;

    let req = TestRequest::post()
        .uri("/survey/questions/0/answer")
        .set_json(json!({"user_id": 1, "beneficiary_id": 99, "choice": "0"}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), 404);

    Ok(())
}

#[actix_rt::test]
async fn test_answer_image_is_stored() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    seed_questionnaire(&test_app.db)?;

    let req = TestRequest::post()
        .uri("/survey/questions/3/answer")
        .set_json(json!({
            "user_id": 1,
            "choice": "1",
            "imagen": "aG9sYQ=="
        }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let stored: Vec<_> = std::fs::read_dir(test_app.uploads_dir.path())?
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(stored.len(), 1);
    assert!(stored[0]
        .file_name()
        .to_string_lossy()
        .starts_with("answer-"));

    Ok(())
}

#[actix_rt::test]
async fn test_coincidences_rank_identical_respondents() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    seed_questionnaire(&test_app.db)?;

    // Users 1 and 2 answer identically; the branch fills the rest.
    for user_id in [1, 2] {
        let req = TestRequest::post()
            .uri("/survey/questions/0/answer")
            .set_json(json!({"user_id": user_id, "choice": "1"}))
            .to_request();
        test::call_service(&test_app.app, req).await;

        let req = TestRequest::post()
            .uri("/survey/questions/3/answer")
            .set_json(json!({"user_id": user_id, "choice": "0"}))
            .to_request();
        test::call_service(&test_app.app, req).await;
    }

    let req = TestRequest::get()
        .uri("/survey/coincidences?user_id=1")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["user_id"], 2);
    assert_eq!(entries[0]["score"], 100.0);

    // An incomplete respondent gets no report.
    let req = TestRequest::post()
        .uri("/survey/questions/0/answer")
        .set_json(json!({"user_id": 3, "choice": "0"}))
        .to_request();
    test::call_service(&test_app.app, req).await;

    let req = TestRequest::get()
        .uri("/survey/coincidences?user_id=3")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await)?;
    assert!(body["entries"].as_array().unwrap().is_empty());

    Ok(())
}
