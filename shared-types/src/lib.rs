use serde::{Deserialize, Serialize};

pub mod beneficiary;
pub mod survey;

pub use beneficiary::{BeneficiaryListResponse, BeneficiaryView, RegisterBeneficiaryRequest};
pub use survey::{
    ChoiceView, CoincidenceEntry, CoincidenceResponse, CreateChoiceRequest, CreateQuestionRequest,
    ExportResponse, ProgressResponse, QuestionView, SubmitAnswerRequest, SubmitAnswerResponse,
};

// Shared models for the encuesta API and the field-worker web frontend.

/// Identifies who is being surveyed: a field worker's account alone, or a
/// (user, beneficiary) pair when the worker fills the questionnaire on
/// behalf of a registered beneficiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentRef {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}
