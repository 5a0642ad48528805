// Survey flow types shared between the API and the web frontend.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

/// One selectable option of a question, as presented to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChoiceView {
    /// Position of the choice within its question; this is the value the
    /// frontend posts back in the `choice` field.
    pub index: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The question to present, merged with any previously stored answer so a
/// resumed questionnaire shows the respondent's earlier selections.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionView {
    pub index: usize,
    pub text: String,
    pub allows_other: bool,
    pub allows_image: bool,
    pub allows_multiple: bool,
    pub allows_observation: bool,
    pub choices: Vec<ChoiceView>,
    pub has_answer: bool,
    /// Stored single-choice value (99 = "other", -1 = skipped via branch).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<i64>,
    pub multi_selections: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    pub progress_percent: u8,
    pub is_first: bool,
    pub is_last: bool,
}

/// Raw submission for one question. Single-choice questions post `choice`;
/// multi-choice questions post `check0`..`check49` keys instead, which land
/// in the flattened map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    /// Base64-encoded photo attachment, stored only when the question
    /// allows images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
    #[serde(flatten)]
    pub checks: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitAnswerResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<usize>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProgressResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_unanswered: Option<usize>,
    pub completed: bool,
    pub answered: usize,
    pub total: usize,
    pub progress_percent: u8,
}

/// One respondent ranked by the share of questions answered identically.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CoincidenceEntry {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_id: Option<i64>,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CoincidenceResponse {
    pub entries: Vec<CoincidenceEntry>,
}

/// Tabular answer dump: fixed beneficiary columns followed by one column
/// per question. Spreadsheet formatting is the consumer's concern.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExportResponse {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestionRequest {
    pub text: String,
    #[serde(default)]
    pub allows_other: bool,
    #[serde(default)]
    pub allows_image: bool,
    #[serde(default)]
    pub allows_multiple: bool,
    #[serde(default)]
    pub allows_observation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChoiceRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Question position to jump to when this choice is selected; omitted
    /// means fall through to the next question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<i64>,
}
