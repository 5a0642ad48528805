use serde::{Deserialize, Serialize};

/// Reserved choice value meaning "other / free text supplied".
pub const OTHER_CHOICE: i64 = 99;

/// Reserved choice value meaning "intentionally skipped by branching".
pub const SKIPPED_CHOICE: i64 = -1;

/// `Choice::next_question` value meaning "fall through to the next question".
pub const NO_BRANCH: i64 = -1;

/// Multi-choice submissions arrive as `check0`..`check49` form fields.
pub const MAX_CHECKS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    /// 0-based ordinal within the questionnaire.
    pub position: i64,
    pub text: String,
    pub allows_other: bool,
    pub allows_image: bool,
    pub allows_multiple: bool,
    pub allows_observation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    /// 0-based ordinal within the question; submissions reference this.
    pub position: i64,
    pub text: String,
    pub image: Option<String>,
    /// Question position to jump to when selected; NO_BRANCH falls through.
    pub next_question: i64,
}

/// The (user, beneficiary) pair or user alone being surveyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Respondent {
    pub user_id: i64,
    pub beneficiary_id: Option<i64>,
}

impl Respondent {
    pub fn user(user_id: i64) -> Self {
        Self {
            user_id,
            beneficiary_id: None,
        }
    }

    pub fn beneficiary(user_id: i64, beneficiary_id: i64) -> Self {
        Self {
            user_id,
            beneficiary_id: Some(beneficiary_id),
        }
    }
}

/// One stored answer, at most one per (respondent, question).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: Option<i64>,
    pub user_id: i64,
    pub beneficiary_id: Option<i64>,
    pub question_id: i64,
    /// Selected choice index; OTHER_CHOICE and SKIPPED_CHOICE are reserved.
    pub choice: i64,
    /// Space-separated selected indices for multi-choice questions.
    pub multi_choices: Option<String>,
    pub other_text: Option<String>,
    pub observations: Option<String>,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Answer {
    /// Fresh answer record with the defaults a lazy get-or-create supplies.
    pub fn new(respondent: &Respondent, question_id: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            user_id: respondent.user_id,
            beneficiary_id: respondent.beneficiary_id,
            question_id,
            choice: 0,
            multi_choices: None,
            other_text: None,
            observations: None,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn respondent(&self) -> Respondent {
        Respondent {
            user_id: self.user_id,
            beneficiary_id: self.beneficiary_id,
        }
    }

    /// Stored multi-choice indices; entries that don't parse are dropped.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.multi_choices
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .filter_map(|token| token.parse().ok())
            .collect()
    }

    pub fn is_skipped(&self) -> bool {
        self.choice == SKIPPED_CHOICE && self.multi_choices.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: i64,
    /// Field worker account that registered this beneficiary.
    pub registered_by: i64,
    pub name: String,
    pub document_number: String,
    pub address: Option<String>,
    pub household_size: i64,
    pub dni_image: Option<String>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_indices_drops_garbage_tokens() {
        let mut answer = Answer::new(&Respondent::user(1), 1);
        answer.multi_choices = Some("0 2 x -3 14".to_string());
        assert_eq!(answer.selected_indices(), vec![0, 2, 14]);
    }

    #[test]
    fn selected_indices_empty_when_unset() {
        let answer = Answer::new(&Respondent::user(1), 1);
        assert!(answer.selected_indices().is_empty());
    }
}
