//! Answer-coincidence report: among respondents who completed the
//! questionnaire, rank every other completed respondent by the percentage
//! of questions answered with the same choice value. Field coordinators use
//! this to cross-check suspiciously similar intakes.

use crate::flow::{first_unanswered, FlowError, Questionnaire};
use crate::models::Respondent;
use crate::storage::{StorageError, SurveyStore};
use std::cmp::Ordering;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct CoincidenceEntry {
    pub respondent: Respondent,
    /// 100 × matching questions / total questions.
    pub score: f64,
}

/// Scores ascending, so the most coincident respondents come last.
pub fn match_scores(
    store: &dyn SurveyStore,
    questionnaire: &Questionnaire,
    respondent: &Respondent,
) -> Result<Vec<CoincidenceEntry>, FlowError> {
    let total = questionnaire.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for other in store.list_respondents()? {
        if other == *respondent {
            continue;
        }
        // Only respondents that answered everything take part.
        if first_unanswered(store, questionnaire, &other)?.is_some() {
            continue;
        }

        let mut matching = 0usize;
        for question in questionnaire.questions() {
            let mine = stored_choice(store, respondent, question.id)?;
            let theirs = stored_choice(store, &other, question.id)?;
            if mine == theirs {
                matching += 1;
            }
        }

        entries.push(CoincidenceEntry {
            respondent: other,
            score: matching as f64 / total as f64 * 100.0,
        });
    }

    entries.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
    Ok(entries)
}

fn stored_choice(
    store: &dyn SurveyStore,
    respondent: &Respondent,
    question_id: i64,
) -> Result<i64, StorageError> {
    match store.find_answer(respondent, question_id)? {
        Some(answer) => Ok(answer.choice),
        None => {
            warn!(
                user_id = respondent.user_id,
                question_id, "no answer stored, counting as choice 0"
            );
            Ok(0)
        }
    }
}
