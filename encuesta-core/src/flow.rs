//! Questionnaire flow engine: question sequencing, submission handling and
//! branch resolution.
//!
//! Branch resolution is a pure function over an immutable [`Questionnaire`]
//! snapshot; every write goes through the explicit [`SurveyStore`]
//! collaborator, so there is no hidden query state anywhere in the engine.

use crate::models::{
    Answer, Choice, Question, Respondent, MAX_CHECKS, OTHER_CHOICE, SKIPPED_CHOICE,
};
use crate::storage::{StorageError, SurveyStore};
use shared_types::survey::{ChoiceView, QuestionView};
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("question index {index} out of range (questionnaire has {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Ordered questions with their choices, fixed for the duration of one
/// respondent's traversal.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    questions: Vec<Question>,
    choices: Vec<Vec<Choice>>,
}

impl Questionnaire {
    pub fn new(questions: Vec<Question>, choices: Vec<Vec<Choice>>) -> Self {
        debug_assert_eq!(questions.len(), choices.len());
        Self { questions, choices }
    }

    pub fn load(store: &dyn SurveyStore) -> Result<Self, StorageError> {
        let questions = store.list_questions()?;
        let mut choices = Vec::with_capacity(questions.len());
        for question in &questions {
            choices.push(store.list_choices(question.id)?);
        }
        Ok(Self { questions, choices })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn choices(&self, index: usize) -> &[Choice] {
        self.choices.get(index).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Parsed submission for one question.
#[derive(Debug, Clone, Default)]
pub struct AnswerForm {
    pub choice: Option<String>,
    /// Checked multi-choice indices, already filtered to `check0..check49`.
    pub checks: Vec<usize>,
    pub other_text: Option<String>,
    pub observations: Option<String>,
    /// Stored image reference; the upload itself happens before submit.
    pub image: Option<String>,
}

/// Collect the checked indices out of raw `checkN` form fields. Keys that
/// are not `check0`..`check49` are ignored.
pub fn parse_checks(fields: &HashMap<String, String>) -> Vec<usize> {
    let mut checks: Vec<usize> = fields
        .keys()
        .filter_map(|key| key.strip_prefix("check"))
        .filter_map(|suffix| suffix.parse().ok())
        .filter(|index| *index < MAX_CHECKS)
        .collect();
    checks.sort_unstable();
    checks.dedup();
    checks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Next(usize),
    Completed,
}

/// Where sequencing goes after a submission: the literal next position
/// (possibly past the end) and the positions to auto-fill as skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextStep {
    pub target: usize,
    pub skipped: Range<usize>,
}

/// Index of the first question with no stored answer, strictly positional;
/// `None` once every question has one.
pub fn first_unanswered(
    store: &dyn SurveyStore,
    questionnaire: &Questionnaire,
    respondent: &Respondent,
) -> Result<Option<usize>, FlowError> {
    let answered: HashSet<i64> = store
        .answers_for(respondent)?
        .iter()
        .map(|answer| answer.question_id)
        .collect();

    for (index, question) in questionnaire.questions().iter().enumerate() {
        if !answered.contains(&question.id) {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub first_unanswered: Option<usize>,
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    pub fn completed(&self) -> bool {
        self.first_unanswered.is_none()
    }

    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.answered * 100 / self.total) as u8
    }
}

pub fn progress(
    store: &dyn SurveyStore,
    questionnaire: &Questionnaire,
    respondent: &Respondent,
) -> Result<Progress, FlowError> {
    let answered_ids: HashSet<i64> = store
        .answers_for(respondent)?
        .iter()
        .map(|answer| answer.question_id)
        .collect();

    let mut answered = 0;
    let mut first = None;
    for (index, question) in questionnaire.questions().iter().enumerate() {
        if answered_ids.contains(&question.id) {
            answered += 1;
        } else if first.is_none() {
            first = Some(index);
        }
    }

    Ok(Progress {
        first_unanswered: first,
        answered,
        total: questionnaire.len(),
    })
}

/// Read-only view of one question, pre-populated with any stored answer so
/// a resumed questionnaire shows the earlier state.
pub fn render(
    store: &dyn SurveyStore,
    questionnaire: &Questionnaire,
    respondent: &Respondent,
    index: usize,
) -> Result<QuestionView, FlowError> {
    let len = questionnaire.len();
    let question = questionnaire
        .question(index)
        .ok_or(FlowError::OutOfRange { index, len })?;

    let answer = store.find_answer(respondent, question.id)?;
    if let Some(answer) = &answer {
        debug!(question_id = question.id, choice = answer.choice, "found stored answer");
    }

    let choices = questionnaire
        .choices(index)
        .iter()
        .map(|choice| ChoiceView {
            index: choice.position as usize,
            text: choice.text.clone(),
            image: choice.image.clone(),
        })
        .collect();

    let state = progress(store, questionnaire, respondent)?;

    Ok(QuestionView {
        index,
        text: question.text.clone(),
        allows_other: question.allows_other,
        allows_image: question.allows_image,
        allows_multiple: question.allows_multiple,
        allows_observation: question.allows_observation,
        choices,
        has_answer: answer.is_some(),
        selection: answer.as_ref().map(|a| a.choice),
        multi_selections: answer
            .as_ref()
            .map(Answer::selected_indices)
            .unwrap_or_default(),
        other_text: answer.as_ref().and_then(|a| a.other_text.clone()),
        observation: answer.as_ref().and_then(|a| a.observations.clone()),
        progress_percent: state.percent(),
        is_first: index == 0,
        is_last: index + 1 == len,
    })
}

/// Pure branch resolution. When the single selection names a choice with a
/// `next_question` override, the target is taken literally: forward jumps
/// skip the questions in between, backward jumps are not filtered, and a
/// past-the-end target means the questionnaire is finished. Multi-choice
/// questions always fall through.
pub fn resolve_next(questionnaire: &Questionnaire, index: usize, selected: i64) -> NextStep {
    let fallthrough = NextStep {
        target: index + 1,
        skipped: index + 1..index + 1,
    };

    let Some(question) = questionnaire.question(index) else {
        return fallthrough;
    };
    if question.allows_multiple {
        return fallthrough;
    }

    let Ok(choice_index) = usize::try_from(selected) else {
        return fallthrough;
    };
    let Some(choice) = questionnaire.choices(index).get(choice_index) else {
        return fallthrough;
    };
    if choice.next_question < 0 {
        return fallthrough;
    }

    let target = choice.next_question as usize;
    let end = target.min(questionnaire.len()).max(index + 1);
    NextStep {
        target,
        skipped: index + 1..end,
    }
}

/// Record the submission for (respondent, question) and resolve where the
/// questionnaire goes next. Validation failures leave the store untouched.
pub fn submit(
    store: &dyn SurveyStore,
    questionnaire: &Questionnaire,
    respondent: &Respondent,
    index: usize,
    form: &AnswerForm,
) -> Result<SubmitOutcome, FlowError> {
    let len = questionnaire.len();
    let question = questionnaire
        .question(index)
        .ok_or(FlowError::OutOfRange { index, len })?;

    let (selected, multi) = if question.allows_multiple {
        if form.checks.is_empty() {
            return Err(FlowError::Validation(
                "No marcaste ninguna opción.".to_string(),
            ));
        }
        let joined = form
            .checks
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        (0, Some(joined))
    } else {
        let raw = form
            .choice
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| {
                FlowError::Validation("No elegiste ninguna opción.".to_string())
            })?;
        let selected: i64 = raw.parse().map_err(|_| {
            FlowError::Validation(format!("Opción inválida: {raw}"))
        })?;
        if selected == OTHER_CHOICE
            && form
                .other_text
                .as_deref()
                .map_or(true, |text| text.trim().is_empty())
        {
            return Err(FlowError::Validation(
                "Completá el texto de la opción \"Otro\".".to_string(),
            ));
        }
        (selected, None)
    };

    let now = chrono::Utc::now().timestamp();
    let mut answer = get_or_create(store, respondent, question.id)?;
    answer.choice = selected;
    answer.multi_choices = multi;
    answer.other_text = form.other_text.clone();
    answer.observations = form.observations.clone();
    if let Some(image) = &form.image {
        answer.image = Some(image.clone());
    }
    answer.updated_at = now;
    store.save_answer(&answer)?;

    debug!(
        question_id = question.id,
        user_id = respondent.user_id,
        choice = selected,
        "recorded answer"
    );

    let step = resolve_next(questionnaire, index, selected);
    for skip_index in step.skipped.clone() {
        let skipped_question = &questionnaire.questions()[skip_index];
        let mut skipped = get_or_create(store, respondent, skipped_question.id)?;
        skipped.choice = SKIPPED_CHOICE;
        skipped.multi_choices = None;
        skipped.updated_at = now;
        store.save_answer(&skipped)?;
    }

    if step.target >= len {
        Ok(SubmitOutcome::Completed)
    } else {
        Ok(SubmitOutcome::Next(step.target))
    }
}

fn get_or_create(
    store: &dyn SurveyStore,
    respondent: &Respondent,
    question_id: i64,
) -> Result<Answer, StorageError> {
    match store.find_answer(respondent, question_id)? {
        Some(answer) => Ok(answer),
        None => store.create_answer(respondent, question_id),
    }
}
