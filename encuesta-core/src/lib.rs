pub mod coincidence;
pub mod database;
pub mod describe;
pub mod export;
pub mod flow;
pub mod models;
pub mod storage;

pub use coincidence::{match_scores, CoincidenceEntry};
pub use database::Database;
pub use describe::{describe, DescribeOptions};
pub use export::{export_table, ExportTable};
pub use flow::{
    first_unanswered, parse_checks, progress, render, resolve_next, submit, AnswerForm, FlowError,
    Progress, Questionnaire, SubmitOutcome,
};
pub use models::{
    Answer, Beneficiary, Choice, Question, Respondent, MAX_CHECKS, NO_BRANCH, OTHER_CHOICE,
    SKIPPED_CHOICE,
};
pub use storage::{InMemoryStore, StorageError, SurveyStore};
