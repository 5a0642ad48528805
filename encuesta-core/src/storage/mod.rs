use crate::models::{Answer, Choice, Question, Respondent};

mod memory;

pub use memory::InMemoryStore;

/// Persistence contract the flow engine mutates through. Implementations:
/// the SQLite-backed [`crate::database::Database`] and [`InMemoryStore`]
/// for tests. Get-or-create races across concurrent requests are not
/// guarded here; last write wins.
pub trait SurveyStore: Send + Sync {
    /// Questionnaire in presentation order.
    fn list_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Choices of one question in presentation order.
    fn list_choices(&self, question_id: i64) -> Result<Vec<Choice>, StorageError>;

    fn find_answer(
        &self,
        respondent: &Respondent,
        question_id: i64,
    ) -> Result<Option<Answer>, StorageError>;

    /// Create the answer record with defaults and return it with its id set.
    fn create_answer(
        &self,
        respondent: &Respondent,
        question_id: i64,
    ) -> Result<Answer, StorageError>;

    fn save_answer(&self, answer: &Answer) -> Result<(), StorageError>;

    fn answers_for(&self, respondent: &Respondent) -> Result<Vec<Answer>, StorageError>;

    /// Every distinct respondent that stored at least one answer.
    fn list_respondents(&self) -> Result<Vec<Respondent>, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for StorageError {
    fn from(err: anyhow::Error) -> Self {
        StorageError::Other(err.to_string())
    }
}
