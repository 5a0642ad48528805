use crate::models::{Answer, Choice, Question, Respondent};
use crate::storage::{StorageError, SurveyStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Store over plain maps, seeded with a fixed questionnaire. Used by unit
/// tests and anywhere a throwaway survey is needed.
#[derive(Clone)]
pub struct InMemoryStore {
    questions: Vec<Question>,
    choices: HashMap<i64, Vec<Choice>>,
    answers: Arc<Mutex<HashMap<(Respondent, i64), Answer>>>,
    respondents: Arc<Mutex<Vec<Respondent>>>,
    next_id: Arc<Mutex<i64>>,
}

impl InMemoryStore {
    pub fn new(questions: Vec<Question>, choices: Vec<Vec<Choice>>) -> Self {
        let choices = questions
            .iter()
            .zip(choices)
            .map(|(question, list)| (question.id, list))
            .collect();
        Self {
            questions,
            choices,
            answers: Arc::new(Mutex::new(HashMap::new())),
            respondents: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }
}

impl SurveyStore for InMemoryStore {
    fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        Ok(self.questions.clone())
    }

    fn list_choices(&self, question_id: i64) -> Result<Vec<Choice>, StorageError> {
        Ok(self
            .choices
            .get(&question_id)
            .cloned()
            .unwrap_or_default())
    }

    fn find_answer(
        &self,
        respondent: &Respondent,
        question_id: i64,
    ) -> Result<Option<Answer>, StorageError> {
        Ok(self
            .answers
            .lock()
            .unwrap()
            .get(&(*respondent, question_id))
            .cloned())
    }

    fn create_answer(
        &self,
        respondent: &Respondent,
        question_id: i64,
    ) -> Result<Answer, StorageError> {
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(StorageError::NotFound(format!(
                "question {question_id}"
            )));
        }

        let mut answer = Answer::new(respondent, question_id);
        let mut next_id = self.next_id.lock().unwrap();
        answer.id = Some(*next_id);
        *next_id += 1;

        let mut respondents = self.respondents.lock().unwrap();
        if !respondents.contains(respondent) {
            respondents.push(*respondent);
        }

        self.answers
            .lock()
            .unwrap()
            .insert((*respondent, question_id), answer.clone());
        Ok(answer)
    }

    fn save_answer(&self, answer: &Answer) -> Result<(), StorageError> {
        self.answers
            .lock()
            .unwrap()
            .insert((answer.respondent(), answer.question_id), answer.clone());
        Ok(())
    }

    fn answers_for(&self, respondent: &Respondent) -> Result<Vec<Answer>, StorageError> {
        let mut answers: Vec<Answer> = self
            .answers
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.respondent() == *respondent)
            .cloned()
            .collect();
        answers.sort_by_key(|a| a.question_id);
        Ok(answers)
    }

    fn list_respondents(&self) -> Result<Vec<Respondent>, StorageError> {
        Ok(self.respondents.lock().unwrap().clone())
    }
}
