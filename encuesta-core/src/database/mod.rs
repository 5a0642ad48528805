pub mod migrations;

use crate::models::{Answer, Beneficiary, Choice, Question, Respondent};
use crate::storage::{StorageError, SurveyStore};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub type DbConnection = Arc<Mutex<Connection>>;

pub struct Database {
    pub(crate) connection: DbConnection,
}

impl Database {
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        // Ensure directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(db_path)?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        migrations::run_survey_migrations(&mut conn)?;

        Ok(Database {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> DbConnection {
        self.connection.clone()
    }

    // Questionnaire definition

    pub fn create_question(
        &self,
        text: &str,
        allows_other: bool,
        allows_image: bool,
        allows_multiple: bool,
        allows_observation: bool,
    ) -> anyhow::Result<i64> {
        let conn = self.connection.lock().unwrap();
        let position: i64 = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;

        conn.execute(
            "INSERT INTO questions
                (position, question_text, allows_other, allows_image, allows_multiple, allows_observation)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                position,
                text,
                allows_other,
                allows_image,
                allows_multiple,
                allows_observation
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn create_choice(
        &self,
        question_id: i64,
        text: &str,
        image: Option<&str>,
        next_question: i64,
    ) -> anyhow::Result<i64> {
        let conn = self.connection.lock().unwrap();
        let position: i64 = conn.query_row(
            "SELECT COUNT(*) FROM choices WHERE question_id = ?1",
            params![question_id],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO choices (question_id, position, choice_text, image, next_question)
                VALUES (?1, ?2, ?3, ?4, ?5)",
            params![question_id, position, text, image, next_question],
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn get_questions(&self) -> anyhow::Result<Vec<Question>> {
        let conn = self.connection.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, position, question_text, allows_other, allows_image,
                    allows_multiple, allows_observation
                FROM questions
                ORDER BY position ASC",
        )?;

        let questions = stmt
            .query_map([], question_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(questions)
    }

    pub fn get_choices(&self, question_id: i64) -> anyhow::Result<Vec<Choice>> {
        let conn = self.connection.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, question_id, position, choice_text, image, next_question
                FROM choices
                WHERE question_id = ?1
                ORDER BY position ASC",
        )?;

        let choices = stmt
            .query_map([question_id], choice_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(choices)
    }

    // Answers

    pub fn get_answer(
        &self,
        respondent: &Respondent,
        question_id: i64,
    ) -> anyhow::Result<Option<Answer>> {
        let conn = self.connection.lock().unwrap();
        let answer = conn
            .query_row(
                "SELECT id, user_id, beneficiary_id, question_id, choice, multi_choices,
                        other_text, observations, image, created_at, updated_at
                    FROM answers
                    WHERE user_id = ?1 AND beneficiary_id IS ?2 AND question_id = ?3",
                params![respondent.user_id, respondent.beneficiary_id, question_id],
                answer_from_row,
            )
            .optional()?;
        Ok(answer)
    }

    pub fn insert_answer(
        &self,
        respondent: &Respondent,
        question_id: i64,
    ) -> anyhow::Result<Answer> {
        let mut answer = Answer::new(respondent, question_id);
        let conn = self.connection.lock().unwrap();

        conn.execute(
            "INSERT INTO answers
                (user_id, beneficiary_id, question_id, choice, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                answer.user_id,
                answer.beneficiary_id,
                answer.question_id,
                answer.choice,
                answer.created_at,
                answer.updated_at
            ],
        )?;

        answer.id = Some(conn.last_insert_rowid());
        Ok(answer)
    }

    pub fn update_answer(&self, answer: &Answer) -> anyhow::Result<()> {
        let id = answer
            .id
            .ok_or_else(|| anyhow::anyhow!("Answer ID required for update"))?;

        let conn = self.connection.lock().unwrap();
        conn.execute(
            "UPDATE answers
                SET choice = ?1, multi_choices = ?2, other_text = ?3,
                    observations = ?4, image = ?5, updated_at = ?6
                WHERE id = ?7",
            params![
                answer.choice,
                answer.multi_choices,
                answer.other_text,
                answer.observations,
                answer.image,
                answer.updated_at,
                id
            ],
        )?;

        Ok(())
    }

    pub fn get_answers_for(&self, respondent: &Respondent) -> anyhow::Result<Vec<Answer>> {
        let conn = self.connection.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, beneficiary_id, question_id, choice, multi_choices,
                    other_text, observations, image, created_at, updated_at
                FROM answers
                WHERE user_id = ?1 AND beneficiary_id IS ?2
                ORDER BY question_id ASC",
        )?;

        let answers = stmt
            .query_map(
                params![respondent.user_id, respondent.beneficiary_id],
                answer_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(answers)
    }

    pub fn get_respondents(&self) -> anyhow::Result<Vec<Respondent>> {
        let conn = self.connection.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT user_id, beneficiary_id
                FROM answers
                ORDER BY user_id ASC, beneficiary_id ASC",
        )?;

        let respondents = stmt
            .query_map([], |row| {
                Ok(Respondent {
                    user_id: row.get(0)?,
                    beneficiary_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(respondents)
    }

    // Beneficiary registry

    pub fn create_beneficiary(
        &self,
        registered_by: i64,
        name: &str,
        document_number: &str,
        address: Option<&str>,
        household_size: i64,
        dni_image: Option<&str>,
    ) -> anyhow::Result<i64> {
        let conn = self.connection.lock().unwrap();
        let now = chrono::Utc::now().timestamp();

        conn.execute(
            "INSERT INTO beneficiaries
                (registered_by, name, document_number, address, household_size, dni_image, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                registered_by,
                name,
                document_number,
                address,
                household_size,
                dni_image,
                now
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn get_beneficiary(&self, id: i64) -> anyhow::Result<Option<Beneficiary>> {
        let conn = self.connection.lock().unwrap();
        let beneficiary = conn
            .query_row(
                "SELECT id, registered_by, name, document_number, address,
                        household_size, dni_image, created_at
                    FROM beneficiaries
                    WHERE id = ?1",
                params![id],
                beneficiary_from_row,
            )
            .optional()?;
        Ok(beneficiary)
    }

    pub fn get_beneficiaries(&self) -> anyhow::Result<Vec<Beneficiary>> {
        let conn = self.connection.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, registered_by, name, document_number, address,
                    household_size, dni_image, created_at
                FROM beneficiaries
                ORDER BY created_at ASC",
        )?;

        let beneficiaries = stmt
            .query_map([], beneficiary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(beneficiaries)
    }
}

impl SurveyStore for Database {
    fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        self.get_questions()
            .map_err(|e| StorageError::OperationFailed(e.to_string()))
    }

    fn list_choices(&self, question_id: i64) -> Result<Vec<Choice>, StorageError> {
        self.get_choices(question_id)
            .map_err(|e| StorageError::OperationFailed(e.to_string()))
    }

    fn find_answer(
        &self,
        respondent: &Respondent,
        question_id: i64,
    ) -> Result<Option<Answer>, StorageError> {
        self.get_answer(respondent, question_id)
            .map_err(|e| StorageError::OperationFailed(e.to_string()))
    }

    fn create_answer(
        &self,
        respondent: &Respondent,
        question_id: i64,
    ) -> Result<Answer, StorageError> {
        self.insert_answer(respondent, question_id)
            .map_err(|e| StorageError::OperationFailed(e.to_string()))
    }

    fn save_answer(&self, answer: &Answer) -> Result<(), StorageError> {
        self.update_answer(answer)
            .map_err(|e| StorageError::OperationFailed(e.to_string()))
    }

    fn answers_for(&self, respondent: &Respondent) -> Result<Vec<Answer>, StorageError> {
        self.get_answers_for(respondent)
            .map_err(|e| StorageError::OperationFailed(e.to_string()))
    }

    fn list_respondents(&self) -> Result<Vec<Respondent>, StorageError> {
        self.get_respondents()
            .map_err(|e| StorageError::OperationFailed(e.to_string()))
    }
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        position: row.get(1)?,
        text: row.get(2)?,
        allows_other: row.get(3)?,
        allows_image: row.get(4)?,
        allows_multiple: row.get(5)?,
        allows_observation: row.get(6)?,
    })
}

fn choice_from_row(row: &Row<'_>) -> rusqlite::Result<Choice> {
    Ok(Choice {
        id: row.get(0)?,
        question_id: row.get(1)?,
        position: row.get(2)?,
        text: row.get(3)?,
        image: row.get(4)?,
        next_question: row.get(5)?,
    })
}

fn answer_from_row(row: &Row<'_>) -> rusqlite::Result<Answer> {
    Ok(Answer {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        beneficiary_id: row.get(2)?,
        question_id: row.get(3)?,
        choice: row.get(4)?,
        multi_choices: row.get(5)?,
        other_text: row.get(6)?,
        observations: row.get(7)?,
        image: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn beneficiary_from_row(row: &Row<'_>) -> rusqlite::Result<Beneficiary> {
    Ok(Beneficiary {
        id: row.get(0)?,
        registered_by: row.get(1)?,
        name: row.get(2)?,
        document_number: row.get(3)?,
        address: row.get(4)?,
        household_size: row.get(5)?,
        dni_image: row.get(6)?,
        created_at: row.get(7)?,
    })
}
