//! Tabular answer dump: one row per respondent, fixed household columns
//! followed by one column per question. Spreadsheet formatting is left to
//! the consumer.

use crate::describe::{describe, DescribeOptions, FALLBACK};
use crate::flow::Questionnaire;
use crate::models::Beneficiary;
use crate::storage::{StorageError, SurveyStore};

#[derive(Debug, Clone)]
pub struct ExportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn export_table(
    store: &dyn SurveyStore,
    questionnaire: &Questionnaire,
    beneficiaries: &[Beneficiary],
    options: &DescribeOptions,
) -> Result<ExportTable, StorageError> {
    let mut header: Vec<String> = ["usuario", "beneficiario", "documento", "dirección", "integrantes"]
        .iter()
        .map(ToString::to_string)
        .collect();
    header.extend(questionnaire.questions().iter().map(|q| q.text.clone()));

    let mut rows = Vec::new();
    for respondent in store.list_respondents()? {
        let beneficiary = respondent
            .beneficiary_id
            .and_then(|id| beneficiaries.iter().find(|b| b.id == id));

        let mut row = vec![
            respondent.user_id.to_string(),
            beneficiary
                .map(|b| b.name.clone())
                .unwrap_or_else(|| FALLBACK.to_string()),
            beneficiary
                .map(|b| b.document_number.clone())
                .unwrap_or_else(|| FALLBACK.to_string()),
            beneficiary
                .and_then(|b| b.address.clone())
                .unwrap_or_else(|| FALLBACK.to_string()),
            beneficiary
                .map(|b| b.household_size.to_string())
                .unwrap_or_else(|| FALLBACK.to_string()),
        ];

        for (index, question) in questionnaire.questions().iter().enumerate() {
            let cell = match store.find_answer(&respondent, question.id)? {
                Some(answer) => describe(&answer, question, questionnaire.choices(index), options),
                None => FALLBACK.to_string(),
            };
            row.push(cell);
        }
        rows.push(row);
    }

    Ok(ExportTable { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{submit, AnswerForm};
    use crate::models::{Choice, Question, Respondent};
    use crate::storage::InMemoryStore;

    fn store() -> (InMemoryStore, Questionnaire) {
        let questions = vec![
            Question {
                id: 1,
                position: 0,
                text: "¿Tiene agua potable?".to_string(),
                allows_other: false,
                allows_image: false,
                allows_multiple: false,
                allows_observation: true,
            },
            Question {
                id: 2,
                position: 1,
                text: "¿Cómo se traslada?".to_string(),
                allows_other: true,
                allows_image: false,
                allows_multiple: false,
                allows_observation: false,
            },
        ];
        let choices = vec![
            vec![
                Choice {
                    id: 1,
                    question_id: 1,
                    position: 0,
                    text: "Sí".to_string(),
                    image: None,
                    next_question: -1,
                },
                Choice {
                    id: 2,
                    question_id: 1,
                    position: 1,
                    text: "No".to_string(),
                    image: None,
                    next_question: -1,
                },
            ],
            vec![Choice {
                id: 3,
                question_id: 2,
                position: 0,
                text: "Colectivo".to_string(),
                image: None,
                next_question: -1,
            }],
        ];
        let store = InMemoryStore::new(questions, choices);
        let questionnaire = Questionnaire::load(&store).unwrap();
        (store, questionnaire)
    }

    fn beneficiary() -> Beneficiary {
        Beneficiary {
            id: 8,
            registered_by: 1,
            name: "Ana Quiroga".to_string(),
            document_number: "30123456".to_string(),
            address: Some("B° Norte 123".to_string()),
            household_size: 4,
            dni_image: None,
            created_at: 0,
        }
    }

    #[test]
    fn one_row_per_respondent_with_question_columns() {
        let (store, questionnaire) = store();
        let paired = Respondent::beneficiary(1, 8);
        let alone = Respondent::user(2);

        submit(
            &store,
            &questionnaire,
            &paired,
            0,
            &AnswerForm {
                choice: Some("1".to_string()),
                ..AnswerForm::default()
            },
        )
        .unwrap();
        submit(
            &store,
            &questionnaire,
            &paired,
            1,
            &AnswerForm {
                choice: Some("99".to_string()),
                other_text: Some("Bicicleta".to_string()),
                ..AnswerForm::default()
            },
        )
        .unwrap();
        submit(
            &store,
            &questionnaire,
            &alone,
            0,
            &AnswerForm {
                choice: Some("0".to_string()),
                ..AnswerForm::default()
            },
        )
        .unwrap();

        let table = export_table(
            &store,
            &questionnaire,
            &[beneficiary()],
            &DescribeOptions::default(),
        )
        .unwrap();

        assert_eq!(table.header.len(), 5 + 2);
        assert_eq!(table.header[5], "¿Tiene agua potable?");
        assert_eq!(table.rows.len(), 2);

        let paired_row = &table.rows[0];
        assert_eq!(paired_row[0], "1");
        assert_eq!(paired_row[1], "Ana Quiroga");
        assert_eq!(paired_row[2], "30123456");
        assert_eq!(paired_row[4], "4");
        assert_eq!(paired_row[5], "No");
        assert_eq!(paired_row[6], "Otro: Bicicleta");

        // Respondent without a beneficiary: household columns are blanks,
        // the unanswered question renders as the placeholder.
        let alone_row = &table.rows[1];
        assert_eq!(alone_row[1], "-");
        assert_eq!(alone_row[5], "Sí");
        assert_eq!(alone_row[6], "-");
    }
}
