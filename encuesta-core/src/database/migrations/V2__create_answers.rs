/// Create the answers table, one record per (respondent, question)
pub fn migration() -> String {
    r#"
CREATE TABLE answers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    beneficiary_id INTEGER,
    question_id INTEGER NOT NULL,
    choice INTEGER NOT NULL DEFAULT 0,
    multi_choices TEXT,
    other_text TEXT,
    observations TEXT,
    image TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    FOREIGN KEY (question_id) REFERENCES questions (id) ON DELETE CASCADE
);

CREATE INDEX idx_answers_respondent
    ON answers(user_id, beneficiary_id);

CREATE INDEX idx_answers_question ON answers(question_id);
"#
    .to_string()
}
