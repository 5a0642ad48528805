/// Create the questions and choices tables holding the questionnaire
pub fn migration() -> String {
    r#"
CREATE TABLE questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    position INTEGER NOT NULL,
    question_text TEXT NOT NULL,
    allows_other INTEGER NOT NULL DEFAULT 0,
    allows_image INTEGER NOT NULL DEFAULT 0,
    allows_multiple INTEGER NOT NULL DEFAULT 0,
    allows_observation INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_questions_position ON questions(position);

CREATE TABLE choices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    choice_text TEXT NOT NULL,
    image TEXT,
    next_question INTEGER NOT NULL DEFAULT -1,
    FOREIGN KEY (question_id) REFERENCES questions (id) ON DELETE CASCADE
);

CREATE INDEX idx_choices_question_position
    ON choices(question_id, position);
"#
    .to_string()
}
