/// Create the beneficiaries registry
pub fn migration() -> String {
    r#"
CREATE TABLE beneficiaries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    registered_by INTEGER NOT NULL,
    name TEXT NOT NULL,
    document_number TEXT NOT NULL,
    address TEXT,
    household_size INTEGER NOT NULL DEFAULT 1,
    dni_image TEXT,
    created_at INTEGER NOT NULL
);

CREATE INDEX idx_beneficiaries_document
    ON beneficiaries(document_number);
"#
    .to_string()
}
