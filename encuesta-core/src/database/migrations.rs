use refinery::embed_migrations;

// Embed migrations from the migrations directory
embed_migrations!("src/database/migrations");

/// Run the survey schema migrations on a database connection.
///
/// Tables:
/// - questions / choices: the questionnaire definition
/// - answers: one record per (respondent, question)
/// - beneficiaries: household registry used by the export columns
pub fn run_survey_migrations<C>(conn: &mut C) -> anyhow::Result<()>
where
    C: refinery::Migrate,
{
    migrations::runner().run(conn)?;
    Ok(())
}

/// Check if the survey tables exist in the database
pub fn has_survey_schema(conn: &rusqlite::Connection) -> anyhow::Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='questions'")?;
    Ok(stmt.exists([])?)
}
