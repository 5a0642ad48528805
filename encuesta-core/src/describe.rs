//! Display rendering of stored answers, used by the export dump.
//!
//! This path is deliberately lossy: inconsistent stored state renders as a
//! fixed placeholder instead of failing, so one bad record never breaks a
//! whole export. Data-integrity checks belong in the flow engine, not here.

use crate::models::{Answer, Choice, Question, OTHER_CHOICE, SKIPPED_CHOICE};
use tracing::warn;

/// Placeholder for skipped answers and for records that cannot be rendered.
pub const FALLBACK: &str = "-";

/// Display options, passed explicitly by the caller (they come from the
/// service configuration).
#[derive(Debug, Clone)]
pub struct DescribeOptions {
    /// Label prefixing free-text "other" answers.
    pub other_label: String,
}

impl Default for DescribeOptions {
    fn default() -> Self {
        Self {
            other_label: "Otro".to_string(),
        }
    }
}

pub fn describe(
    answer: &Answer,
    question: &Question,
    choices: &[Choice],
    options: &DescribeOptions,
) -> String {
    match describe_inner(answer, question, choices, options) {
        Ok(text) => text,
        Err(reason) => {
            warn!(
                question_id = question.id,
                user_id = answer.user_id,
                reason, "answer not renderable, using placeholder"
            );
            FALLBACK.to_string()
        }
    }
}

fn describe_inner(
    answer: &Answer,
    question: &Question,
    choices: &[Choice],
    options: &DescribeOptions,
) -> Result<String, String> {
    let mut out = if question.allows_multiple {
        let mut out = String::new();
        // Out-of-range indices are dropped silently.
        for index in answer.selected_indices() {
            if let Some(choice) = choices.get(index) {
                out.push_str(&choice.text);
                out.push(' ');
            }
        }
        out
    } else if answer.choice == OTHER_CHOICE {
        format!(
            "{}: {}",
            options.other_label,
            answer.other_text.as_deref().unwrap_or_default()
        )
    } else if answer.choice == SKIPPED_CHOICE {
        FALLBACK.to_string()
    } else {
        let index = usize::try_from(answer.choice)
            .map_err(|_| format!("negative choice value {}", answer.choice))?;
        choices
            .get(index)
            .map(|choice| choice.text.clone())
            .ok_or_else(|| format!("choice index {index} has no choice"))?
    };

    if let Some(observation) = answer
        .observations
        .as_deref()
        .filter(|text| !text.trim().is_empty())
    {
        out.push_str(&format!(" ({observation})"));
    }
    Ok(out)
}
