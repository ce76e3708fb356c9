//! Prompt construction for feedback summaries

use crate::types::FeedbackRecord;

/// Instruction placed ahead of the feedback lines
pub const SUMMARY_INSTRUCTION: &str =
    "Summarize the following user feedback into top themes and improvement suggestions:\n\n";

/// Build the summary prompt: the instruction, then one `- <text>` line per
/// record in the order given.
pub fn build_summary_prompt(records: &[FeedbackRecord]) -> String {
    let mut prompt = String::from(SUMMARY_INSTRUCTION);

    for record in records {
        prompt.push_str("- ");
        prompt.push_str(&record.text);
        prompt.push('\n');
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: i64, text: &str) -> FeedbackRecord {
        FeedbackRecord {
            id,
            user: String::new(),
            text: text.to_string(),
            category: "other".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_prompt_is_instruction_only() {
        assert_eq!(build_summary_prompt(&[]), SUMMARY_INSTRUCTION);
    }

    #[test]
    fn test_lines_follow_record_order() {
        let prompt = build_summary_prompt(&[record(2, "newer"), record(1, "older")]);
        assert_eq!(
            prompt,
            format!("{}- newer\n- older\n", SUMMARY_INSTRUCTION)
        );
    }
}
