//! The fixed classification instruction template.

/// System instructions sent with every classification request.
///
/// The template demands a JSON-only reply so the parser in [`crate::parse`]
/// can treat anything else as a fault.
pub const SYSTEM_PROMPT: &str = r#"You are an intent classifier for a task management system.

Analyze the user's input and determine their intent:
- CREATE: User wants to create a new task
- UPDATE: User wants to update an existing task (must mention task ID like TASK-0001)
- ESCALATE: Issue is complex, unclear, or requires human judgment

You must respond with ONLY valid JSON, no other text.

Example response format:
{
    "intent": "CREATE",
    "reasoning": "User wants to create a new task with high priority",
    "extracted_data": {
        "task_id": null,
        "title": "Review Q4 financial reports",
        "description": "Comprehensive review of Q4 financials",
        "priority": "high",
        "status": null
    }
}

Rules:
- intent must be exactly one of: CREATE, UPDATE, or ESCALATE
- For CREATE: task_id should be null, include title and description
- For UPDATE: task_id must be provided (format: TASK-XXXX)
- For ESCALATE: use when request is unclear or complex
- priority: low, medium, or high (if mentioned)
- status: pending, in_progress, or completed (if mentioned)

Respond with ONLY the JSON object, nothing else."#;

/// Wrap the user's text as the request prompt.
pub fn user_prompt(input: &str) -> String {
    format!("User input: {}", input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_carries_the_input() {
        assert_eq!(user_prompt("do a thing"), "User input: do a thing");
    }

    #[test]
    fn test_template_names_all_three_intents() {
        for intent in ["CREATE", "UPDATE", "ESCALATE"] {
            assert!(SYSTEM_PROMPT.contains(intent));
        }
    }
}
