//! Prompt templates for LLM-backed relevance feedback.

/// Answer relevance: how relevant is the RESPONSE to the PROMPT.
pub const PR_RELEVANCE: &str = "You are a RELEVANCE grader; providing the relevance of the given RESPONSE to the given PROMPT.
Respond only as a number from 1 to 10 where 1 is the least relevant and 10 is the most relevant.

PROMPT: {prompt}

RESPONSE: {response}

RELEVANCE: ";

/// Context relevance: how relevant is the STATEMENT to the QUESTION.
pub const QS_RELEVANCE: &str = "You are a RELEVANCE grader; providing the relevance of the given STATEMENT to the given QUESTION.
Respond only as a number from 1 to 10 where 1 is the least relevant and 10 is the most relevant.

QUESTION: {prompt}

STATEMENT: {response}

RELEVANCE: ";

/// Chain-of-thought variant of answer relevance: the grader reasons first,
/// then reports the rating on a final `Score:` line.
pub const PR_RELEVANCE_COT: &str = "You are a RELEVANCE grader; providing the relevance of the given RESPONSE to the given PROMPT.
First list reasons why the RESPONSE is or is not relevant to the PROMPT.
Then rate the relevance from 1 to 10 where 1 is the least relevant and 10 is the most relevant, and give the rating on its own final line in the format: Score: <number>

PROMPT: {prompt}

RESPONSE: {response}
";

/// Chain-of-thought variant of context relevance.
pub const QS_RELEVANCE_COT: &str = "You are a RELEVANCE grader; providing the relevance of the given STATEMENT to the given QUESTION.
First list reasons why the STATEMENT is or is not relevant to the QUESTION.
Then rate the relevance from 1 to 10 where 1 is the least relevant and 10 is the most relevant, and give the rating on its own final line in the format: Score: <number>

QUESTION: {prompt}

STATEMENT: {response}
";

/// Substitute `{prompt}` and `{response}` placeholders in a template.
pub fn render(template: &str, prompt: &str, response: &str) -> String {
    template
        .replace("{prompt}", prompt)
        .replace("{response}", response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_both_placeholders() {
        let rendered = render(PR_RELEVANCE, "What is Rust?", "A systems language.");
        assert!(rendered.contains("PROMPT: What is Rust?"));
        assert!(rendered.contains("RESPONSE: A systems language."));
        assert!(!rendered.contains("{prompt}"));
        assert!(!rendered.contains("{response}"));
    }

    #[test]
    fn render_context_relevance() {
        let rendered = render(QS_RELEVANCE, "Q", "S");
        assert!(rendered.contains("QUESTION: Q"));
        assert!(rendered.contains("STATEMENT: S"));
    }

    #[test]
    fn cot_templates_request_score_line() {
        assert!(PR_RELEVANCE_COT.contains("Score: <number>"));
        assert!(QS_RELEVANCE_COT.contains("Score: <number>"));
    }

    #[test]
    fn render_leaves_unrelated_braces_alone() {
        let rendered = render("literal {braces} and {prompt}", "x", "y");
        assert_eq!(rendered, "literal {braces} and x");
    }
}
