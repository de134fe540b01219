//! Prompt template for context-grounded questions

/// Instruction that opens every prompt
pub const GROUNDING_INSTRUCTION: &str = "Use only the following context:";

/// Prompt builder for context-scoped queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Bind a question to the full document context in a single text prompt
    pub fn build_context_prompt(context: &str, question: &str) -> String {
        format!(
            "{instruction} {context} \n\n{question}",
            instruction = GROUNDING_INSTRUCTION,
            context = context,
            question = question,
        )
    }
}
