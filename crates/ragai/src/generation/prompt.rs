//! Prompt templates for RAG generation

use crate::providers::RetrievedChunk;

/// Separator placed between retrieved chunks in the context block
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Instructions prepended to every question
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions based on the provided context. \n\
If the context doesn't contain information to answer the question, say you don't have enough information.\n\
Keep your answers concise and relevant to the question.";

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunk texts, best match first
    pub fn build_context(results: &[RetrievedChunk]) -> String {
        results
            .iter()
            .map(|result| result.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }

    /// Build the single-turn prompt sent to the generator
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            "{}\n\nContext:\n{}\n\nQuestion: {}\n\nProvide a helpful answer based on the context above.",
            SYSTEM_PROMPT, context, question
        )
    }
}
