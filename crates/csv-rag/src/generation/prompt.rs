//! Context assembly and prompt templates

use crate::retrieval::IndexEntry;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join the rendered rows, one per line, in the order given
    pub fn build_context<'a, I>(entries: I) -> String
    where
        I: IntoIterator<Item = &'a IndexEntry>,
    {
        entries
            .into_iter()
            .map(|entry| entry.rendered_text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the question-answering prompt
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Context from CSV data:
{context}

Question: {question}
Answer:"#,
            context = context,
            question = question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Row;

    fn entry(text: &str) -> IndexEntry {
        IndexEntry::new(Row::new().with("text", text), text.to_string(), vec![0.0])
    }

    #[test]
    fn test_context_preserves_order() {
        let entries = vec![entry("b:2"), entry("a:1")];
        assert_eq!(PromptBuilder::build_context(&entries), "b:2\na:1");
    }

    #[test]
    fn test_empty_context() {
        let entries: Vec<IndexEntry> = Vec::new();
        assert_eq!(PromptBuilder::build_context(&entries), "");
    }

    #[test]
    fn test_prompt_contains_context_and_question() {
        let prompt = PromptBuilder::build_qa_prompt("who is 30", "name:Alice age:30");
        assert_eq!(
            prompt,
            "Context from CSV data:\nname:Alice age:30\n\nQuestion: who is 30\nAnswer:"
        );
    }
}
