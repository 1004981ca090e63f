//! Prompt templates for answer generation and completeness review

use crate::types::RetrievedChunk;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the numbered context block from retrieved chunks, in retrieval order
    pub fn build_context(chunks: &[RetrievedChunk]) -> String {
        chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                format!(
                    "Document {} (Source: {}, Similarity: {:.2}):\n{}\n",
                    i + 1,
                    chunk.filename,
                    chunk.similarity_score,
                    chunk.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Prompt asking for a grounded answer plus a self-assessment
    pub fn answer_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You answer questions using only the documents provided below.
Read the documents carefully and give a complete answer to the question.

DOCUMENTS:
{context}

QUESTION: {question}

Reply with a single JSON object in exactly this shape:
{{
    "answer": "your answer, based on the documents",
    "confidence": 0.85,
    "missing_info": [
        {{
            "type": "document|data|context|specific_fact",
            "description": "the specific information that is missing",
            "suggested_action": "how someone could obtain it",
            "priority": 3
        }}
    ],
    "enrichment_suggestions": [
        {{
            "type": "document_type",
            "description": "the kind of document that would help",
            "action": "a concrete step to take",
            "confidence": 0.8,
            "estimated_effort": "low|medium|high"
        }}
    ]
}}

How to set confidence:
- Above 0.7 when the documents fully answer the question
- Between 0.4 and 0.7 when they answer it in part; say which parts are missing
- Below 0.4 when they say little about the question; be open about the limits

For missing_info, name exactly what is absent and why it matters (priority 1-5, 5 = most important).
For enrichment_suggestions, give steps someone can act on.
Do not rely on knowledge from outside the documents."#
        )
    }

    /// Prompt asking a reviewer to score an answer's completeness
    pub fn completeness_prompt(question: &str, answer: &str, context: &str) -> String {
        format!(
            r#"Review how completely the answer below addresses the question, given the documents that were available.

QUESTION: {question}

ANSWER: {answer}

AVAILABLE DOCUMENTS:
{context}

Score the completeness and list concrete gaps. Reply with a single JSON object:
{{
    "completeness_score": 0.85,
    "missing_aspects": [
        "an aspect of the question the answer does not cover"
    ],
    "confidence_issues": [
        "a part of the answer that is uncertain"
    ],
    "suggested_improvements": [
        "how the answer could be improved"
    ]
}}"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(filename: &str, score: f32, content: &str) -> RetrievedChunk {
        RetrievedChunk {
            id: format!("{}_chunk_0", filename),
            content: content.to_string(),
            similarity_score: score,
            filename: filename.to_string(),
            chunk_index: 0,
        }
    }

    #[test]
    fn test_build_context_format() {
        let context = PromptBuilder::build_context(&[
            chunk("a.pdf", 0.912, "First."),
            chunk("b.txt", 0.5, "Second."),
        ]);

        assert_eq!(
            context,
            "Document 1 (Source: a.pdf, Similarity: 0.91):\nFirst.\n\n\
             Document 2 (Source: b.txt, Similarity: 0.50):\nSecond.\n"
        );
        assert!(PromptBuilder::build_context(&[]).is_empty());
    }

    #[test]
    fn test_prompts_embed_inputs() {
        let answer = PromptBuilder::answer_prompt("How do I reset?", "CTX");
        assert!(answer.contains("QUESTION: How do I reset?"));
        assert!(answer.contains("CTX"));
        assert!(answer.contains("\"missing_info\""));

        let review = PromptBuilder::completeness_prompt("Q?", "The answer", "CTX");
        assert!(review.contains("ANSWER: The answer"));
        assert!(review.contains("\"completeness_score\""));
    }
}
