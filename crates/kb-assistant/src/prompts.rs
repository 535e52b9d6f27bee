//! Prompt templates for answering, summarising, keyword extraction and
//! content improvement.

use std::fmt::Write as _;

use kb_core::RetrievedArticle;

/// Articles included in an answer context.
pub const CONTEXT_ARTICLES: usize = 3;
/// Characters of each article's content included in the context.
pub const CONTEXT_CONTENT_CHARS: usize = 500;

/// Context block for answering: optional caller context, then the top articles.
///
/// The block is cut to `max_length` characters.
pub fn build_context(
    articles: &[RetrievedArticle],
    additional_context: Option<&str>,
    max_length: usize,
) -> String {
    let mut parts = Vec::default();

    if let Some(extra) = additional_context.filter(|extra| !extra.is_empty()) {
        parts.push(format!("Additional Context:\n{extra}\n"));
    }

    if !articles.is_empty() {
        parts.push("Relevant Knowledge Base Articles:\n".to_owned());
        for (index, article) in articles.iter().take(CONTEXT_ARTICLES).enumerate() {
            let excerpt: String = article.content.chars().take(CONTEXT_CONTENT_CHARS).collect();
            let mut part = String::default();
            // Writing to a String cannot fail.
            let _result = write!(part, "{}. {}\n{excerpt}...\n", index + 1, article.title);
            parts.push(part);
        }
    }

    let context = parts.join("\n");
    if context.chars().count() > max_length {
        context.chars().take(max_length).collect()
    } else {
        context
    }
}

/// Prompt asking the model to answer `question` from `context`.
pub fn answer_prompt(question: &str, context: &str) -> String {
    format!(
        "You are a helpful assistant for a customer support knowledge base. \n\
Use the provided context to answer the user's question accurately and helpfully.\n\
\n\
{context}\n\
\n\
Question: {question}\n\
\n\
Instructions:\n\
- Provide a clear, helpful answer based on the context\n\
- If the context doesn't contain enough information, say so\n\
- Be concise but complete\n\
- Use a friendly, professional tone\n\
- If relevant, reference specific articles or steps\n\
\n\
Answer:"
    )
}

/// Prompt asking for a one or two sentence article summary.
pub fn summary_prompt(title: &str, content: &str) -> String {
    format!(
        "Create a concise summary of the following knowledge base article.\n\
\n\
Title: {title}\n\
\n\
Content: {content}\n\
\n\
Instructions:\n\
- Create a 1-2 sentence summary\n\
- Capture the main purpose and key information\n\
- Use clear, professional language\n\
- Don't exceed 150 characters\n\
\n\
Summary:"
    )
}

/// Prompt asking for comma-separated search keywords.
pub fn keywords_prompt(title: &str, content: &str) -> String {
    format!(
        "Suggest relevant keywords for the following knowledge base article.\n\
\n\
Title: {title}\n\
\n\
Content: {content}\n\
\n\
Instructions:\n\
- Suggest 5-10 relevant keywords\n\
- Include technical terms, concepts, and searchable phrases\n\
- Separate keywords with commas\n\
- Focus on words users might search for\n\
\n\
Keywords:"
    )
}

/// Prompt asking the model to rewrite `content` according to `feedback`.
pub fn improvement_prompt(content: &str, feedback: &str) -> String {
    format!(
        "Improve the following knowledge base article content based on the feedback provided.\n\
\n\
Current Content:\n\
{content}\n\
\n\
Feedback:\n\
{feedback}\n\
\n\
Instructions:\n\
- Address the feedback concerns\n\
- Improve clarity and usefulness\n\
- Maintain the same structure and format\n\
- Keep the content accurate and professional\n\
\n\
Improved Content:"
    )
}
