//! Prompt templates for article drafting and the chat workflow.
//!
//! Plain string builders. The classification prompt constrains the model to
//! an enumerated label set; its output is still validated against the enum
//! before any branch is taken (see `chat`).

use crate::analysis::StyleProfile;

/// Build a prompt that expands one outline section into prose.
pub fn expand_section(section: &str, points: &str, outline: &str) -> String {
    format!(
        "You are a professional writer drafting an article section by section.\n\n\
         Expand the outline section \"{}\" into well-structured prose.\n\n\
         Points to cover:\n{}\n\n\
         Full outline for context:\n{}\n\n\
         Write 2-4 paragraphs of engaging, coherent prose for this section only. \
         Do not include the section heading; respond with the body text alone.",
        section, points, outline
    )
}

/// Build a prompt that rewrites an existing article section.
///
/// `instruction` is the user's steer; an empty instruction asks for a
/// general rewrite.
pub fn rewrite_section(section: &str, current_text: &str, instruction: &str) -> String {
    let mut prompt = format!(
        "You are a professional editor. Rewrite the article section \"{}\".\n\n\
         Current text:\n{}\n\n",
        section, current_text
    );

    if instruction.trim().is_empty() {
        prompt.push_str("Rewrite for clarity and flow while preserving the meaning.");
    } else {
        prompt.push_str(&format!("Follow this instruction: {}", instruction));
    }

    prompt.push_str("\n\nRespond with the rewritten body text alone, without the heading.");
    prompt
}

/// Build a prompt that polishes an existing article section.
pub fn improve_section(section: &str, current_text: &str) -> String {
    format!(
        "You are a professional editor. Improve the article section \"{}\": \
         tighten the prose, fix awkward phrasing, and strengthen transitions \
         without changing the substance.\n\n\
         Current text:\n{}\n\n\
         Respond with the improved body text alone, without the heading.",
        section, current_text
    )
}

/// Build a free-form review prompt with full project context.
pub fn review_with_context(
    request: &str,
    project_name: &str,
    outline: &str,
    article: &str,
    profile: &StyleProfile,
) -> String {
    let mut prompt = format!(
        "You are a professional writing consultant and editor. \
         A user has requested: \"{}\"\n\n\
         Project: {}\n\n\
         Here is the current outline:\n{}\n\n",
        request, project_name, outline
    );

    if article.trim().is_empty() {
        prompt.push_str("There is no article content yet - only the outline exists.\n\n");
    } else {
        prompt.push_str(&format!(
            "Here is the current article content:\n{}\n\n",
            article
        ));
    }

    if !profile.is_empty() {
        prompt.push_str(&format!(
            "Detected style elements: {}\nDetected process steps: {}\n\n",
            profile.style_elements.join(", "),
            profile.process_steps.join(", ")
        ));
    }

    prompt.push_str(
        "Provide a review based on the user's request. Consider structure and \
         organization, completeness of the outline, logical flow, clarity of \
         main points, gaps or missing elements, and style and tone consistency.\n\n\
         Format your response with sections for:\n\
         1. Overall Assessment\n\
         2. Strengths\n\
         3. Areas for Improvement\n\
         4. Specific Recommendations\n\
         5. Next Steps",
    );

    prompt
}

/// Build the action-classification prompt for a chat turn.
pub fn classify_action(user_input: &str) -> String {
    format!(
        "Classify the following user request into exactly one of these actions:\n\
         - research: the user wants information gathered on a topic\n\
         - direct_response: the user wants an answer or help with their draft\n\
         - end: the user wants to finish the conversation\n\n\
         User request: \"{}\"\n\n\
         Respond with only the action label, nothing else.",
        user_input
    )
}

/// Build a prompt that extracts the research topic from a request.
pub fn extract_topic(user_input: &str) -> String {
    format!(
        "Extract the research topic from this user input:\n\"{}\"\n\n\
         Respond with only the topic name.",
        user_input
    )
}

/// Build the research prompt for a topic.
pub fn research_topic(topic: &str) -> String {
    format!(
        "Research the topic: {}\n\n\
         Provide comprehensive information including key facts and statistics, \
         recent developments, relevant examples, and sources or references. \
         Format the findings as structured notes.",
        topic
    )
}

/// Build the response prompt summarizing completed research.
pub fn research_response(user_input: &str, topic: &str, findings: &str) -> String {
    format!(
        "Generate a helpful response about the research completed.\n\n\
         User request: \"{}\"\n\
         Research topic: {}\n\
         Research findings:\n{}\n\n\
         Summarize the key findings, suggest how this research could improve \
         the article, and offer specific recommendations for the outline. \
         Be helpful and actionable.",
        user_input, topic, findings
    )
}

/// Build a direct-response prompt from the session context.
pub fn context_response(user_input: &str, context: &str) -> String {
    format!(
        "Generate a helpful response to the user based on the current context.\n\n\
         User input: \"{}\"\n\n\
         Current context:\n{}\n\n\
         Provide a helpful, contextual response that addresses the user's request.",
        user_input, context
    )
}
