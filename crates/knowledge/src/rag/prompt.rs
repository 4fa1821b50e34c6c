//! Prompt rendering for augmented answers.

use handlebars::Handlebars;
use serde::Serialize;
use tutor_core::{AppError, AppResult};

/// Template for the augmented generation prompt.
pub const ANSWER_TEMPLATE: &str = "\
You are a teaching assistant for a data science course. Answer the student's question using the course materials below.

Course materials:
{{context}}

Student question: {{question}}

Give a clear, helpful answer. If the materials do not cover the question, say so and offer general guidance.";

#[derive(Serialize)]
struct PromptVars<'a> {
    question: &'a str,
    context: &'a str,
}

/// Render the generation prompt for a question and its composed context.
pub fn render_prompt(question: &str, context: &str) -> AppResult<String> {
    render_template(ANSWER_TEMPLATE, question, context)
}

fn render_template(template: &str, question: &str, context: &str) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("answer", template)
        .map_err(|e| AppError::Pipeline(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("answer", &PromptVars { question, context })
        .map_err(|e| AppError::Pipeline(format!("Failed to render template: {}", e)))
}
