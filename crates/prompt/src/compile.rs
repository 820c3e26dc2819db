//! Template compilation for resolved prompts.
//!
//! Registry prompts use `{{variable}}` placeholders. Compilation renders
//! them with Handlebars; every placeholder must have a value.

use handlebars::Handlebars;
use prompt_provider_core::{AppError, AppResult, ChatMessage};
use prompt_provider_registry::PromptContent;
use std::collections::HashMap;

/// Render the placeholders of a text prompt or of every chat message.
///
/// # Example
/// ```
/// use prompt_provider::{compile, PromptContent};
/// use std::collections::HashMap;
///
/// let content = PromptContent::Text("Summarize {{topic}}".to_string());
/// let mut vars = HashMap::new();
/// vars.insert("topic".to_string(), "Rust".to_string());
///
/// let compiled = compile(&content, &vars).unwrap();
/// assert_eq!(compiled.as_text(), Some("Summarize Rust"));
/// ```
pub fn compile(
    content: &PromptContent,
    variables: &HashMap<String, String>,
) -> AppResult<PromptContent> {
    let handlebars = template_engine();

    match content {
        PromptContent::Text(text) => Ok(PromptContent::Text(render(&handlebars, text, variables)?)),
        PromptContent::Chat(messages) => {
            let rendered = messages
                .iter()
                .map(|message| {
                    Ok(ChatMessage {
                        role: message.role.clone(),
                        content: render(&handlebars, &message.content, variables)?,
                    })
                })
                .collect::<AppResult<Vec<_>>>()?;
            Ok(PromptContent::Chat(rendered))
        }
    }
}

fn template_engine() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    // Prompts are plain text
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
}

fn render(
    handlebars: &Handlebars<'_>,
    template: &str,
    variables: &HashMap<String, String>,
) -> AppResult<String> {
    handlebars
        .render_template(template, variables)
        .map_err(|e| AppError::Template(format!("Failed to render prompt template: {}", e)))
}
