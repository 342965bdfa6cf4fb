//! Prompt templates rendered with minijinja.

use crate::error::ConversationError;
use minijinja::{Environment, context};

/// Framing for an actor's first history entry.
pub const SYSTEM_MESSAGE_TEMPLATE: &str = "{{ behavior }}\n\n{{ company }}\n\n{{ persona }}";

/// One-shot prompt used to flesh out a named skillset.
pub const SKILLSET_TEMPLATE: &str = "Describe the following skillset in detail: {{ skillset }}";

fn render(template: &str, ctx: minijinja::Value) -> Result<String, ConversationError> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.add_template("prompt", template)?;
    let tmpl = env.get_template("prompt")?;
    Ok(tmpl.render(ctx)?)
}

/// Renders the system message from behavior, company and persona, in that
/// order, separated by blank lines.
pub fn render_system_message(
    behavior: &str,
    company: &str,
    persona: &str,
) -> Result<String, ConversationError> {
    render(
        SYSTEM_MESSAGE_TEMPLATE,
        context! { behavior => behavior, company => company, persona => persona },
    )
}

pub fn render_skillset_prompt(skillset: &str) -> Result<String, ConversationError> {
    render(SKILLSET_TEMPLATE, context! { skillset => skillset })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_concatenates_in_order() {
        let rendered = render_system_message("Be brief.", "Acme Corp.", "You are Ann.").unwrap();
        assert_eq!(rendered, "Be brief.\n\nAcme Corp.\n\nYou are Ann.");
    }

    #[test]
    fn test_system_message_keeps_text_verbatim() {
        // Persona text often contains braces and markup; it must not be re-parsed.
        let rendered = render_system_message("b", "c", "{{ not a var }} <b>bold</b>").unwrap();
        assert!(rendered.ends_with("{{ not a var }} <b>bold</b>"));
    }

    #[test]
    fn test_skillset_prompt() {
        let rendered = render_skillset_prompt("Alpine Hiking & Camping").unwrap();
        assert_eq!(
            rendered,
            "Describe the following skillset in detail: Alpine Hiking & Camping"
        );
    }
}
