/// Placeholder a prompt file can use to refer to its own filename.
pub const SYSTEM_PROMPT_FILENAME_PLACEHOLDER: &str = "{{SYSTEM_PROMPT_FILENAME}}";

/// Fill in the system prompt placeholders.
///
/// Prompt files are free-form markdown, so this is a literal substitution and any
/// other braces in the prompt are left untouched.
pub fn render_system_prompt(template: &str, filename: &str) -> String {
    template.replace(SYSTEM_PROMPT_FILENAME_PLACEHOLDER, filename)
}
