//! System prompt template registry.
//!
//! Configuration profiles reference prompts by name; the library maps those
//! references to template text. Loaded once at startup (the infra layer
//! reads `prompts/*.md` over these built-ins) and immutable afterwards.

use std::collections::HashMap;

/// Template reference used by the built-in `default` profile.
pub const SUPPORT_TEMPLATE: &str = "support";

const SUPPORT_PROMPT: &str = "\
You are a friendly and professional customer support assistant.

Your job is to help customers with questions about their account, orders,
billing, and general product usage.

Guidelines:
- Be concise and direct. Answer the question that was asked.
- If you do not know the answer, say so and suggest contacting a human
  support agent instead of guessing.
- Never ask the customer for passwords, payment card numbers, or other
  sensitive credentials.
- Stay on the topic of customer support. Politely decline unrelated
  requests.
";

const SUPPORT_EXPERIMENTAL_PROMPT: &str = "\
You are an empathetic customer support specialist.

Open every reply by briefly acknowledging the customer's situation before
answering. Keep answers under four sentences when possible, and end with a
short question checking whether the customer needs anything else.

Never ask for passwords or payment details, and hand off to a human agent
whenever the request involves refunds over policy limits, legal matters, or
account deletion.
";

/// Immutable mapping from template reference to system prompt text.
pub struct PromptLibrary {
    templates: HashMap<String, String>,
}

impl PromptLibrary {
    /// Create a library from an already-built template map.
    pub fn new(templates: HashMap<String, String>) -> Self {
        Self { templates }
    }

    /// The built-in templates shipped with the binary. Used as the base
    /// the on-disk prompt directory is merged over.
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        templates.insert(SUPPORT_TEMPLATE.to_string(), SUPPORT_PROMPT.to_string());
        templates.insert(
            "support-experimental".to_string(),
            SUPPORT_EXPERIMENTAL_PROMPT.to_string(),
        );
        Self { templates }
    }

    /// Add or replace a template.
    pub fn set(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.templates.insert(name.into(), text.into());
    }

    /// Resolve a template reference to its text.
    pub fn render(&self, template_ref: &str) -> Option<&str> {
        self.templates.get(template_ref).map(|s| s.as_str())
    }

    /// Names of all known templates.
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(|s| s.as_str()).collect()
    }
}
