//! Conversation context carried into each webhook invocation.
//!
//! Holds the parameters the platform extracted from the current utterance,
//! the named contexts it carried over from earlier turns, and the download
//! URL of an attachment when the user sent a file.

use serde_json::{Map, Value};

/// Parameter names the dialogue agent extracts.
pub mod params {
    pub const REGISTRATION: &str = "matricula";
    pub const COURSE: &str = "id_curso";
    pub const SUBJECT_NUMBERS: &str = "number";
    /// Reported when the message carries no attachment URL.
    pub const DOWNLOAD_URL: &str = "downloadUrl";
}

/// A named bundle of parameters persisted across turns by the platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarriedContext {
    /// Full context name, usually a resource path ending in the short name.
    pub name: String,
    pub lifespan: Option<u32>,
    pub parameters: Map<String, Value>,
}

impl CarriedContext {
    pub fn new(name: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            lifespan: None,
            parameters,
        }
    }

    /// Text value of a parameter; empty strings count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.parameters.get(key).and_then(value_as_text)
    }

    /// Numeric list value of a parameter; empty lists count as absent.
    pub fn numbers(&self, key: &str) -> Option<Vec<f64>> {
        self.parameters.get(key).and_then(value_as_numbers)
    }
}

/// Everything a handler may read about the current turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationContext {
    session: Option<String>,
    parameters: Map<String, Value>,
    contexts: Vec<CarriedContext>,
    attachment_url: Option<String>,
}

impl ConversationContext {
    pub fn new(parameters: Map<String, Value>) -> Self {
        Self {
            parameters,
            ..Default::default()
        }
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    pub fn with_context(mut self, context: CarriedContext) -> Self {
        self.contexts.push(context);
        self
    }

    pub fn with_attachment_url(mut self, url: impl Into<String>) -> Self {
        self.attachment_url = Some(url.into());
        self
    }

    /// Platform session path, when the platform sent one.
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Text value of a parameter of the current turn.
    pub fn parameter(&self, key: &str) -> Option<String> {
        self.parameters.get(key).and_then(value_as_text)
    }

    /// Numeric list value of a parameter of the current turn.
    pub fn parameter_numbers(&self, key: &str) -> Option<Vec<f64>> {
        self.parameters.get(key).and_then(value_as_numbers)
    }

    /// First carried context whose name contains `name`, ignoring case.
    pub fn context(&self, name: &str) -> Option<&CarriedContext> {
        let needle = name.to_lowercase();
        self.contexts
            .iter()
            .find(|c| c.name.to_lowercase().contains(&needle))
    }

    /// Download URL of the first attachment of the user's message.
    pub fn attachment_url(&self) -> Option<&str> {
        self.attachment_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_numbers(value: &Value) -> Option<Vec<f64>> {
    let numbers: Vec<f64> = match value {
        Value::Array(items) => items.iter().filter_map(value_as_number).collect(),
        other => value_as_number(other).into_iter().collect(),
    };
    if numbers.is_empty() {
        None
    } else {
        Some(numbers)
    }
}

fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn parameter_trims_and_skips_empty_strings() {
        let ctx = ConversationContext::new(params(json!({"matricula": " a1 ", "id_curso": ""})));
        assert_eq!(ctx.parameter("matricula"), Some("a1".to_string()));
        assert_eq!(ctx.parameter("id_curso"), None);
        assert_eq!(ctx.parameter("missing"), None);
    }

    #[test]
    fn numeric_parameters_render_as_text() {
        let ctx = ConversationContext::new(params(json!({"matricula": 2019001})));
        assert_eq!(ctx.parameter("matricula"), Some("2019001".to_string()));
    }

    #[test]
    fn numbers_accept_lists_scalars_and_numeric_strings() {
        let ctx = ConversationContext::new(params(json!({
            "list": [0, 2.0, "3", "x"],
            "scalar": 4,
            "empty": []
        })));
        assert_eq!(ctx.parameter_numbers("list"), Some(vec![0.0, 2.0, 3.0]));
        assert_eq!(ctx.parameter_numbers("scalar"), Some(vec![4.0]));
        assert_eq!(ctx.parameter_numbers("empty"), None);
    }

    #[test]
    fn context_lookup_matches_suffix_case_insensitively() {
        let ctx = ConversationContext::default().with_context(CarriedContext::new(
            "projects/p/agent/sessions/s/contexts/novaisencao",
            params(json!({"id_curso": "bcc"})),
        ));
        let carried = ctx.context("NovaIsencao").unwrap();
        assert_eq!(carried.text("id_curso"), Some("bcc".to_string()));
        assert!(ctx.context("ReceberMateria").is_none());
    }

    #[test]
    fn blank_attachment_url_counts_as_absent() {
        let ctx = ConversationContext::default().with_attachment_url("  ");
        assert_eq!(ctx.attachment_url(), None);
    }
}
