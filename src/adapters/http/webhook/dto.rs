//! Dialogue platform fulfillment envelopes.
//!
//! Only the fields the webhook reads are modelled; everything else the
//! platform sends is ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::conversation::{CarriedContext, ConversationContext, Reply};

/// JSON pointer to the first attachment URL inside the messenger payload.
const ATTACHMENT_URL_POINTER: &str = "/data/message/attachments/0/payload/url";

// ════════════════════════════════════════════════════════════════════════════
// Request
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub response_id: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
    pub query_result: QueryResult,
    #[serde(default)]
    pub original_detect_intent_request: Option<OriginalDetectIntentRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub query_text: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    pub intent: IntentRef,
    #[serde(default)]
    pub output_contexts: Vec<OutputContext>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    #[serde(default)]
    pub name: Option<String>,
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputContext {
    pub name: String,
    #[serde(default)]
    pub lifespan_count: Option<u32>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OriginalDetectIntentRequest {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub payload: Value,
}

impl WebhookRequest {
    pub fn intent_name(&self) -> &str {
        &self.query_result.intent.display_name
    }

    /// First attachment URL of the user's message, if any.
    pub fn attachment_url(&self) -> Option<&str> {
        self.original_detect_intent_request
            .as_ref()?
            .payload
            .pointer(ATTACHMENT_URL_POINTER)?
            .as_str()
    }

    pub fn to_context(&self) -> ConversationContext {
        let mut ctx = ConversationContext::new(self.query_result.parameters.clone());
        if let Some(session) = &self.session {
            ctx = ctx.with_session(session.clone());
        }
        if let Some(url) = self.attachment_url() {
            ctx = ctx.with_attachment_url(url);
        }
        for output in &self.query_result.output_contexts {
            let mut carried = CarriedContext::new(output.name.clone(), output.parameters.clone());
            carried.lifespan = output.lifespan_count;
            ctx = ctx.with_context(carried);
        }
        ctx
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    /// First segment, for integrations that only show one message.
    pub fulfillment_text: String,
    pub fulfillment_messages: Vec<FulfillmentMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentMessage {
    pub text: TextMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessage {
    pub text: Vec<String>,
}

impl From<Reply> for WebhookResponse {
    fn from(reply: Reply) -> Self {
        let segments = reply.into_segments();
        Self {
            fulfillment_text: segments.first().cloned().unwrap_or_default(),
            fulfillment_messages: segments
                .into_iter()
                .map(|segment| FulfillmentMessage {
                    text: TextMessage {
                        text: vec![segment],
                    },
                })
                .collect(),
        }
    }
}

/// Error body for requests rejected before reaching the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_request() -> WebhookRequest {
        serde_json::from_value(json!({
            "responseId": "r-1",
            "session": "projects/p/agent/sessions/s",
            "queryResult": {
                "queryText": "here is the file",
                "parameters": {},
                "intent": {
                    "name": "projects/p/agent/intents/42",
                    "displayName": "ReceiveFile"
                },
                "outputContexts": [
                    {
                        "name": "projects/p/agent/sessions/s/contexts/novaisencao",
                        "lifespanCount": 4,
                        "parameters": {"matricula": "a1", "id_curso": "bcc"}
                    },
                    {
                        "name": "projects/p/agent/sessions/s/contexts/recebermateria",
                        "parameters": {"number": [0, 1]}
                    }
                ]
            },
            "originalDetectIntentRequest": {
                "source": "facebook",
                "payload": {"data": {"message": {"attachments": [
                    {"type": "file", "payload": {"url": "https://files.example/plan.pdf"}}
                ]}}}
            }
        }))
        .unwrap()
    }

    #[test]
    fn minimal_request_needs_only_the_intent() {
        let req: WebhookRequest = serde_json::from_value(json!({
            "queryResult": {"intent": {"displayName": "IniciarChat"}}
        }))
        .unwrap();
        assert_eq!(req.intent_name(), "IniciarChat");
        assert!(req.attachment_url().is_none());
        assert!(req.to_context().session().is_none());
    }

    #[test]
    fn context_carries_session_contexts_and_attachment() {
        let ctx = full_request().to_context();
        assert_eq!(ctx.session(), Some("projects/p/agent/sessions/s"));
        assert_eq!(ctx.attachment_url(), Some("https://files.example/plan.pdf"));

        let intake = ctx.context("NovaIsencao").unwrap();
        assert_eq!(intake.lifespan, Some(4));
        assert_eq!(intake.text("matricula"), Some("a1".to_string()));
        assert_eq!(
            ctx.context("ReceberMateria").unwrap().numbers("number"),
            Some(vec![0.0, 1.0])
        );
    }

    #[test]
    fn response_has_one_message_per_segment() {
        let reply = Reply::text("first");
        let response = WebhookResponse::from(reply);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "fulfillmentText": "first",
                "fulfillmentMessages": [{"text": {"text": ["first"]}}]
            })
        );
    }
}
