//! Inbound webhook envelope types for the WhatsApp Cloud API.
//!
//! Meta delivers messages wrapped in an entry/changes envelope keyed by
//! `object == "whatsapp_business_account"`. Only text messages matter here;
//! everything else (statuses, media, reactions) is ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: String,
    pub value: Option<ChangeValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub from: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<TextBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    pub body: String,
}

impl WebhookEvent {
    /// Flatten the envelope into (sender, text) pairs for text messages on
    /// the `messages` field. Non-WhatsApp events yield nothing.
    pub fn text_messages(&self) -> Vec<(String, String)> {
        if self.object != "whatsapp_business_account" {
            return Vec::new();
        }

        self.entry
            .iter()
            .flat_map(|entry| &entry.changes)
            .filter(|change| change.field == "messages")
            .filter_map(|change| change.value.as_ref())
            .flat_map(|value| &value.messages)
            .filter(|msg| msg.kind == "text")
            .filter_map(|msg| {
                msg.text
                    .as_ref()
                    .map(|t| (msg.from.clone(), t.body.clone()))
            })
            .collect()
    }
}
