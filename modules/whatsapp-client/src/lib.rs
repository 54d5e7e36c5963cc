pub mod error;
pub mod webhook;

pub use error::{Result, WhatsAppError};
pub use webhook::WebhookEvent;

use std::time::Duration;

use serde_json::json;
use tracing::debug;

const GRAPH_API_URL: &str = "https://graph.facebook.com/v20.0";

pub struct WhatsAppClient {
    http: reqwest::Client,
    access_token: String,
    phone_number_id: String,
    base_url: String,
}

impl WhatsAppClient {
    pub fn new(access_token: &str, phone_number_id: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            access_token: access_token.to_string(),
            phone_number_id: phone_number_id.to_string(),
            base_url: GRAPH_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Send a plain text message through the Cloud API.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<()> {
        let url = format!("{}/{}/messages", self.base_url, self.phone_number_id);

        let payload = json!({
            "messaging_product": "whatsapp",
            "to": remove_ninth_digit(to),
            "type": "text",
            "text": { "body": body },
        });

        debug!(to = %to, "Sending WhatsApp message");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(WhatsAppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Argentine numbers arrive from Meta as "549..." but the Cloud API only
/// delivers to the "54..." form. Strip the mobile '9' after the country code.
pub fn remove_ninth_digit(number: &str) -> String {
    if let Some(rest) = number.strip_prefix("549") {
        format!("54{rest}")
    } else {
        number.to_string()
    }
}
