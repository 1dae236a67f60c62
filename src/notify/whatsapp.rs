//! Templated WhatsApp message delivery client.
//!
//! Thin wrapper over the provider's HTTP API: post a JSON payload, treat any
//! non-success status as a delivery failure. Retry policy lives in the outbox
//! worker, not here.

use crate::errors::{Error, Result};
use serde_json::json;

/// WhatsApp HTTP API client.
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl WhatsAppClient {
    /// Creates a client for the given API endpoint, with an optional bearer
    /// token.
    #[must_use]
    pub fn new(api_url: String, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            token,
        }
    }

    /// Sends one text message to a phone number.
    pub async fn send(&self, phone: &str, body: &str) -> Result<()> {
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": phone,
            "type": "text",
            "text": { "body": body },
        });

        let mut request = self.http.post(&self.api_url).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| Error::Delivery {
            message: format!("WhatsApp request failed: {e}"),
        })?;

        if !response.status().is_success() {
            return Err(Error::Delivery {
                message: format!("WhatsApp API returned {}", response.status()),
            });
        }

        Ok(())
    }
}
