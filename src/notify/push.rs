//! Expo-style push notification delivery client.

use crate::errors::{Error, Result};
use serde_json::json;

/// Push delivery service client.
#[derive(Debug, Clone)]
pub struct PushClient {
    http: reqwest::Client,
    api_url: String,
}

impl PushClient {
    /// Creates a client for the given push endpoint.
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
        }
    }

    /// Sends one push notification to a device token.
    pub async fn send(&self, token: &str, body: &str) -> Result<()> {
        let payload = json!({
            "to": token,
            "title": "Fund update",
            "body": body,
            "sound": "default",
        });

        let response = self
            .http
            .post(&self.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Delivery {
                message: format!("push request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(Error::Delivery {
                message: format!("push service returned {}", response.status()),
            });
        }

        Ok(())
    }
}
