//! Notification outbox and delivery clients.
//!
//! Business operations never talk to a notification provider directly: they
//! enqueue an outbox row inside their own transaction, and the worker in
//! [`outbox`] delivers it out of band. A fund movement is therefore never
//! blocked or failed by a provider outage.

/// Outbox persistence and the delivery worker
pub mod outbox;
/// Expo-style push delivery client
pub mod push;
/// Message body rendering
pub mod templates;
/// Templated WhatsApp delivery client
pub mod whatsapp;

use crate::config::settings::AppConfig;
use crate::entities::notification::Channel;
use crate::errors::Result;

/// Delivery seam between the outbox worker and the wire.
///
/// The production implementation is [`DeliveryClients`]; tests substitute a
/// recording sender.
pub trait NotificationSender: Send + Sync {
    /// Delivers one rendered message over the given channel.
    fn deliver(
        &self,
        channel: Channel,
        recipient: &str,
        body: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Production sender dispatching each channel to its client.
#[derive(Debug, Clone)]
pub struct DeliveryClients {
    whatsapp: whatsapp::WhatsAppClient,
    push: push::PushClient,
}

impl DeliveryClients {
    /// Builds the clients from runtime configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            whatsapp: whatsapp::WhatsAppClient::new(
                config.whatsapp_api_url.clone(),
                config.whatsapp_token.clone(),
            ),
            push: push::PushClient::new(config.push_api_url.clone()),
        }
    }
}

impl NotificationSender for DeliveryClients {
    async fn deliver(&self, channel: Channel, recipient: &str, body: &str) -> Result<()> {
        match channel {
            Channel::Whatsapp => self.whatsapp.send(recipient, body).await,
            Channel::Push => self.push.send(recipient, body).await,
        }
    }
}
