//! Notification entity - The delivery outbox.
//!
//! Business operations insert a Pending row in the same transaction as their
//! write; a background worker delivers it and marks it Sent, or Failed once
//! the attempt bound is exhausted. A fund movement therefore never waits on,
//! or fails because of, a notification provider.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery channel for an outbox row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(12))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    /// Templated WhatsApp message to a phone number
    #[sea_orm(string_value = "WHATSAPP")]
    Whatsapp,
    /// Push notification to a device token
    #[sea_orm(string_value = "PUSH")]
    Push,
}

/// Delivery state of an outbox row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(12))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    /// Awaiting delivery
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Delivered
    #[sea_orm(string_value = "SENT")]
    Sent,
    /// Gave up after the bounded number of attempts
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

/// Notification database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Delivery channel
    pub channel: Channel,
    /// Phone number (WhatsApp) or device token (push)
    pub recipient: String,
    /// Rendered message body
    pub body: String,
    /// Delivery state
    pub status: DeliveryStatus,
    /// Delivery attempts made so far
    pub attempts: i32,
    /// Error from the most recent failed attempt
    pub last_error: Option<String>,
    /// When the row was enqueued
    pub created_at: DateTimeUtc,
    /// When the row was delivered
    pub sent_at: Option<DateTimeUtc>,
}

/// Notifications have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
