//! Subscription models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    #[serde(rename = "subscriberID")]
    pub subscriber_id: Uuid,
    #[serde(rename = "subscribedToID")]
    pub subscribed_to_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSubscriptionRequest {
    #[serde(rename = "subscriberID")]
    pub subscriber_id: Option<Uuid>,
    #[serde(rename = "subscribedToID")]
    pub subscribed_to_id: Option<Uuid>,
}
