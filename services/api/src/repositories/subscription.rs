//! Subscription repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::SubscriptionStore;
use crate::models::Subscription;

/// Subscription repository
#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new subscription repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for SubscriptionRepository {
    async fn create(
        &self,
        subscriber_id: Uuid,
        subscribed_to_id: Uuid,
    ) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (subscriber_id, subscribed_to_id)
            VALUES ($1, $2)
            ON CONFLICT (subscriber_id, subscribed_to_id) DO NOTHING
            RETURNING id, subscriber_id, subscribed_to_id, created_at
            "#,
        )
        .bind(subscriber_id)
        .bind(subscribed_to_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn list_for_subscriber(&self, subscriber_id: Uuid) -> Result<Vec<Subscription>> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, subscriber_id, subscribed_to_id, created_at
            FROM subscriptions
            WHERE subscriber_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    async fn find(
        &self,
        subscriber_id: Uuid,
        subscribed_to_id: Uuid,
    ) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, subscriber_id, subscribed_to_id, created_at
            FROM subscriptions
            WHERE subscriber_id = $1 AND subscribed_to_id = $2
            "#,
        )
        .bind(subscriber_id)
        .bind(subscribed_to_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn delete(&self, subscriber_id: Uuid, subscribed_to_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM subscriptions WHERE subscriber_id = $1 AND subscribed_to_id = $2",
        )
        .bind(subscriber_id)
        .bind(subscribed_to_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
