//! Subscription handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::CreateSubscriptionRequest,
    state::AppState,
};

const SUBSCRIPTION_NOT_FOUND: &str = "Subscription not found";

pub async fn create_subscription(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubscriptionRequest>,
) -> ApiResult<impl IntoResponse> {
    let (Some(subscriber_id), Some(subscribed_to_id)) =
        (payload.subscriber_id, payload.subscribed_to_id)
    else {
        return Err(ApiError::bad_request(
            "subscriberID and subscribedToID are required",
        ));
    };

    if subscriber_id == subscribed_to_id {
        return Err(ApiError::bad_request("You cannot subscribe to yourself"));
    }

    let subscription = state
        .subscriptions
        .create(subscriber_id, subscribed_to_id)
        .await?
        .ok_or_else(|| {
            warn!(
                "Duplicate subscription {} -> {}",
                subscriber_id, subscribed_to_id
            );
            ApiError::bad_request("Subscription already exists")
        })?;

    info!("{} subscribed to {}", subscriber_id, subscribed_to_id);
    Ok((StatusCode::CREATED, Json(subscription)))
}

pub async fn list_subscriptions(
    State(state): State<AppState>,
    Path(subscriber_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        state.subscriptions.list_for_subscriber(subscriber_id).await?,
    ))
}

pub async fn check_subscription(
    State(state): State<AppState>,
    Path((subscriber_id, subscribed_to_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    state
        .subscriptions
        .find(subscriber_id, subscribed_to_id)
        .await?
        .ok_or_else(|| ApiError::not_found(SUBSCRIPTION_NOT_FOUND))?;

    Ok(Json(json!({ "success": true, "subscribed": true })))
}

pub async fn delete_subscription(
    State(state): State<AppState>,
    Path((subscriber_id, subscribed_to_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    if !state
        .subscriptions
        .delete(subscriber_id, subscribed_to_id)
        .await?
    {
        return Err(ApiError::not_found(SUBSCRIPTION_NOT_FOUND));
    }

    info!("{} unsubscribed from {}", subscriber_id, subscribed_to_id);
    Ok(Json(json!({ "message": "Unsubscribed successfully" })))
}
