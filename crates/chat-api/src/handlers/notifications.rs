//! Notification handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chat_core::Snowflake;
use chat_service::dto::{NotificationResponse, UnreadNotificationsQuery};
use chat_service::NotificationService;

use crate::extractors::{AuthUser, ChannelIdPath};
use crate::response::{ApiError, ApiResult, NoContent};
use crate::state::AppState;

/// Unread notifications for the caller, optionally for one channel
///
/// GET /users/@me/notifications[?channel_id=]
pub async fn list_unread(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<UnreadNotificationsQuery>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let service = NotificationService::new(state.service_context());

    let unread = match query.channel_id.as_deref() {
        Some(raw) => {
            let channel_id = Snowflake::parse(raw)
                .map_err(|_| ApiError::invalid_query("Invalid channel_id format"))?;
            service.list_unread_for_channel(auth.user_id, channel_id).await?
        }
        None => service.list_unread(auth.user_id).await?,
    };

    Ok(Json(unread))
}

/// Mark the caller's notifications in a channel as read
///
/// POST /channels/{channel_id}/notifications/read
pub async fn mark_channel_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
) -> ApiResult<NoContent> {
    let channel_id = path.channel_id()?;

    NotificationService::new(state.service_context())
        .mark_channel_read(auth.user_id, channel_id)
        .await?;
    Ok(NoContent)
}

/// Mark all of the caller's notifications as read
///
/// POST /users/@me/notifications/read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NoContent> {
    NotificationService::new(state.service_context())
        .mark_all_read(auth.user_id)
        .await?;
    Ok(NoContent)
}
