//! Typing indicator handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::dto::TypingRequest;
use chat_service::PresenceService;

use super::now_ms;
use crate::extractors::{AuthUser, ChannelIdPath, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Start or stop typing in a channel
///
/// POST /channels/{channel_id}/typing
pub async fn set_typing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
    ValidatedJson(request): ValidatedJson<TypingRequest>,
) -> ApiResult<NoContent> {
    let channel_id = path.channel_id()?;

    PresenceService::new(state.service_context())
        .set_typing(
            channel_id,
            auth.user_id,
            Some(&auth.display_name),
            request.is_typing,
            now_ms(),
        )
        .await?;

    Ok(NoContent)
}

/// Names of the other users currently typing in a channel
///
/// GET /channels/{channel_id}/typing
pub async fn list_typists(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
) -> ApiResult<Json<Vec<String>>> {
    let channel_id = path.channel_id()?;
    let window = state.config().presence.active_window_ms;

    let names = PresenceService::new(state.service_context())
        .list_active_typists(channel_id, auth.user_id, now_ms(), window)
        .await?;

    Ok(Json(names))
}
