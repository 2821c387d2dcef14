//! Message handlers
//!
//! Endpoints for message operations.

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::dto::{
    CreateMessageRequest, ListMessagesQuery, MessageResponse, SentMessageResponse,
};
use chat_service::MessageService;

use crate::extractors::{AuthUser, ChannelIdPath, ValidatedJson, ValidatedQuery};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Get messages in channel
///
/// GET /channels/{channel_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
    ValidatedQuery(query): ValidatedQuery<ListMessagesQuery>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let channel_id = path.channel_id()?;

    let messages = MessageService::new(state.service_context())
        .list_messages(channel_id, query.limit())
        .await?;
    Ok(Json(messages))
}

/// Send a message; other members are notified as part of the request
///
/// POST /channels/{channel_id}/messages
pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
    ValidatedJson(request): ValidatedJson<CreateMessageRequest>,
) -> ApiResult<Created<Json<SentMessageResponse>>> {
    let channel_id = path.channel_id()?;

    let response = MessageService::new(state.service_context())
        .send_message(channel_id, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}
