//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL (JWT_SECRET optional)
//!
//! Run with: cargo test -p integration-tests --test api_tests
//!
//! Every user in the database is a member of every channel, so tests that
//! run in parallel notify each other's users. Assertions about unread
//! notifications are therefore scoped to the test's own channel.

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer, TestUser,
};
use reqwest::StatusCode;

async fn unread_in(server: &TestServer, user: &TestUser, channel: &str) -> Vec<Notification> {
    let response = server
        .get_auth(&format!("/api/v1/users/@me/notifications?channel_id={channel}"), &user.token)
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn send(server: &TestServer, user: &TestUser, channel: &str, content: &str) -> SentMessage {
    let response = server
        .post_auth(
            &format!("/api/v1/channels/{channel}/messages"),
            &user.token,
            &MessageBody::new(content),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn typists(server: &TestServer, user: &TestUser, channel: &str) -> Vec<String> {
    let response = server
        .get_auth(&format!("/api/v1/channels/{channel}/typing"), &user.token)
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Identity Tests
// ============================================================================

#[tokio::test]
async fn test_request_without_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/v1/users/@me/notifications").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_token_for_missing_user() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let token = server.token_for_unknown_user().unwrap();

    let response = server
        .get_auth("/api/v1/users/@me/notifications", &token)
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_garbage_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server
        .get_auth("/api/v1/users/@me/notifications", "not-a-jwt")
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Typing Tests
// ============================================================================

#[tokio::test]
async fn test_typing_visible_to_others_only() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let channel = server.create_channel("typing").await.unwrap().to_string();
    let alice = server.create_user(Some("  Alice  ")).await.unwrap();
    let bob = server.create_user(Some("Bob")).await.unwrap();
    let path = format!("/api/v1/channels/{channel}/typing");

    let response = server
        .post_auth(&path, &alice.token, &TypingBody { is_typing: true })
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // Refresh must not duplicate
    let response = server
        .post_auth(&path, &alice.token, &TypingBody { is_typing: true })
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    assert_eq!(typists(&server, &bob, &channel).await, vec!["Alice".to_string()]);
    assert!(typists(&server, &alice, &channel).await.is_empty());
}

#[tokio::test]
async fn test_stop_typing_is_idempotent() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let channel = server.create_channel("typing").await.unwrap().to_string();
    let alice = server.create_user(None).await.unwrap();
    let bob = server.create_user(Some("Bob")).await.unwrap();
    let path = format!("/api/v1/channels/{channel}/typing");

    server
        .post_auth(&path, &alice.token, &TypingBody { is_typing: true })
        .await
        .unwrap();
    assert_eq!(typists(&server, &bob, &channel).await, vec!["Anonymous".to_string()]);

    for _ in 0..2 {
        let response = server
            .post_auth(&path, &alice.token, &TypingBody { is_typing: false })
            .await
            .unwrap();
        assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    }

    assert!(typists(&server, &bob, &channel).await.is_empty());
}

// ============================================================================
// Message and Notification Tests
// ============================================================================

#[tokio::test]
async fn test_send_read_send_scenario() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let channel = server.create_channel("scenario").await.unwrap().to_string();
    let u1 = server.create_user(Some("U1")).await.unwrap();
    let u2 = server.create_user(Some("U2")).await.unwrap();

    let m1 = send(&server, &u1, &channel, "first").await;
    assert_eq!(m1.channel_id, channel);
    assert_eq!(m1.author_id, u1.id.to_string());
    assert!(matches!(m1.notifications, FanOut::Delivered { .. }));

    let unread = unread_in(&server, &u2, &channel).await;
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].message_id, m1.id);
    assert_eq!(unread[0].author_id, u1.id.to_string());
    assert!(!unread[0].is_read);
    assert_eq!(unread[0].kind, "new_message");

    // The author is never notified about their own message
    assert!(unread_in(&server, &u1, &channel).await.is_empty());

    let response = server
        .post_auth_empty(&format!("/api/v1/channels/{channel}/notifications/read"), &u2.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    assert!(unread_in(&server, &u2, &channel).await.is_empty());

    let m2 = send(&server, &u1, &channel, "second").await;
    let unread = unread_in(&server, &u2, &channel).await;
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].message_id, m2.id);
}

#[tokio::test]
async fn test_notifications_coalesce_per_channel() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let channel = server.create_channel("busy").await.unwrap().to_string();
    let author = server.create_user(Some("author")).await.unwrap();
    let reader = server.create_user(Some("reader")).await.unwrap();

    let first = send(&server, &author, &channel, "one").await;
    send(&server, &author, &channel, "two").await;
    send(&server, &author, &channel, "three").await;

    let unread = unread_in(&server, &reader, &channel).await;
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].message_id, first.id);
}

#[tokio::test]
async fn test_mark_channel_read_leaves_other_channels() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let a = server.create_channel("a").await.unwrap().to_string();
    let b = server.create_channel("b").await.unwrap().to_string();
    let author = server.create_user(Some("author")).await.unwrap();
    let reader = server.create_user(Some("reader")).await.unwrap();

    send(&server, &author, &a, "in a").await;
    send(&server, &author, &b, "in b").await;

    server
        .post_auth_empty(&format!("/api/v1/channels/{a}/notifications/read"), &reader.token)
        .await
        .unwrap();

    assert!(unread_in(&server, &reader, &a).await.is_empty());
    assert_eq!(unread_in(&server, &reader, &b).await.len(), 1);
}

#[tokio::test]
async fn test_mark_all_read() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let a = server.create_channel("a").await.unwrap().to_string();
    let b = server.create_channel("b").await.unwrap().to_string();
    let author = server.create_user(Some("author")).await.unwrap();
    let reader = server.create_user(Some("reader")).await.unwrap();

    send(&server, &author, &a, "in a").await;
    send(&server, &author, &b, "in b").await;

    let response = server
        .post_auth_empty("/api/v1/users/@me/notifications/read", &reader.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    assert!(unread_in(&server, &reader, &a).await.is_empty());
    assert!(unread_in(&server, &reader, &b).await.is_empty());
}

#[tokio::test]
async fn test_blank_message_rejected() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let channel = server.create_channel("blank").await.unwrap();
    let user = server.create_user(Some("user")).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/channels/{channel}/messages"),
            &user.token,
            &MessageBody::new(" \t "),
        )
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "EMPTY_CONTENT");
}

#[tokio::test]
async fn test_message_to_unknown_channel() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = server.create_user(Some("user")).await.unwrap();

    let response = server
        .post_auth("/api/v1/channels/1/messages", &user.token, &MessageBody::new("hi"))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_list_messages_oldest_first() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let channel = server.create_channel("history").await.unwrap().to_string();
    let user = server.create_user(Some("historian")).await.unwrap();

    send(&server, &user, &channel, "one").await;
    send(&server, &user, &channel, "two").await;

    let response = server
        .get_auth(&format!("/api/v1/channels/{channel}/messages?limit=10"), &user.token)
        .await
        .unwrap();
    let messages: Vec<ListedMessage> = assert_json(response, StatusCode::OK).await.unwrap();

    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["one", "two"]);
    assert_eq!(messages[0].author.name, "historian");
    assert_eq!(messages[0].author.id, user.id.to_string());
}
