// ABOUTME: Integration tests for login, token checks and the password reset flow
// ABOUTME: Drives the API router in-process with a recording mailer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use common::{create_admin, TestServer, ADMIN_PASSWORD};
use helpers::axum_test::AxumTestRequest;

#[tokio::test]
async fn test_login_returns_token() {
    let server = TestServer::new().await;
    create_admin(server.database(), "admin@example.com").await;

    let body: Value = AxumTestRequest::post("/api/authenticate")
        .json(&json!({ "email": "admin@example.com", "password": ADMIN_PASSWORD }))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["error"], false);
    assert_eq!(body["message"], "token for admin@example.com created");
    let token = body["authentication_token"]["token"].as_str().unwrap();
    assert_eq!(token.len(), 26);
    assert!(body["authentication_token"]["expiry"].is_string());
    assert!(body["authentication_token"].get("hash").is_none());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let server = TestServer::new().await;
    create_admin(server.database(), "admin@example.com").await;

    for (email, password) in [
        ("admin@example.com", "wrong"),
        ("nobody@example.com", ADMIN_PASSWORD),
    ] {
        let body: Value = AxumTestRequest::post("/api/authenticate")
            .json(&json!({ "email": email, "password": password }))
            .send(server.router())
            .await
            .assert_status(StatusCode::UNAUTHORIZED)
            .json();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "invalid authentication credentials");
    }
}

#[tokio::test]
async fn test_login_rejects_malformed_json() {
    let server = TestServer::new().await;

    let body: Value = AxumTestRequest::post("/api/authenticate")
        .raw_json("{\"email\": ")
        .send(server.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_is_authenticated() {
    let server = TestServer::new().await;
    let token = server.admin_token().await;

    let body: Value = AxumTestRequest::post("/api/is-authenticated")
        .bearer(&token)
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["message"], "authenticated user admin@example.com");
}

#[tokio::test]
async fn test_is_authenticated_rejects_bad_headers() {
    let server = TestServer::new().await;
    let token = server.admin_token().await;

    let cases = [
        None,
        Some(format!("Basic {token}")),
        Some(format!("Bearer {token} extra")),
        Some("Bearer short".to_owned()),
        Some(format!("Bearer {}", "A".repeat(26))),
    ];
    for header in cases {
        let mut request = AxumTestRequest::post("/api/is-authenticated");
        if let Some(value) = &header {
            request = request.header("authorization", value);
        }
        request
            .send(server.router())
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_forgot_password_unknown_email() {
    let server = TestServer::new().await;

    let body: Value = AxumTestRequest::post("/api/forgot-password")
        .json(&json!({ "email": "nobody@example.com" }))
        .send(server.router())
        .await
        .assert_status(StatusCode::ACCEPTED)
        .json();
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "No matching email found on system");
    assert!(server.mailer.sent().is_empty());
}

/// Request a reset mail and return the signed link it carries
async fn request_reset_link(server: &TestServer) -> String {
    AxumTestRequest::post("/api/forgot-password")
        .json(&json!({ "email": "admin@example.com" }))
        .send(server.router())
        .await
        .assert_status(StatusCode::CREATED);

    let sent = server.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "admin@example.com");
    assert_eq!(sent[0].from, "info@widgets.local");
    assert_eq!(sent[0].template, "password-reset");

    sent[0]
        .body
        .lines()
        .find(|line| line.starts_with("http://localhost:4000/reset-password?"))
        .unwrap()
        .to_owned()
}

#[tokio::test]
async fn test_password_reset_flow() {
    let server = TestServer::new().await;
    create_admin(server.database(), "admin@example.com").await;

    let link = request_reset_link(&server).await;
    assert!(link.contains("&hash="));

    let body: Value = AxumTestRequest::post("/api/verify-reset-link")
        .json(&json!({ "link": link }))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["error"], false);
    let encrypted = body["email"].as_str().unwrap().to_owned();
    assert_ne!(encrypted, "admin@example.com");

    let body: Value = AxumTestRequest::post("/api/reset-password")
        .json(&json!({ "email": encrypted, "password": "new-password" }))
        .send(server.router())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(body["message"], "password changed");

    server.login("admin@example.com", "new-password").await;
    AxumTestRequest::post("/api/authenticate")
        .json(&json!({ "email": "admin@example.com", "password": ADMIN_PASSWORD }))
        .send(server.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_reset_link_is_rejected() {
    let server = TestServer::new().await;
    create_admin(server.database(), "admin@example.com").await;
    create_admin(server.database(), "other@example.com").await;

    let link = request_reset_link(&server).await;
    let tampered = link.replace("admin%40example.com", "other%40example.com");
    assert_ne!(tampered, link);

    AxumTestRequest::post("/api/verify-reset-link")
        .json(&json!({ "link": tampered }))
        .send(server.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expired_reset_link_is_rejected() {
    let server = TestServer::new().await;
    create_admin(server.database(), "admin@example.com").await;

    let link = server
        .resources
        .signer
        .sign_at(
            "http://localhost:4000/reset-password?email=admin%40example.com",
            Utc::now() - Duration::minutes(61),
        )
        .unwrap();

    let body: Value = AxumTestRequest::post("/api/verify-reset-link")
        .json(&json!({ "link": link }))
        .send(server.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["message"], "link expired");
}

#[tokio::test]
async fn test_reset_password_rejects_garbage_email() {
    let server = TestServer::new().await;

    AxumTestRequest::post("/api/reset-password")
        .json(&json!({ "email": "not-encrypted", "password": "new-password" }))
        .send(server.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reset_password_requires_password() {
    let server = TestServer::new().await;
    let encrypted = server.resources.encryption.encrypt("admin@example.com").unwrap();

    let body: Value = AxumTestRequest::post("/api/reset-password")
        .json(&json!({ "email": encrypted, "password": "" }))
        .send(server.router())
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .json();
    assert_eq!(body["errors"]["password"], "must be provided");
}
