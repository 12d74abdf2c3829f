//! Login and bearer token acceptance tests.

use axum::http::StatusCode;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

use shopping_cart_integration_tests::{JWT_SECRET, PASSWORD, TestContext};

fn signed_token(sub: &str, exp: i64) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": sub, "iat": exp - 3600, "exp": exp }),
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn login_returns_token() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post(
            "/api/login",
            None,
            json!({ "userName": "puterism", "password": PASSWORD }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["accessToken"].is_string());
    assert!(!response.body["accessToken"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_with_unknown_user_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post(
            "/api/login",
            None,
            json!({ "userName": "tiki", "password": PASSWORD }),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "존재하지 않는 유저입니다.");
}

#[tokio::test]
async fn login_with_wrong_password_is_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post(
            "/api/login",
            None,
            json!({ "userName": "puterism", "password": "not-the-password" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "비밀번호가 일치하지 않습니다.");
}

#[tokio::test]
async fn login_ignores_user_name_case() {
    let ctx = TestContext::new().await;

    let token = ctx.login("gwangyeol-iM").await;
    let response = ctx.get("/api/customers/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], json!(ctx.gwangyeol));
    assert_eq!(response.body["userName"], "gwangyeol-im");
}

#[tokio::test]
async fn me_with_invalid_token_is_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/api/customers/me", Some("invalid-token")).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "유효하지 않은 토큰입니다.");
}

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/api/customers/me", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "유효하지 않은 토큰입니다.");
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let ctx = TestContext::new().await;
    let token = signed_token(&ctx.puterism.to_string(), Utc::now().timestamp() - 60);

    let response = ctx.get("/api/customers/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn hand_signed_token_with_shared_secret_is_accepted() {
    let ctx = TestContext::new().await;
    let token = signed_token(&ctx.tanney.to_string(), Utc::now().timestamp() + 600);

    let response = ctx.get("/api/customers/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["userName"], "tanney-102");
}

#[tokio::test]
async fn token_for_deleted_customer_is_unauthorized() {
    let ctx = TestContext::new().await;
    let token = ctx.login("puterism").await;

    let deleted = ctx.delete("/api/customers/me", Some(&token)).await;
    let response = ctx.get("/api/customers/me", Some(&token)).await;

    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "유효하지 않은 토큰입니다.");
}

#[tokio::test]
async fn malformed_login_body_is_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send_raw(
            axum::http::Method::POST,
            "/api/login",
            None,
            Some(r#"{"userName": "puterism""#),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.message().is_empty());
}
