//! Server integration tests.
//!
//! These tests run the server on a real socket and drive the cookie flow
//! the way a browser would.

mod common;

use std::time::Duration;

use anyhow::Result;
use common::{TestServer, cookie_header, response_cookie};

#[tokio::test]
async fn test_server_health_returns_version() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.get("/health", None).await?;
    assert!(resp.status().is_success());

    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["status"], "ok");
    assert!(body.get("version").is_some());

    server.stop().await
}

#[tokio::test]
async fn test_counter_follows_cookie() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.get("/count", None).await?;
    let cookie = response_cookie(&resp).expect("first visit should set the session cookie");
    assert_eq!(cookie.name(), "gosessionid");
    assert_eq!(cookie.value().len(), 44);
    assert_eq!(resp.text().await?, "countnum: 1");

    let cookie = cookie_header(&cookie);
    let resp = server.get("/count", Some(&cookie)).await?;
    assert!(response_cookie(&resp).is_none());
    assert_eq!(resp.text().await?, "countnum: 2");

    // A different client starts its own counter.
    let resp = server.get("/count", None).await?;
    assert_eq!(resp.text().await?, "countnum: 1");

    server.stop().await
}

#[tokio::test]
async fn test_logout_resets_session() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.get("/count", None).await?;
    let cookie = cookie_header(&response_cookie(&resp).unwrap());
    server.get("/count", Some(&cookie)).await?;

    let resp = server.post("/logout", Some(&cookie)).await?;
    assert_eq!(resp.status().as_u16(), 204);
    let removal = response_cookie(&resp).unwrap();
    assert_eq!(removal.value(), "");
    assert_eq!(removal.max_age(), Some(time::Duration::ZERO));

    let resp = server.get("/count", Some(&cookie)).await?;
    assert_eq!(resp.text().await?, "countnum: 1");

    server.stop().await
}

#[tokio::test]
async fn test_gc_expires_idle_session() -> Result<()> {
    let server = TestServer::start_with_lifetime(1).await?;

    let resp = server.get("/count", None).await?;
    let cookie = cookie_header(&response_cookie(&resp).unwrap());

    // Idle past the lifetime, then let the next sweep run.
    tokio::time::sleep(Duration::from_millis(3200)).await;

    let resp = server.get("/health", None).await?;
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["active_sessions"], 0);

    let resp = server.get("/count", Some(&cookie)).await?;
    assert_eq!(resp.text().await?, "countnum: 1");

    server.stop().await
}

#[tokio::test]
async fn test_plain_cookie_routes() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.get("/set?name=theme&value=dark", None).await?;
    let cookie = response_cookie(&resp).unwrap();
    assert_eq!((cookie.name(), cookie.value()), ("theme", "dark"));

    let resp = server.get("/read", Some(&cookie_header(&cookie))).await?;
    assert_eq!(resp.text().await?, "theme: dark\n");

    server.stop().await
}

#[tokio::test]
async fn test_percent_encoded_token_decoded_once() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.get("/session", Some("gosessionid=a%2541")).await?;
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["id"], "a%41");

    let resp = server.post("/logout", Some("gosessionid=a%2541")).await?;
    assert_eq!(resp.status().as_u16(), 204);

    let resp = server.get("/health", None).await?;
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["active_sessions"], 0);

    server.stop().await
}
