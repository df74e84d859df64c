// Integration tests for HttpTransport against a mock HTTP server

use std::sync::Arc;

use fetchstate::prelude::*;
use mockito::{Matcher, Server};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Post {
    id: u32,
    title: String,
}

fn manager(cache: &RequestCache) -> FetchStateManager<Post> {
    let transport = HttpTransport::new().expect("client should build");
    FetchStateManager::new(cache.clone(), Arc::new(transport))
}

#[tokio::test]
async fn test_success_is_fetched_and_cached() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/posts/1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"title":"A"}"#)
        .expect(1)
        .create_async()
        .await;

    let cache = RequestCache::new();
    let mut manager = manager(&cache);
    let key = RequestKey::new(format!("{}/posts/1", server.url()));

    manager.bind(Some(key.clone())).await;
    assert_eq!(
        manager.current_state(),
        FetchState::Fetched(Post {
            id: 1,
            title: "A".to_string()
        })
    );
    assert!(cache.contains(&key));

    // served from the cache, the server sees one request
    assert!(manager.bind(Some(key)).is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_not_found_is_failed_and_not_cached() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/posts/2")
        .with_status(404)
        .create_async()
        .await;

    let cache = RequestCache::new();
    let mut manager = manager(&cache);
    let key = RequestKey::new(format!("{}/posts/2", server.url()));

    manager.bind(Some(key.clone())).await;

    let state = manager.current_state();
    let Some(FetchError::Transport(error)) = state.error() else {
        panic!("expected a transport failure, got {state:?}");
    };
    assert_eq!(error.status(), Some(404));
    assert_eq!(error.to_string(), "HTTP 404: Not Found");
    assert!(!cache.contains(&key));
}

#[tokio::test]
async fn test_malformed_body_is_decode_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/posts/3")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let cache = RequestCache::new();
    let mut manager = manager(&cache);
    let key = RequestKey::new(format!("{}/posts/3", server.url()));

    manager.bind(Some(key.clone())).await;

    let state = manager.current_state();
    assert!(state.error().is_some_and(FetchError::is_decode));
    assert!(!cache.contains(&key));
}

#[tokio::test]
async fn test_request_options_are_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/posts")
        .match_header("content-type", "application/json")
        .match_header("accept", "application/json")
        .match_header("user-agent", Matcher::Regex("^fetchstate/".to_string()))
        .match_body(Matcher::JsonString(r#"{"title":"B"}"#.to_string()))
        .with_status(201)
        .with_body(r#"{"id":101,"title":"B"}"#)
        .create_async()
        .await;

    let cache = RequestCache::new();
    let mut manager = manager(&cache);
    let key = RequestKey::new(format!("{}/posts", server.url())).with_options(
        RequestOptions::new("POST")
            .header("content-type", "application/json")
            .body(r#"{"title":"B"}"#),
    );

    manager.bind(Some(key)).await;

    mock.assert_async().await;
    assert_eq!(
        manager.current_state().data(),
        Some(&Post {
            id: 101,
            title: "B".to_string()
        })
    );
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    let cache = RequestCache::new();
    let mut manager = manager(&cache);
    // grab a free port, then close it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    let key = RequestKey::new(format!("http://127.0.0.1:{port}/posts/1"));

    manager.bind(Some(key)).await;

    let state = manager.current_state();
    assert!(
        matches!(
            state.error(),
            Some(FetchError::Transport(TransportError::Network(_)))
        ),
        "expected a network failure, got {state:?}"
    );
}
