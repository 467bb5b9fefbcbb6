mod common;

use bsky_session::bootstrap::create_client_loader;
use common::{client_metadata_body, metadata_mode_config};

/// A published metadata document yields a ready OAuth client.
#[tokio::test]
async fn test_metadata_bootstrap_succeeds() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/client_metadata.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(client_metadata_body())
        .create_async()
        .await;

    let config = metadata_mode_config(&server.url());
    let loader = create_client_loader(&config);

    let result = loader.load().await;
    assert!(result.is_ok(), "expected load to succeed: {:?}", result.err());
    mock.assert_async().await;
}

/// A missing document fails the load; nothing retries.
#[tokio::test]
async fn test_metadata_bootstrap_missing_document() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/client_metadata.json")
        .with_status(404)
        .create_async()
        .await;

    let config = metadata_mode_config(&server.url());
    let loader = create_client_loader(&config);

    let error = loader.load().await.err().expect("load should fail");
    assert!(error.contains("404"), "error should carry the status: {error}");
}

/// A malformed document fails the load with a parse diagnostic.
#[tokio::test]
async fn test_metadata_bootstrap_malformed_document() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/client_metadata.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{ not json")
        .create_async()
        .await;

    let config = metadata_mode_config(&server.url());
    let loader = create_client_loader(&config);

    let error = loader.load().await.err().expect("load should fail");
    assert!(
        error.contains("malformed"),
        "error should name the parse failure: {error}"
    );
}
