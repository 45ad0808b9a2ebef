use permits_client_core::Client;

use crate::helpers::{no_cb, spawn_app};

#[tokio::test]
async fn health_check_works() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let actual = app.core_client.health_check(no_cb).await.unwrap();

    // Assert
    // Using unwrap so error shows instead of asserting `is_ok``
    actual.unwrap();
}

#[tokio::test]
async fn wrong_api_key_is_rejected() {
    // Arrange
    let app = spawn_app().await;
    let client = Client::new(app.address.clone(), "not-the-key".to_string().into());

    // Act
    let actual = client.health_check(no_cb).await.unwrap();

    // Assert
    assert_eq!(
        actual.unwrap_err().to_string(),
        "Invalid or missing API key."
    );
}
