use std::sync::Arc;

use permits_client_core::Client;
use permits_shared::uac::User;

pub use permits_test_helper::{no_cb, wait_until, Table, TestUser};

pub type TestApp = permits_test_helper::TestApp<Client>;

pub async fn spawn_app() -> TestApp {
    permits_test_helper::spawn_app(|address, api_key| Client::new(address, api_key.into())).await
}

pub async fn login_as(app: &TestApp, user: TestUser) -> Arc<User> {
    app.core_client
        .login(user.login_args(), no_cb)
        .await
        .unwrap()
        .unwrap()
}

/// Spawns an app with `user` already logged in
pub async fn spawn_app_as(user: TestUser) -> TestApp {
    let app = spawn_app().await;
    login_as(&app, user).await;
    app
}
