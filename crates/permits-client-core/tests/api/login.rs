use permits_client_core::Client;
use permits_shared::{
    errors::user_facing_message,
    req_args::{
        api::{ChangePasswordReqArgs, UpdateProfileReqArgs},
        LoginReqArgs, RegisterReqArgs,
    },
};
use secrecy::ExposeSecret as _;
use std::time::Duration;

use crate::helpers::{login_as, no_cb, spawn_app, spawn_app_as, TestUser};

#[tokio::test]
async fn login_failure_invalid_password() {
    // Arrange
    let app = spawn_app().await;
    let login_args = TestUser::ADMIN
        .login_args()
        .password("random-password".to_string().into());

    // Act
    let outcome = app.core_client.login(login_args, no_cb).await.unwrap();

    // Assert
    assert_eq!(
        outcome.unwrap_err().to_string(),
        "Unable to log in with provided credentials."
    );
    assert!(!app.core_client.is_logged_in());
}

#[tokio::test]
async fn login_logout_round_trip() {
    // Arrange
    let app = spawn_app().await;

    // Assert - Ensure not logged in
    assert!(
        !app.core_client.is_logged_in(),
        "should not be logged in before logging in"
    );

    // Act - Login
    let user = login_as(&app, TestUser::OFFICER).await;

    // Assert - Login successful and user info stored
    assert_eq!(user.username.as_ref(), TestUser::OFFICER.username);
    assert!(user.is_employee());
    assert!(app.core_client.is_logged_in());
    assert_eq!(app.backend.active_session_count(), 1);

    // Act - Logout
    app.core_client.logout(no_cb).await.unwrap().unwrap();

    // Assert - Logged out locally and on the backend
    assert!(app.core_client.user_info().is_none());
    assert!(app.core_client.token().is_none());
    assert_eq!(app.backend.active_session_count(), 0);
}

#[tokio::test]
async fn logout_clears_session_even_if_backend_fails() {
    // Arrange
    let app = spawn_app_as(TestUser::CLERK).await;
    app.backend.fail_requests(
        "POST",
        "/api/auth/logout/",
        500,
        serde_json::json!({"detail": "boom"}),
    );

    // Act
    let outcome = app.core_client.logout(no_cb).await.unwrap();

    // Assert
    assert!(outcome.is_err());
    assert!(!app.core_client.is_logged_in());
}

#[tokio::test]
async fn token_is_sent_after_login() {
    // Arrange
    let app = spawn_app().await;

    // Act - Before login the backend rejects the call
    let before = app.core_client.refresh_user(no_cb).await.unwrap();
    login_as(&app, TestUser::ADMIN).await;
    let after = app.core_client.refresh_user(no_cb).await.unwrap();

    // Assert
    assert_eq!(before.unwrap_err().to_string(), "Invalid token.");
    assert_eq!(after.unwrap().username.as_ref(), TestUser::ADMIN.username);
}

#[tokio::test]
async fn rejected_token_ends_session() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    app.backend.expire_sessions();

    // Act
    let outcome = app
        .core_client
        .list_chalans(&Default::default(), no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err().to_string(), "Invalid token.");
    assert!(!app.core_client.is_logged_in());
}

#[tokio::test]
async fn late_rejection_of_old_token_keeps_new_session() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let old_token = app.core_client.token().unwrap();
    app.backend
        .delay_requests("GET", "/api/chalans/", Duration::from_millis(300));
    let slow_list = app.core_client.list_chalans(&Default::default(), no_cb);

    // Act - Log out and back in as someone else while the list is held
    app.core_client.logout(no_cb).await.unwrap().unwrap();
    login_as(&app, TestUser::CLERK).await;
    let outcome = slow_list.await.unwrap();

    // Assert - Old token rejected but the new session is untouched
    assert_eq!(outcome.unwrap_err().to_string(), "Invalid token.");
    assert!(app.core_client.is_logged_in());
    assert_eq!(
        app.core_client.user_info().unwrap().username.as_ref(),
        TestUser::CLERK.username
    );
    assert_ne!(
        app.core_client.token().unwrap().expose_secret(),
        old_token.expose_secret()
    );
}

#[tokio::test]
async fn session_can_be_restored_from_token() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let token = app.core_client.token().unwrap();
    let new_client = Client::new(app.address.clone(), permits_test_helper::TEST_API_KEY.to_string().into());

    // Act
    let user = new_client.restore_session(token, no_cb).await.unwrap().unwrap();

    // Assert
    assert_eq!(user.username.as_ref(), TestUser::OFFICER.username);
    assert!(new_client.is_logged_in());
}

#[tokio::test]
async fn invalid_saved_token_is_discarded() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let outcome = app
        .core_client
        .restore_session("stale-token".to_string().into(), no_cb)
        .await
        .unwrap();

    // Assert
    assert!(outcome.is_err());
    assert!(app.core_client.token().is_none());
}

#[tokio::test]
async fn register_logs_new_user_in() {
    // Arrange
    let app = spawn_app().await;
    let args = RegisterReqArgs {
        username: "new-owner".to_string(),
        email: "owner@example.com".to_string(),
        password: "long-enough-password".to_string().into(),
        password_confirmation: "long-enough-password".to_string().into(),
        first_name: "New".to_string(),
        last_name: "Owner".to_string(),
    };
    args.validate().unwrap();

    // Act
    let user = app.core_client.register(&args, no_cb).await.unwrap().unwrap();

    // Assert
    assert_eq!(user.display_name(), "New Owner");
    assert!(app.core_client.is_logged_in());
    let sent = app.backend.requests_to("POST", "/api/auth/register/");
    assert_eq!(sent.len(), 1);
}

#[tokio::test]
async fn register_duplicate_shows_nested_message() {
    // Arrange
    let app = spawn_app().await;
    let args = RegisterReqArgs {
        username: TestUser::CLERK.username.to_string(),
        email: "dup@example.com".to_string(),
        password: "long-enough-password".to_string().into(),
        password_confirmation: "long-enough-password".to_string().into(),
        ..Default::default()
    };

    // Act
    let outcome = app.core_client.register(&args, no_cb).await.unwrap();

    // Assert
    let msg = user_facing_message(&outcome.unwrap_err(), "Registration failed");
    assert_eq!(msg, "A user with that username already exists.");
    assert!(!app.core_client.is_logged_in());
}

#[tokio::test]
async fn change_password_then_login_with_new_password() {
    // Arrange
    let app = spawn_app_as(TestUser::CLERK).await;
    let args = ChangePasswordReqArgs {
        old_password: TestUser::CLERK.password.to_string().into(),
        new_password: "a-brand-new-password".to_string().into(),
        confirm_password: "a-brand-new-password".to_string().into(),
    };
    args.validate().unwrap();

    // Act
    app.core_client
        .change_password(&args, no_cb)
        .await
        .unwrap()
        .unwrap();
    app.core_client.logout(no_cb).await.unwrap().unwrap();
    let login_args = LoginReqArgs::new(
        TestUser::CLERK.username,
        args.new_password.expose_secret().to_string().into(),
    );
    let outcome = app.core_client.login(login_args, no_cb).await.unwrap();

    // Assert
    assert!(outcome.is_ok());
}

#[tokio::test]
async fn change_password_wrong_old_password() {
    // Arrange
    let app = spawn_app_as(TestUser::CLERK).await;
    let args = ChangePasswordReqArgs {
        old_password: "not-my-password".to_string().into(),
        new_password: "a-brand-new-password".to_string().into(),
        confirm_password: "a-brand-new-password".to_string().into(),
    };

    // Act
    let outcome = app.core_client.change_password(&args, no_cb).await.unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err().to_string(), "Old password is incorrect");
    assert!(app.core_client.is_logged_in());
}

#[tokio::test]
async fn profile_update_is_seen_after_refresh() {
    // Arrange
    let app = spawn_app_as(TestUser::CLERK).await;
    let args = UpdateProfileReqArgs {
        first_name: "Sana".to_string(),
        last_name: "Malik".to_string(),
        email: "sana.malik@example.com".to_string(),
    };

    // Act
    app.core_client
        .update_profile(&args, no_cb)
        .await
        .unwrap()
        .unwrap();
    let user = app.core_client.refresh_user(no_cb).await.unwrap().unwrap();

    // Assert
    assert_eq!(user.display_name(), "Sana Malik");
    assert_eq!(user.email, "sana.malik@example.com");
    assert_eq!(
        app.core_client.user_info().unwrap().email,
        "sana.malik@example.com"
    );
}

#[tokio::test]
async fn profile_update_error_message_from_backend() {
    // Arrange
    let app = spawn_app_as(TestUser::CLERK).await;
    let args = UpdateProfileReqArgs {
        first_name: "Sana".to_string(),
        last_name: "Test".to_string(),
        email: "not-an-email".to_string(),
    };

    // Act
    let outcome = app.core_client.update_profile(&args, no_cb).await.unwrap();

    // Assert
    assert_eq!(
        user_facing_message(&outcome.unwrap_err(), "Failed to update profile"),
        "Enter a valid email address."
    );
}
