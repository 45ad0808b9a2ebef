use permits_shared::{
    errors::user_facing_message,
    list::ListQuery,
    req_args::api::admin::{
        role::FeatureReqArgs,
        user::{AssignRoleReqArgs, NewUserReqArgs},
    },
    uac::RoleDraft,
};

use crate::helpers::{login_as, no_cb, spawn_app, spawn_app_as, TestUser};

#[tokio::test]
async fn users_are_listed_with_roles() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;

    // Act
    let users = app
        .core_client
        .list_users(&ListQuery::default(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(users.items.len(), 3);
    let officer = users
        .items
        .iter()
        .find(|x| x.username.as_ref() == TestUser::OFFICER.username)
        .unwrap();
    assert_eq!(officer.role_name(), Some("inspector"));
    assert!(officer.is_employee());
}

#[tokio::test]
async fn created_user_can_log_in_after_role_assignment() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    let args = NewUserReqArgs {
        username: "inspector2".to_string(),
        email: "inspector2@example.com".to_string(),
        password: "inspector2-password".to_string().into(),
        first_name: "Hamza".to_string(),
        last_name: "Shah".to_string(),
        role_id: None,
    };
    args.validate().unwrap();

    // Act
    app.core_client
        .create_user(&args, no_cb)
        .await
        .unwrap()
        .unwrap();
    let users = app
        .core_client
        .list_users(&ListQuery::default(), no_cb)
        .await
        .unwrap()
        .unwrap();
    let created = users
        .items
        .iter()
        .find(|x| x.username.as_ref() == "inspector2")
        .unwrap();
    app.core_client
        .assign_role(created.id, &AssignRoleReqArgs { role_id: 2.into() }, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let new_client = permits_client_core::Client::new(
        app.address.clone(),
        permits_test_helper::TEST_API_KEY.to_string().into(),
    );
    let login_args = permits_shared::req_args::LoginReqArgs::new(
        "inspector2",
        "inspector2-password".to_string().into(),
    );
    let user = new_client.login(login_args, no_cb).await.unwrap().unwrap();
    assert_eq!(user.role_name(), Some("inspector"));
    assert!(user.is_employee());
}

#[tokio::test]
async fn duplicate_username_rejected() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    let args = NewUserReqArgs {
        username: TestUser::CLERK.username.to_string(),
        email: "other@example.com".to_string(),
        password: "long-enough-password".to_string().into(),
        ..Default::default()
    };

    // Act
    let outcome = app.core_client.create_user(&args, no_cb).await.unwrap();

    // Assert
    assert_eq!(
        user_facing_message(&outcome.unwrap_err(), "Failed to create user"),
        "A user with that username already exists."
    );
}

#[tokio::test]
async fn deactivated_user_cannot_log_in() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;

    // Act
    app.core_client
        .deactivate_user(TestUser::CLERK.id.into(), no_cb)
        .await
        .unwrap()
        .unwrap();
    let second_client = permits_client_core::Client::new(
        app.address.clone(),
        permits_test_helper::TEST_API_KEY.to_string().into(),
    );
    let outcome = second_client
        .login(TestUser::CLERK.login_args(), no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err().to_string(), "User account is disabled.");

    // Act - Reactivate
    app.core_client
        .activate_user(TestUser::CLERK.id.into(), no_cb)
        .await
        .unwrap()
        .unwrap();
    let outcome = second_client
        .login(TestUser::CLERK.login_args(), no_cb)
        .await
        .unwrap();

    // Assert
    assert!(outcome.is_ok());
}

#[tokio::test]
async fn role_created_then_features_granted_and_revoked() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    let draft = RoleDraft {
        name: "Auditor".try_into().unwrap(),
        description: "Reviews reports".to_string(),
    };
    let report_view = FeatureReqArgs {
        feature_id: 2.into(),
    };

    // Act - Create
    let created = app
        .core_client
        .create_role(&draft, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Act - Grant
    app.core_client
        .add_role_feature(created.id, &report_view, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Granted
    let role = app
        .core_client
        .get_role(created.id, no_cb)
        .await
        .unwrap()
        .unwrap();
    assert!(role.name.matches("auditor"));
    assert!(role.has_feature_id(report_view.feature_id));

    // Act - Granting again
    let outcome = app
        .core_client
        .add_role_feature(created.id, &report_view, no_cb)
        .await
        .unwrap();

    // Assert - Backend message
    assert_eq!(
        user_facing_message(&outcome.unwrap_err(), "Failed to add feature"),
        "Feature already assigned to this role"
    );

    // Act - Revoke
    app.core_client
        .remove_role_feature(created.id, &report_view, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Revoked
    let role = app
        .core_client
        .get_role(created.id, no_cb)
        .await
        .unwrap()
        .unwrap();
    assert!(!role.has_feature_id(report_view.feature_id));
}

#[tokio::test]
async fn duplicate_role_name_rejected() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    let draft = RoleDraft {
        name: "Clerk".try_into().unwrap(),
        description: String::new(),
    };

    // Act
    let outcome = app.core_client.create_role(&draft, no_cb).await.unwrap();

    // Assert
    assert_eq!(
        user_facing_message(&outcome.unwrap_err(), "Failed to create role"),
        "Role with this name already exists."
    );
}

#[tokio::test]
async fn roles_and_features_listed() {
    // Arrange
    let app = spawn_app().await;
    login_as(&app, TestUser::ADMIN).await;

    // Act
    let roles = app.core_client.list_roles(no_cb).await.unwrap().unwrap();
    let features = app.core_client.list_features(no_cb).await.unwrap().unwrap();

    // Assert
    let inspector = roles.items.iter().find(|x| x.name.matches("inspector")).unwrap();
    assert_eq!(inspector.user_count, Some(1));
    assert_eq!(inspector.features.len(), 2);
    assert_eq!(features.items.len(), 5);
    assert_eq!(features.total, None);
}
