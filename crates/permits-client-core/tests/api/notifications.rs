use serde_json::json;

use crate::helpers::{no_cb, spawn_app_as, Table, TestUser};

#[tokio::test]
async fn unread_badge_follows_mark_as_read() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;

    // Act - Count and list before reading
    let before = app
        .core_client
        .unread_notification_count(no_cb)
        .await
        .unwrap()
        .unwrap();
    let listed = app
        .core_client
        .list_notifications(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Only the officer's notifications, newest first
    assert_eq!(before.unread_count, 1);
    let titles: Vec<&str> = listed.items.iter().map(|x| x.title.as_str()).collect();
    assert_eq!(titles, ["Permit assigned", "Welcome"]);
    assert!(!listed.items[0].is_read);

    // Act - Read the unread one
    app.core_client
        .mark_notification_read(listed.items[0].id, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let after = app
        .core_client
        .unread_notification_count(no_cb)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.unread_count, 0);
    assert_eq!(
        app.backend
            .requests_to("POST", "/api/notifications/1/mark_as_read/")
            .len(),
        1
    );
}

#[tokio::test]
async fn notification_of_another_user_is_not_changed() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;

    // Act
    let outcome = app
        .core_client
        .mark_notification_read(3.into(), no_cb)
        .await
        .unwrap();

    // Assert
    assert!(outcome.is_err());
    let record = app.backend.record(Table::Notifications, 3).unwrap();
    assert_eq!(record["is_read"], json!(false));
    assert!(app.core_client.is_logged_in());
}

#[tokio::test]
async fn mark_all_then_clear_read() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;

    // Act
    app.core_client
        .mark_all_notifications_read(no_cb)
        .await
        .unwrap()
        .unwrap();
    app.core_client
        .clear_read_notifications(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Nothing left for the officer, the admin's is untouched
    let listed = app
        .core_client
        .list_notifications(no_cb)
        .await
        .unwrap()
        .unwrap();
    assert!(listed.items.is_empty());
    assert_eq!(listed.total, Some(0));
    let admin_notification = app.backend.record(Table::Notifications, 3).unwrap();
    assert_eq!(admin_notification["is_read"], json!(false));
}
