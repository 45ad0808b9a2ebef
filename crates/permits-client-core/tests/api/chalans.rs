use permits_shared::{
    chalan::{ChalanDiff, ChalanDraft, ChalanEdit, ChalanStatus},
    errors::user_facing_message,
    list::ListQuery,
    req_args::api::chalans::{CancelReqArgs, MarkPaidReqArgs, UpdateFeesReqArgs},
};
use serde_json::json;

use crate::helpers::{no_cb, spawn_app_as, Table, TestUser};

#[tokio::test]
async fn list_returns_seeded_chalans() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;

    // Act
    let page = app
        .core_client
        .list_chalans(&ListQuery::default(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(page.total, Some(2));
    let numbers: Vec<&str> = page.items.iter().map(|x| x.chalan_number.as_str()).collect();
    assert_eq!(numbers, ["CH-00001", "CH-00002"]);
}

#[tokio::test]
async fn search_and_status_filters_are_sent() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut query = ListQuery::default();
    query.set_search("ahmed");
    query.set_status(Some(ChalanStatus::Pending.as_ref()));

    // Act
    let page = app
        .core_client
        .list_chalans(&query, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].owner_name, "Ahmed Raza");
    let sent = app.backend.requests_to("GET", "/api/chalans/");
    let query_string = &sent.last().unwrap().query;
    assert!(query_string.contains("search=ahmed"), "{query_string}");
    assert!(query_string.contains("status=pending"), "{query_string}");
}

#[tokio::test]
async fn partial_update_sends_only_changed_fields() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let chalan = app
        .core_client
        .get_chalan(1.into(), no_cb)
        .await
        .unwrap()
        .unwrap();
    let original = ChalanEdit::from(&chalan);
    let mut edited = original.clone();
    edited.remarks = "Vehicle impounded".to_string();
    let diff = ChalanDiff::from_diff(&original, &edited).unwrap().unwrap();

    // Act
    app.core_client
        .update_chalan(&diff, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let sent = app.backend.requests_to("PATCH", "/api/chalans/1/");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, Some(json!({"remarks": "Vehicle impounded"})));
    let reloaded = app
        .core_client
        .get_chalan(1.into(), no_cb)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.remarks.as_deref(), Some("Vehicle impounded"));
    assert_eq!(reloaded.owner_name, chalan.owner_name);
}

#[tokio::test]
async fn mark_paid_then_paid_chalan_cannot_be_cancelled() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let payment = MarkPaidReqArgs::from_input("1500", "BANK-778").unwrap();

    // Act - Pay
    app.core_client
        .mark_chalan_paid(1.into(), &payment, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Status and amounts after payment
    let chalan = app
        .core_client
        .get_chalan(1.into(), no_cb)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(chalan.status, ChalanStatus::Paid);
    assert!(chalan.is_paid);
    assert_eq!(chalan.remaining_amount.value(), 0.0);
    assert_eq!(chalan.payment_reference.as_deref(), Some("BANK-778"));

    // Act - Cancel
    let reason = CancelReqArgs::from_input("Issued in error").unwrap();
    let outcome = app
        .core_client
        .cancel_chalan(1.into(), &reason, no_cb)
        .await
        .unwrap();

    // Assert - Backend message is shown
    assert_eq!(
        user_facing_message(&outcome.unwrap_err(), "Failed to cancel chalan"),
        "Chalan is already paid"
    );
}

#[tokio::test]
async fn update_fees_changes_remaining_amount() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let args = UpdateFeesReqArgs::from_input("2000").unwrap();

    // Act
    app.core_client
        .update_chalan_fees(1.into(), &args, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let sent = app.backend.requests_to("PATCH", "/api/chalans/1/update_fees/");
    assert_eq!(sent[0].body, Some(json!({"fees_amount": "2000.00"})));
    let chalan = app
        .core_client
        .get_chalan(1.into(), no_cb)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(chalan.fees_amount.value(), 2000.0);
    assert_eq!(chalan.remaining_amount.value(), 2000.0);
}

#[tokio::test]
async fn cancel_records_reason() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let args = CancelReqArgs::from_input("  Duplicate entry ").unwrap();

    // Act
    app.core_client
        .cancel_chalan(1.into(), &args, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let record = app.backend.record(Table::Chalans, 1).unwrap();
    assert_eq!(record["status"], json!("cancelled"));
    assert_eq!(record["remarks"], json!("Duplicate entry"));
}

#[tokio::test]
async fn create_with_automatic_fee() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut draft = ChalanDraft::new();
    draft.owner_name = "Bilal Ahmed".to_string();
    draft.owner_cnic = "35202-1234567-1".to_string();
    draft.car_number = "LEC-9988".to_string();
    draft.vehicle_type = Some(1.into());
    draft.violation_description = "Overloading".to_string();
    let new_chalan = draft.validate().unwrap();

    // Act
    let created = app
        .core_client
        .create_chalan(&new_chalan, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let chalan = app
        .core_client
        .get_chalan(created.id, no_cb)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(chalan.chalan_number, format!("CH-{:05}", u64::from(created.id)));
    assert_eq!(chalan.fees_amount.value(), 1500.0);
    assert_eq!(chalan.status, ChalanStatus::Pending);
    assert_eq!(chalan.issued_by_name.as_deref(), Some(TestUser::OFFICER.username));
}

#[tokio::test]
async fn create_without_active_fee_structure_fails() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut draft = ChalanDraft::new();
    draft.owner_name = "Bilal Ahmed".to_string();
    draft.owner_cnic = "35202-1234567-1".to_string();
    draft.car_number = "LEC-9988".to_string();
    draft.vehicle_type = Some(2.into()); // Bus fee structure is inactive
    draft.violation_description = "Overloading".to_string();
    let new_chalan = draft.validate().unwrap();

    // Act
    let outcome = app
        .core_client
        .create_chalan(&new_chalan, no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(
        user_facing_message(&outcome.unwrap_err(), "Failed to create chalan"),
        "No active fee structure for this vehicle type"
    );
}

#[tokio::test]
async fn history_lists_actions_in_order() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let fees = UpdateFeesReqArgs::from_input("1750").unwrap();
    let payment = MarkPaidReqArgs::from_input("1750", "").unwrap();
    app.core_client
        .update_chalan_fees(1.into(), &fees, no_cb)
        .await
        .unwrap()
        .unwrap();
    app.core_client
        .mark_chalan_paid(1.into(), &payment, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Act
    let history = app
        .core_client
        .chalan_history(1.into(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let actions: Vec<&str> = history.items.iter().map(|x| x.action.as_str()).collect();
    assert_eq!(actions, ["fees_updated", "paid"]);
    assert_eq!(history.total, None);
}

#[tokio::test]
async fn statistics_count_by_status() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;

    // Act
    let stats = app
        .core_client
        .chalan_statistics(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(stats.total_chalans, 2);
    assert_eq!(stats.count_for(ChalanStatus::Pending), 1);
    assert_eq!(stats.count_for(ChalanStatus::Paid), 1);
    assert_eq!(stats.count_for(ChalanStatus::Cancelled), 0);
    assert_eq!(stats.pending_collection.value(), 1500.0);
}

#[tokio::test]
async fn missing_chalan_reports_not_found() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;

    // Act
    let outcome = app.core_client.get_chalan(999.into(), no_cb).await.unwrap();

    // Assert
    assert_eq!(
        user_facing_message(&outcome.unwrap_err(), "Failed to load chalan"),
        "Not found."
    );
}
