//! Screen state driven by the real client, polled the way a frame loop would

use permits_client_core::screen::{ListState, RecordState, SubmitState};
use permits_shared::{
    chalan::{Chalan, ChalanDraft, ChalanStatus, ChalanSummary},
    req_args::api::chalans::{CancelReqArgs, MarkPaidReqArgs},
};
use serde_json::json;

use crate::helpers::{no_cb, spawn_app_as, wait_until, TestApp, TestUser};

const DETAIL_PATH: &str = "/api/chalans/1/";

async fn loaded_chalan(app: &TestApp) -> RecordState<Chalan> {
    let mut state = RecordState::new(1.into(), "Failed to load chalan");
    assert!(state.needs_fetch());
    state.start_fetch(|id| app.core_client.get_chalan(id, no_cb));
    wait_until(|| {
        state.poll();
        !state.is_busy()
    })
    .await
    .unwrap();
    state
}

#[tokio::test]
async fn action_is_followed_by_exactly_one_fetch() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut state = loaded_chalan(&app).await;
    assert_eq!(state.record().unwrap().status, ChalanStatus::Pending);
    let args = MarkPaidReqArgs::from_input("1500", "").unwrap();

    // Act - Start action and wait for it to finish
    state.start_action(
        app.core_client.mark_chalan_paid(state.id(), &args, no_cb),
        "Failed to mark chalan as paid",
    );
    wait_until(|| {
        state.poll();
        state.needs_fetch()
    })
    .await
    .unwrap();

    // Assert - Old record still shown until the fetch completes
    assert_eq!(state.record().unwrap().status, ChalanStatus::Pending);
    assert!(!state.is_action_complete());

    // Act - Fetch again as the screen would on its next frame
    state.start_fetch(|id| app.core_client.get_chalan(id, no_cb));
    assert!(!state.needs_fetch());
    wait_until(|| {
        state.poll();
        state.is_action_complete()
    })
    .await
    .unwrap();

    // Assert
    assert_eq!(state.record().unwrap().status, ChalanStatus::Paid);
    assert!(!state.needs_fetch());
    assert_eq!(app.backend.requests_to("GET", DETAIL_PATH).len(), 2);
}

#[tokio::test]
async fn failed_action_shows_backend_message_and_keeps_record() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut state = loaded_chalan(&app).await;
    app.backend.fail_requests(
        "POST",
        "/api/chalans/1/cancel/",
        400,
        json!({"detail": "Chalan is locked"}),
    );
    let args = CancelReqArgs::from_input("Issued in error").unwrap();

    // Act
    state.start_action(
        app.core_client.cancel_chalan(state.id(), &args, no_cb),
        "Failed to cancel chalan",
    );
    wait_until(|| {
        state.poll();
        !state.is_busy()
    })
    .await
    .unwrap();

    // Assert
    assert_eq!(state.action_error(), Some("Chalan is locked"));
    assert_eq!(state.record().unwrap().status, ChalanStatus::Pending);
    assert!(!state.needs_fetch());
    assert_eq!(app.backend.requests_to("GET", DETAIL_PATH).len(), 1);
}

#[tokio::test]
async fn failed_action_without_message_uses_fallback() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut state = loaded_chalan(&app).await;
    app.backend
        .fail_requests("POST", "/api/chalans/1/mark_as_paid/", 500, json!({}));
    let args = MarkPaidReqArgs::from_input("100", "").unwrap();

    // Act
    state.start_action(
        app.core_client.mark_chalan_paid(state.id(), &args, no_cb),
        "Failed to mark chalan as paid",
    );
    wait_until(|| {
        state.poll();
        !state.is_busy()
    })
    .await
    .unwrap();

    // Assert
    assert_eq!(state.action_error(), Some("Failed to mark chalan as paid"));
}

#[tokio::test]
async fn list_refetches_once_per_filter_change() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut list: ListState<ChalanSummary> =
        ListState::new(Default::default(), "Failed to load chalans");
    let fetch_if_needed = |list: &mut ListState<ChalanSummary>| {
        if list.needs_fetch() {
            list.start_fetch(|query| app.core_client.list_chalans(query, no_cb));
        }
    };

    // Act - Initial load
    fetch_if_needed(&mut list);
    wait_until(|| {
        list.poll();
        !list.is_loading()
    })
    .await
    .unwrap();

    // Assert - All rows
    assert_eq!(list.rows().len(), 2);

    // Act - Same filter twice then a different one
    list.update_query(|q| q.set_status(Some(ChalanStatus::Paid.as_ref())));
    fetch_if_needed(&mut list);
    list.update_query(|q| q.set_status(Some(ChalanStatus::Paid.as_ref())));
    fetch_if_needed(&mut list);
    assert!(list.rows().is_empty(), "rows of the old query are not shown");
    wait_until(|| {
        list.poll();
        !list.is_loading()
    })
    .await
    .unwrap();

    // Assert
    assert_eq!(list.rows().len(), 1);
    assert_eq!(list.rows()[0].status, ChalanStatus::Paid);
    assert_eq!(app.backend.requests_to("GET", "/api/chalans/").len(), 2);
    assert!(!list.has_next_page());
}

#[tokio::test]
async fn list_failure_shows_message() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    app.backend.fail_requests(
        "GET",
        "/api/chalans/",
        503,
        json!({"detail": "Service temporarily unavailable"}),
    );
    let mut list: ListState<ChalanSummary> =
        ListState::new(Default::default(), "Failed to load chalans");

    // Act
    list.start_fetch(|query| app.core_client.list_chalans(query, no_cb));
    wait_until(|| {
        list.poll();
        !list.is_loading()
    })
    .await
    .unwrap();

    // Assert
    assert_eq!(list.error(), Some("Service temporarily unavailable"));
    assert!(list.rows().is_empty());
}

#[tokio::test]
async fn submit_reports_created_id() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut submit = SubmitState::new("Failed to create chalan");
    let mut draft = ChalanDraft::new();
    draft.owner_name = "Nadia Hussain".to_string();
    draft.owner_cnic = "35202-4444444-4".to_string();
    draft.car_number = "LED-4040".to_string();
    draft.vehicle_type = Some(1.into());
    draft.violation_description = "Expired permit".to_string();

    // Act
    match draft.validate() {
        Ok(new_chalan) => submit.start(app.core_client.create_chalan(&new_chalan, no_cb)),
        Err(e) => submit.reject(e),
    }
    wait_until(|| {
        submit.poll();
        !submit.is_submitting()
    })
    .await
    .unwrap();

    // Assert
    let id = submit.created_id().unwrap();
    assert!(app.backend.record(crate::helpers::Table::Chalans, id.into()).is_some());
    assert!(submit.error().is_none());
}

#[tokio::test]
async fn invalid_form_is_not_submitted() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut submit = SubmitState::new("Failed to create chalan");
    let draft = ChalanDraft::new();

    // Act
    match draft.validate() {
        Ok(new_chalan) => submit.start(app.core_client.create_chalan(&new_chalan, no_cb)),
        Err(e) => submit.reject(e),
    }

    // Assert
    assert_eq!(submit.error(), Some("Owner name is required"));
    assert!(app.backend.requests_to("POST", "/api/chalans/").is_empty());
}
