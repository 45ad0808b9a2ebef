use chrono::NaiveDate;
use permits_shared::{
    errors::ValidationError,
    list::ListQuery,
    permit::{Authority, PermitDiff, PermitDraft, PermitEdit, PermitStatus},
};
use serde_json::json;

use crate::helpers::{no_cb, spawn_app_as, TestUser};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

#[tokio::test]
async fn list_filtered_by_status_and_authority() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut by_status = ListQuery::default();
    by_status.set_status(Some(PermitStatus::Pending.as_ref()));
    let mut by_authority = ListQuery::default();
    by_authority.set_authority(Some(Authority::Rta.as_ref()));

    // Act
    let pending = app
        .core_client
        .list_permits(&by_status, no_cb)
        .await
        .unwrap()
        .unwrap();
    let rta = app
        .core_client
        .list_permits(&by_authority, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(pending.items.len(), 1);
    assert_eq!(pending.items[0].permit_number.as_deref(), Some("PRM-00002"));
    assert_eq!(rta.items.len(), 1);
    assert_eq!(rta.items[0].authority, Authority::Rta);
}

#[tokio::test]
async fn detail_includes_nested_types() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;

    // Act
    let permit = app
        .core_client
        .get_permit(1.into(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(permit.owner_name.as_deref(), Some("Sara Khan"));
    assert_eq!(permit.permit_type_name(), Some("Goods"));
    assert_eq!(permit.vehicle_type_name(), Some("Truck"));
    assert_eq!(permit.status, PermitStatus::Active);
    assert_eq!(permit.valid_from, NaiveDate::from_ymd_opt(2024, 1, 1));
}

#[tokio::test]
async fn partial_update_then_history() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let permit = app
        .core_client
        .get_permit(1.into(), no_cb)
        .await
        .unwrap()
        .unwrap();
    let original = PermitEdit::from(&permit);
    let mut edited = original.clone();
    edited.status = PermitStatus::Inactive;
    edited.owner_phone = "0321-9999999".to_string();
    let diff = PermitDiff::from_diff(&original, &edited).unwrap().unwrap();

    // Act
    app.core_client
        .update_permit(&diff, no_cb)
        .await
        .unwrap()
        .unwrap();
    let history = app
        .core_client
        .permit_history(1.into(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let sent = app.backend.requests_to("PATCH", "/api/permits/1/");
    assert_eq!(
        sent[0].body,
        Some(json!({"owner_phone": "0321-9999999", "status": "inactive"}))
    );
    assert_eq!(history.items.len(), 1);
    assert_eq!(history.items[0].action, "updated");
    assert_eq!(history.items[0].performed_by, TestUser::OFFICER.username);
}

#[tokio::test]
async fn create_from_draft() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut draft = PermitDraft::new(today());
    draft.permit_type = Some(2.into());
    draft.vehicle_type = Some(2.into());
    draft.vehicle_number = "LES-1010".to_string();
    draft.vehicle_make = "Daewoo".to_string();
    draft.vehicle_model = "BS106".to_string();
    draft.owner_name = "Kamran Iqbal".to_string();
    draft.owner_cnic = "35202-3333333-3".to_string();
    draft.owner_phone = "0333-3333333".to_string();
    draft.owner_address = "Gulberg, Lahore".to_string();
    draft.description = "Intercity route".to_string();
    draft.valid_to = "2026-03-01".to_string();
    let new_permit = draft.validate().unwrap();

    // Act
    let created = app
        .core_client
        .create_permit(&new_permit, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let permit = app
        .core_client
        .get_permit(created.id, no_cb)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(permit.status, PermitStatus::Pending);
    assert_eq!(permit.authority, Authority::Rta);
    assert_eq!(permit.permit_type_name(), Some("Passenger"));
    assert_eq!(permit.vehicle_year, Some(2025));
    assert_eq!(
        permit.permit_number,
        Some(format!("PRM-{:05}", u64::from(created.id)))
    );
}

#[tokio::test]
async fn incomplete_draft_is_not_sent() {
    // Arrange
    let app = spawn_app_as(TestUser::OFFICER).await;
    let mut draft = PermitDraft::new(today());
    draft.permit_type = Some(1.into());
    draft.vehicle_type = Some(1.into());

    // Act
    let actual = draft.validate();

    // Assert
    assert_eq!(actual.unwrap_err(), ValidationError::IncompleteForm);
    assert!(app.backend.requests_to("POST", "/api/permits/").is_empty());
}

#[tokio::test]
async fn permit_types_from_bare_array() {
    // Arrange
    let app = spawn_app_as(TestUser::CLERK).await;

    // Act
    let types = app
        .core_client
        .list_permit_types(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(types.total, None);
    let codes: Vec<&str> = types.items.iter().map(|x| x.code.as_str()).collect();
    assert_eq!(codes, ["G", "P"]);
}
