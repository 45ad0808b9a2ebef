use permits_shared::{
    errors::user_facing_message,
    permit::PermitTypeForm,
    vehicle_type::{VehicleTypeArgs, VehicleTypeForm},
};
use serde_json::json;

use crate::helpers::{no_cb, spawn_app_as, Table, TestUser};

#[tokio::test]
async fn vehicle_type_create_edit_delete() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    let form = VehicleTypeForm {
        name: "Rickshaw".to_string(),
        icon: "rickshaw".to_string(),
        permit_duration_days: "90".to_string(),
        description: "Three wheeler".to_string(),
    };

    // Act - Create
    let created = app
        .core_client
        .create_vehicle_type(&form.validate().unwrap(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Shows up in the list
    let listed = app
        .core_client
        .list_vehicle_types(no_cb)
        .await
        .unwrap()
        .unwrap();
    let vehicle_type = listed
        .items
        .iter()
        .find(|x| x.id == created.id)
        .cloned()
        .unwrap();
    assert_eq!(vehicle_type.name, "Rickshaw");
    assert_eq!(vehicle_type.permit_duration_days, Some(90));
    assert!(vehicle_type.is_active);

    // Act - Edit sends every field with PUT
    let mut edit = VehicleTypeForm::from(&vehicle_type);
    edit.permit_duration_days = "120".to_string();
    app.core_client
        .update_vehicle_type(created.id, &edit.validate().unwrap(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Edit applied
    let path = format!("/api/vehicle-types/{}/", created.id);
    let sent = app.backend.requests_to("PUT", &path);
    assert_eq!(
        sent[0].body,
        Some(json!({"name": "Rickshaw", "icon": "rickshaw",
            "permit_duration_days": 120, "description": "Three wheeler"}))
    );
    let vehicle_type = app
        .core_client
        .get_vehicle_type(created.id, no_cb)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(vehicle_type.permit_duration_days, Some(120));

    // Act - Delete
    app.core_client
        .delete_vehicle_type(created.id, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Gone
    assert!(app
        .backend
        .record(Table::VehicleTypes, created.id.into())
        .is_none());
}

#[tokio::test]
async fn permit_type_create_edit_delete() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    let form = PermitTypeForm {
        name: "Tourist".to_string(),
        code: "T".to_string(),
        ..Default::default()
    };

    // Act - Create
    let created = app
        .core_client
        .create_permit_type(&form.validate().unwrap(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Listed from the bare array response
    let listed = app
        .core_client
        .list_permit_types(no_cb)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(listed.items.len(), 3);
    let permit_type = listed
        .items
        .iter()
        .find(|x| x.id == created.id)
        .cloned()
        .unwrap();
    assert_eq!(permit_type.code, "T");

    // Act - Edit
    let mut edit = PermitTypeForm::from(&permit_type);
    edit.description = "Seasonal routes".to_string();
    app.core_client
        .update_permit_type(created.id, &edit.validate().unwrap(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Edit applied
    let record = app
        .backend
        .record(Table::PermitTypes, created.id.into())
        .unwrap();
    assert_eq!(record["description"], json!("Seasonal routes"));
    assert_eq!(record["name"], json!("Tourist"));

    // Act - Delete
    app.core_client
        .delete_permit_type(created.id, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Back to the seeded types
    let listed = app
        .core_client
        .list_permit_types(no_cb)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(listed.items.len(), 2);
}

#[tokio::test]
async fn vehicle_type_missing_fields_fall_back_to_action_message() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    let args = VehicleTypeArgs {
        name: String::new(),
        icon: "bus".to_string(),
        permit_duration_days: 30,
        description: String::new(),
    };

    // Act
    let outcome = app
        .core_client
        .create_vehicle_type(&args, no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(
        user_facing_message(&outcome.unwrap_err(), "Failed to save vehicle type"),
        "Failed to save vehicle type"
    );
    assert_eq!(app.backend.requests_to("POST", "/api/vehicle-types/").len(), 1);
}

#[tokio::test]
async fn deleting_a_type_in_use_shows_backend_detail() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    app.backend.fail_requests(
        "DELETE",
        "/api/permit-types/1/",
        400,
        json!({"detail": "Permit type is in use."}),
    );

    // Act
    let outcome = app
        .core_client
        .delete_permit_type(1.into(), no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(
        user_facing_message(&outcome.unwrap_err(), "Failed to delete permit type"),
        "Permit type is in use."
    );
    assert!(app.backend.record(Table::PermitTypes, 1).is_some());
}
