use permits_shared::{errors::user_facing_message, fee_structure::FeeStructureForm, list::ListQuery};
use serde_json::json;

use crate::helpers::{no_cb, spawn_app_as, TestUser};

#[tokio::test]
async fn fee_structure_create_edit_delete() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    let form = FeeStructureForm {
        vehicle_type: Some(2.into()),
        base_fee: "950".to_string(),
        description: "Bus rate 2025".to_string(),
        is_active: true,
    };
    let args = form.validate().unwrap();

    // Act - Create
    let created = app
        .core_client
        .create_fee_structure(&args, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Created with the name of the vehicle type filled in
    let fee = app
        .core_client
        .get_fee_structure(created.id, no_cb)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fee.vehicle_type_name, "Bus");
    assert_eq!(fee.base_fee.value(), 950.0);

    // Act - Edit
    let mut edit = FeeStructureForm::from(&fee);
    edit.base_fee = "975.25".to_string();
    app.core_client
        .update_fee_structure(fee.id, &edit.validate().unwrap(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Edit applied
    let fee = app
        .core_client
        .get_fee_structure(created.id, no_cb)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fee.base_fee.to_string(), "975.25");

    // Act - Delete
    app.core_client
        .delete_fee_structure(fee.id, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Gone
    let outcome = app
        .core_client
        .get_fee_structure(fee.id, no_cb)
        .await
        .unwrap();
    assert!(outcome.is_err());
}

#[tokio::test]
async fn backend_validation_message_is_shown() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    let path = "/api/vehicle-fee-structures/";
    app.backend.fail_requests(
        "POST",
        path,
        400,
        json!({"message": "Base fee must be greater than 0"}),
    );
    let args = FeeStructureForm {
        vehicle_type: Some(1.into()),
        base_fee: "10".to_string(),
        ..Default::default()
    }
    .validate()
    .unwrap();

    // Act
    let outcome = app
        .core_client
        .create_fee_structure(&args, no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(
        user_facing_message(&outcome.unwrap_err(), "Failed to save fee structure"),
        "Base fee must be greater than 0"
    );
    assert_eq!(app.backend.requests_to("POST", path).len(), 1);
}

#[tokio::test]
async fn list_wrapped_and_bare_responses() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;

    // Act
    let all = app
        .core_client
        .list_fee_structures(&ListQuery::default(), no_cb)
        .await
        .unwrap()
        .unwrap();
    let for_truck = app
        .core_client
        .fee_structures_for_vehicle(1.into(), no_cb)
        .await
        .unwrap()
        .unwrap();
    let active = app
        .core_client
        .active_fee_structures(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(all.items.len(), 2);
    assert_eq!(all.total, Some(2));
    assert_eq!(for_truck.items.len(), 1);
    assert_eq!(for_truck.items[0].vehicle_type_name, "Truck");
    assert!(active.items.iter().all(|x| x.is_active));
    assert_eq!(active.items.len(), 1);
    let sent = app
        .backend
        .requests_to("GET", "/api/vehicle-fee-structures/by_vehicle/");
    assert_eq!(sent[0].query, "vehicle_type_id=1");
}

#[tokio::test]
async fn vehicle_types_are_listed() {
    // Arrange
    let app = spawn_app_as(TestUser::CLERK).await;

    // Act
    let page = app
        .core_client
        .list_vehicle_types(no_cb)
        .await
        .unwrap()
        .unwrap();
    let bus = app
        .core_client
        .get_vehicle_type(2.into(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let names: Vec<&str> = page.items.iter().map(|x| x.name.as_str()).collect();
    assert_eq!(names, ["Truck", "Bus"]);
    assert_eq!(bus.name, "Bus");
}
