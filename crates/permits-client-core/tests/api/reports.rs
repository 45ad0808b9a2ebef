use chrono::{Duration, Utc};
use permits_shared::{permit::PermitStatus, report::ExpiringQuery};
use serde_json::json;

use crate::helpers::{no_cb, spawn_app_as, Table, TestUser};

fn active_permit(id: u64, authority: &str, valid_in_days: i64) -> serde_json::Value {
    let valid_to = Utc::now().date_naive() + Duration::days(valid_in_days);
    json!({"id": id, "permit_number": format!("PRM-{id:05}"), "authority": authority,
        "permit_type": {"id": 2, "name": "Passenger", "code": "P"},
        "vehicle_type": {"id": 2, "name": "Bus"},
        "owner_name": "Test Owner", "status": "active", "valid_to": valid_to.to_string()})
}

#[tokio::test]
async fn detailed_stats_count_every_permit() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    for id in 1000..2200 {
        app.backend
            .put_record(Table::Permits, id, active_permit(id, "PTA", 365));
    }

    // Act
    let stats = app
        .core_client
        .report_detailed_stats(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Seeded permits plus those added, not limited to one page
    let overall = &stats.overall_stats;
    assert_eq!(overall.total_permits, 1202);
    assert_eq!(overall.active_permits, 1201);
    assert_eq!(overall.pending_permits, 1);
    assert_eq!(overall.expired_permits, 1, "seeded permit ended in 2025");
    assert_eq!(stats.by_authority.get("PTA"), Some(&1201));
    assert_eq!(stats.by_authority.get("RTA"), Some(&1));
    assert_eq!(stats.by_permit_type.get("Passenger"), Some(&1200));
    assert_eq!(stats.by_vehicle_type.get("Truck"), Some(&2));
    assert_eq!(
        app.backend
            .requests_to("GET", "/api/permits/report_detailed_stats/")
            .len(),
        1
    );
}

#[tokio::test]
async fn grouped_reports() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;

    // Act
    let by_type = app
        .core_client
        .report_permits_by_type(no_cb)
        .await
        .unwrap()
        .unwrap();
    let by_vehicle = app
        .core_client
        .report_permits_by_vehicle(no_cb)
        .await
        .unwrap()
        .unwrap();
    let by_authority = app
        .core_client
        .report_authority_summary(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Every type is listed even with no permits
    let goods = by_type.data.iter().find(|x| x.permit_code == "G").unwrap();
    assert_eq!((goods.total, goods.active, goods.pending), (2, 1, 1));
    let passenger = by_type.data.iter().find(|x| x.permit_code == "P").unwrap();
    assert_eq!(passenger.total, 0);

    let truck = by_vehicle
        .data
        .iter()
        .find(|x| x.vehicle_type == "Truck")
        .unwrap();
    assert_eq!((truck.total, truck.active), (2, 1));
    assert_eq!(by_vehicle.data.len(), 2);

    let rta = by_authority
        .data
        .iter()
        .find(|x| x.authority_code == "RTA")
        .unwrap();
    assert_eq!(rta.authority, "Regional Transport Authority");
    assert_eq!((rta.total_permits, rta.active), (1, 1));
}

#[tokio::test]
async fn expiring_permits_within_window() {
    // Arrange
    let app = spawn_app_as(TestUser::ADMIN).await;
    app.backend
        .put_record(Table::Permits, 11, active_permit(11, "RTA", 40));
    app.backend
        .put_record(Table::Permits, 10, active_permit(10, "RTA", 10));
    let mut pending = active_permit(12, "PTA", 5);
    pending["status"] = json!("pending");
    app.backend.put_record(Table::Permits, 12, pending);

    // Act
    let default_window = app
        .core_client
        .report_expiring_permits(ExpiringQuery::default(), no_cb)
        .await
        .unwrap()
        .unwrap();
    let wider_window = app
        .core_client
        .report_expiring_permits(ExpiringQuery { days: 60 }, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Only active permits, soonest first
    assert_eq!(default_window.total_expiring, 1);
    assert_eq!(default_window.data[0].id, 10.into());
    assert_eq!(default_window.data[0].status, PermitStatus::Active);
    let ids: Vec<u64> = wider_window.data.iter().map(|x| x.id.into()).collect();
    assert_eq!(ids, [10, 11]);
    let sent = app
        .backend
        .requests_to("GET", "/api/permits/report_expiring_permits/");
    assert_eq!(sent[0].query, "days=30");
}
