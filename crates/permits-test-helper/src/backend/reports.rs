use std::collections::{BTreeMap, HashMap};

use actix_web::{web, HttpRequest};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};

use super::{BackendHandle, Table};

const STATUSES: [&str; 5] = ["active", "inactive", "cancelled", "expired", "pending"];
const AUTHORITIES: [(&str, &str); 2] = [
    ("PTA", "Provincial Transport Authority"),
    ("RTA", "Regional Transport Authority"),
];

fn count_status(permits: &[&Value], status: &str) -> usize {
    permits.iter().filter(|x| x["status"] == json!(status)).count()
}

fn valid_to(permit: &Value) -> Option<NaiveDate> {
    permit["valid_to"].as_str().and_then(|x| x.parse().ok())
}

fn is_expiring(permit: &Value, today: NaiveDate, days: i64) -> bool {
    permit["status"] == json!("active")
        && valid_to(permit).is_some_and(|to| to >= today && to <= today + Duration::days(days))
}

/// Permits grouped by the name of an embedded record such as the permit type
fn group_by_name<'a>(permits: &'a [Value], field: &str) -> BTreeMap<String, Vec<&'a Value>> {
    let mut result: BTreeMap<String, Vec<&Value>> = BTreeMap::new();
    for permit in permits {
        if let Some(name) = permit[field]["name"].as_str() {
            result.entry(name.to_string()).or_default().push(permit);
        }
    }
    result
}

fn group_sizes(groups: BTreeMap<String, Vec<&Value>>) -> BTreeMap<String, usize> {
    groups.into_iter().map(|(k, v)| (k, v.len())).collect()
}

#[tracing::instrument(skip(backend))]
pub async fn detailed_stats(req: HttpRequest, backend: web::Data<BackendHandle>) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    let permits = state.rows(Table::Permits);
    let all: Vec<&Value> = permits.iter().collect();
    let today = Utc::now().date_naive();
    let expired = permits
        .iter()
        .filter(|x| valid_to(x).is_some_and(|to| to < today))
        .count();
    let by_authority: BTreeMap<&str, usize> = AUTHORITIES
        .iter()
        .map(|(code, _)| {
            let count = permits.iter().filter(|x| x["authority"] == json!(code)).count();
            (*code, count)
        })
        .collect();
    web::Json(json!({
        "report_type": "Detailed Statistics",
        "generated_at": Utc::now().to_rfc3339(),
        "overall_stats": {
            "total_permits": permits.len(),
            "active_permits": count_status(&all, "active"),
            "expired_permits": expired,
            "cancelled_permits": count_status(&all, "cancelled"),
            "pending_permits": count_status(&all, "pending"),
            "inactive_permits": count_status(&all, "inactive"),
        },
        "recent_activity": {
            "created_last_30_days": 0,
            "modified_last_30_days": 0,
            "expiring_in_30_days": permits.iter().filter(|x| is_expiring(x, today, 30)).count(),
        },
        "by_authority": by_authority,
        "by_permit_type": group_sizes(group_by_name(&permits, "permit_type")),
        "by_vehicle_type": group_sizes(group_by_name(&permits, "vehicle_type")),
    }))
}

#[tracing::instrument(skip(backend))]
pub async fn permits_by_type(req: HttpRequest, backend: web::Data<BackendHandle>) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    let permits = state.rows(Table::Permits);
    let groups = group_by_name(&permits, "permit_type");
    let rows: Vec<Value> = state
        .rows(Table::PermitTypes)
        .into_iter()
        .map(|permit_type| {
            let name = permit_type["name"].as_str().unwrap_or_default().to_string();
            let matching = groups.get(&name).cloned().unwrap_or_default();
            let mut row = json!({
                "permit_type": name,
                "permit_code": permit_type["code"],
                "total": matching.len(),
            });
            for status in STATUSES {
                row[status] = json!(count_status(&matching, status));
            }
            row
        })
        .collect();
    web::Json(json!({"report_type": "Permits by Type", "data": rows}))
}

#[tracing::instrument(skip(backend))]
pub async fn permits_by_vehicle(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    let permits = state.rows(Table::Permits);
    let groups = group_by_name(&permits, "vehicle_type");
    let rows: Vec<Value> = state
        .rows(Table::VehicleTypes)
        .into_iter()
        .filter(|x| x["is_active"] != json!(false))
        .map(|vehicle_type| {
            let name = vehicle_type["name"].as_str().unwrap_or_default().to_string();
            let matching = groups.get(&name).cloned().unwrap_or_default();
            json!({
                "vehicle_type": name,
                "total": matching.len(),
                "active": count_status(&matching, "active"),
                "expired": count_status(&matching, "expired"),
            })
        })
        .collect();
    web::Json(json!({"report_type": "Permits by Vehicle Type", "data": rows}))
}

#[tracing::instrument(skip(backend))]
pub async fn authority_summary(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    let permits = state.rows(Table::Permits);
    let rows: Vec<Value> = AUTHORITIES
        .iter()
        .map(|(code, label)| {
            let matching: Vec<&Value> = permits
                .iter()
                .filter(|x| x["authority"] == json!(code))
                .collect();
            let mut row = json!({
                "authority": label,
                "authority_code": code,
                "total_permits": matching.len(),
            });
            for status in STATUSES {
                row[status] = json!(count_status(&matching, status));
            }
            row
        })
        .collect();
    web::Json(json!({"report_type": "Authority Summary", "data": rows}))
}

/// Falls back to 30 days when `days` is missing or not a number
#[tracing::instrument(skip(backend))]
pub async fn expiring_permits(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Query(query): web::Query<HashMap<String, String>>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    let days: i64 = query
        .get("days")
        .and_then(|x| x.parse().ok())
        .unwrap_or(30);
    let today = Utc::now().date_naive();
    let mut expiring: Vec<Value> = state
        .rows(Table::Permits)
        .into_iter()
        .filter(|x| is_expiring(x, today, days))
        .collect();
    expiring.sort_by_key(valid_to);
    web::Json(json!({
        "report_type": format!("Permits Expiring Within {days} Days"),
        "generated_at": Utc::now().to_rfc3339(),
        "expiring_date": (today + Duration::days(days)).to_string(),
        "total_expiring": expiring.len(),
        "data": expiring,
    }))
}
