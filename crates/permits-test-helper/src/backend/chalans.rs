use std::collections::{BTreeMap, HashMap};

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::{json, Value};

use super::{
    amount_of, bad_request, format_amount, list_response, state::BackendState, BackendHandle,
    SessionUser, Table,
};

const EDITABLE_FIELDS: [&str; 5] = [
    "owner_name",
    "owner_phone",
    "violation_description",
    "issue_location",
    "remarks",
];

#[tracing::instrument(skip(backend))]
pub async fn list(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Query(query): web::Query<HashMap<String, String>>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    web::Json(list_response(state.rows(Table::Chalans), &query))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn detail(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<web::Json<Value>> {
    let state = backend.enter(&req, None);
    let id = path.into_inner();
    let mut result = state.get_or_404(Table::Chalans, id)?.clone();
    result["history"] = json!(state.history(Table::Chalans, id));
    Ok(web::Json(result))
}

fn fee_for_vehicle(state: &BackendState, vehicle_type: &Value) -> Option<f64> {
    state
        .rows(Table::FeeStructures)
        .into_iter()
        .find(|x| x["vehicle_type"] == *vehicle_type && x["is_active"] == json!(true))
        .and_then(|x| amount_of(&x["base_fee"]))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn create(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    for field in ["owner_name", "owner_cnic", "car_number", "violation_description"] {
        if body[field].as_str().is_none_or(|x| x.trim().is_empty()) {
            return Err(bad_request(json!({field: ["This field is required."]})));
        }
    }
    let vehicle_type = body["vehicle_type"].clone();
    let vehicle_name = vehicle_type
        .as_u64()
        .and_then(|id| state.get(Table::VehicleTypes, id))
        .map(|x| x["name"].clone())
        .ok_or_else(|| bad_request(json!({"vehicle_type": ["Invalid vehicle type."]})))?;
    let fees = match amount_of(&body["fees_amount"]) {
        Some(fees) => fees,
        None if body["auto_calculate_fee"] == json!(true) => {
            fee_for_vehicle(&state, &vehicle_type).ok_or_else(|| {
                bad_request(json!({"error": "No active fee structure for this vehicle type"}))
            })?
        }
        None => return Err(bad_request(json!({"fees_amount": ["This field is required."]}))),
    };
    let issued_by = state
        .account(session.0)
        .map(|x| x.username.clone())
        .unwrap_or_default();
    let mut record = body.clone();
    record["vehicle_type_name"] = vehicle_name;
    record["fees_amount"] = format_amount(fees);
    record["paid_amount"] = format_amount(0.0);
    record["remaining_amount"] = format_amount(fees);
    record["is_paid"] = json!(false);
    record["status"] = json!("pending");
    record["issued_date"] = json!(chrono::Utc::now().to_rfc3339());
    record["issued_by_name"] = json!(issued_by);
    let id = state.insert(Table::Chalans, record);
    let number = format!("CH-{id:05}");
    let created = state.get_mut_or_404(Table::Chalans, id)?;
    created["chalan_number"] = json!(number);
    let created = created.clone();
    state.add_history(
        Table::Chalans,
        id,
        json!({"action": "created", "performed_by": session.0, "changes": {}, "notes": ""}),
    );
    Ok(HttpResponse::Created().json(created))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn update(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
    path: web::Path<u64>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<web::Json<Value>> {
    let mut state = backend.enter(&req, Some(&body));
    let id = path.into_inner();
    let Some(changes) = body.as_object() else {
        return Err(bad_request(json!({"detail": "Expected an object"})));
    };
    if let Some(field) = changes.keys().find(|x| !EDITABLE_FIELDS.contains(&x.as_str())) {
        return Err(bad_request(
            json!({"error": format!("Field {field} cannot be changed here")}),
        ));
    }
    let record = state.get_mut_or_404(Table::Chalans, id)?;
    for (key, value) in changes {
        record[key] = value.clone();
    }
    let result = record.clone();
    state.add_history(
        Table::Chalans,
        id,
        json!({"action": "updated", "performed_by": session.0, "changes": body, "notes": ""}),
    );
    Ok(web::Json(result))
}

fn ensure_open(record: &Value) -> actix_web::Result<()> {
    match record["status"].as_str() {
        Some("paid") => Err(bad_request(json!({"detail": "Chalan is already paid"}))),
        Some("cancelled") => Err(bad_request(json!({"detail": "Chalan is cancelled"}))),
        _ => Ok(()),
    }
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn mark_paid(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
    path: web::Path<u64>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    let id = path.into_inner();
    let record = state.get_mut_or_404(Table::Chalans, id)?;
    ensure_open(record)?;
    let amount = amount_of(&body["payment_amount"])
        .filter(|x| *x > 0.0)
        .ok_or_else(|| bad_request(json!({"error": "Payment amount must be greater than 0"})))?;
    let fees = amount_of(&record["fees_amount"]).unwrap_or_default();
    let paid = amount_of(&record["paid_amount"]).unwrap_or_default() + amount;
    record["paid_amount"] = format_amount(paid);
    record["remaining_amount"] = format_amount((fees - paid).max(0.0));
    record["is_paid"] = json!(true);
    record["status"] = json!("paid");
    record["payment_date"] = json!(chrono::Utc::now().to_rfc3339());
    if let Some(reference) = body["payment_reference"].as_str() {
        record["payment_reference"] = json!(reference);
    }
    state.add_history(
        Table::Chalans,
        id,
        json!({"action": "paid", "performed_by": session.0, "changes": body, "notes": ""}),
    );
    Ok(HttpResponse::Ok().json(json!({"message": "Chalan marked as paid"})))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn update_fees(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
    path: web::Path<u64>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    let id = path.into_inner();
    let record = state.get_mut_or_404(Table::Chalans, id)?;
    ensure_open(record)?;
    let fees = amount_of(&body["fees_amount"])
        .filter(|x| *x > 0.0)
        .ok_or_else(|| bad_request(json!({"error": "Fees amount must be greater than 0"})))?;
    let paid = amount_of(&record["paid_amount"]).unwrap_or_default();
    record["fees_amount"] = format_amount(fees);
    record["remaining_amount"] = format_amount((fees - paid).max(0.0));
    state.add_history(
        Table::Chalans,
        id,
        json!({"action": "fees_updated", "performed_by": session.0, "changes": body, "notes": ""}),
    );
    Ok(HttpResponse::Ok().json(json!({"message": "Fees updated"})))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn cancel(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
    path: web::Path<u64>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    let id = path.into_inner();
    let record = state.get_mut_or_404(Table::Chalans, id)?;
    ensure_open(record)?;
    let reason = body["reason"].as_str().unwrap_or_default().trim().to_string();
    if reason.is_empty() {
        return Err(bad_request(json!({"reason": ["This field is required."]})));
    }
    record["status"] = json!("cancelled");
    record["remarks"] = json!(reason);
    state.add_history(
        Table::Chalans,
        id,
        json!({"action": "cancelled", "performed_by": session.0, "changes": {}, "notes": reason}),
    );
    Ok(HttpResponse::Ok().json(json!({"message": "Chalan cancelled"})))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn history(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<web::Json<Value>> {
    let state = backend.enter(&req, None);
    let id = path.into_inner();
    state.get_or_404(Table::Chalans, id)?;
    Ok(web::Json(json!(state.history(Table::Chalans, id))))
}

#[tracing::instrument(skip(backend))]
pub async fn statistics(req: HttpRequest, backend: web::Data<BackendHandle>) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    let rows = state.rows(Table::Chalans);
    let mut by_status: BTreeMap<String, u64> = BTreeMap::new();
    let mut total_fees = 0.0;
    let mut total_paid = 0.0;
    let mut pending = 0.0;
    for row in &rows {
        let status = row["status"].as_str().unwrap_or_default().to_string();
        *by_status.entry(status.clone()).or_default() += 1;
        total_fees += amount_of(&row["fees_amount"]).unwrap_or_default();
        total_paid += amount_of(&row["paid_amount"]).unwrap_or_default();
        if status != "cancelled" {
            pending += amount_of(&row["remaining_amount"]).unwrap_or_default();
        }
    }
    web::Json(json!({
        "total_chalans": rows.len(),
        "by_status": by_status,
        "total_fees_amount": format_amount(total_fees),
        "total_paid_amount": format_amount(total_paid),
        "pending_collection": format_amount(pending),
    }))
}
