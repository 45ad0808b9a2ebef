use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::{json, Value};

use super::{
    amount_of, bad_request, format_amount, list_response, state::BackendState, BackendHandle,
    SessionUser, Table,
};

fn vehicle_type_name(state: &BackendState, vehicle_type: &Value) -> actix_web::Result<Value> {
    vehicle_type
        .as_u64()
        .and_then(|id| state.get(Table::VehicleTypes, id))
        .map(|x| x["name"].clone())
        .ok_or_else(|| bad_request(json!({"vehicle_type": ["Invalid vehicle type."]})))
}

fn validated_fee(state: &BackendState, body: &Value) -> actix_web::Result<Value> {
    let mut result = body.clone();
    if let Some(vehicle_type) = body.get("vehicle_type") {
        result["vehicle_type_name"] = vehicle_type_name(state, vehicle_type)?;
    }
    if let Some(base_fee) = body.get("base_fee") {
        let fee = amount_of(base_fee)
            .filter(|x| *x > 0.0)
            .ok_or_else(|| bad_request(json!({"message": "Base fee must be greater than 0"})))?;
        result["base_fee"] = format_amount(fee);
    }
    Ok(result)
}

#[tracing::instrument(skip(backend))]
pub async fn list_fees(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Query(query): web::Query<HashMap<String, String>>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    web::Json(list_response(state.rows(Table::FeeStructures), &query))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn create_fee(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    if body.get("vehicle_type").is_none() {
        return Err(bad_request(json!({"vehicle_type": ["This field is required."]})));
    }
    let record = validated_fee(&state, &body)?;
    let id = state.insert(Table::FeeStructures, record);
    Ok(HttpResponse::Created().json(state.get_or_404(Table::FeeStructures, id)?))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn fee_detail(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<web::Json<Value>> {
    let state = backend.enter(&req, None);
    Ok(web::Json(
        state.get_or_404(Table::FeeStructures, path.into_inner())?.clone(),
    ))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn update_fee(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<web::Json<Value>> {
    let mut state = backend.enter(&req, Some(&body));
    let changes = validated_fee(&state, &body)?;
    let record = state.get_mut_or_404(Table::FeeStructures, path.into_inner())?;
    if let Some(changes) = changes.as_object() {
        for (key, value) in changes {
            record[key] = value.clone();
        }
    }
    Ok(web::Json(record.clone()))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn delete_fee(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, None);
    state.remove(Table::FeeStructures, path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn fees_by_vehicle(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Query(query): web::Query<HashMap<String, String>>,
) -> actix_web::Result<web::Json<Value>> {
    let state = backend.enter(&req, None);
    let vehicle_type: u64 = query
        .get("vehicle_type_id")
        .and_then(|x| x.parse().ok())
        .ok_or_else(|| bad_request(json!({"error": "vehicle_type_id parameter is required"})))?;
    let rows: Vec<Value> = state
        .rows(Table::FeeStructures)
        .into_iter()
        .filter(|x| x["vehicle_type"] == json!(vehicle_type))
        .collect();
    Ok(web::Json(json!(rows)))
}

#[tracing::instrument(skip(backend))]
pub async fn active_fees(req: HttpRequest, backend: web::Data<BackendHandle>) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    let rows: Vec<Value> = state
        .rows(Table::FeeStructures)
        .into_iter()
        .filter(|x| x["is_active"] == json!(true))
        .collect();
    web::Json(json!(rows))
}

#[tracing::instrument(skip(backend))]
pub async fn list_vehicle_types(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Query(query): web::Query<HashMap<String, String>>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    web::Json(list_response(state.rows(Table::VehicleTypes), &query))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn vehicle_type_detail(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<web::Json<Value>> {
    let state = backend.enter(&req, None);
    Ok(web::Json(
        state.get_or_404(Table::VehicleTypes, path.into_inner())?.clone(),
    ))
}

/// Fails with the field errors the real serializers report for blank
/// required fields
fn check_required(body: &Value, fields: &[&str]) -> actix_web::Result<()> {
    let mut errors = serde_json::Map::new();
    for field in fields {
        let is_blank = match &body[*field] {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        };
        if is_blank {
            errors.insert(field.to_string(), json!(["This field is required."]));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(bad_request(Value::Object(errors)))
    }
}

fn check_vehicle_type(body: &Value) -> actix_web::Result<()> {
    check_required(body, &["name", "icon", "permit_duration_days"])?;
    match body["permit_duration_days"].as_u64() {
        Some(1..=10950) => Ok(()),
        _ => Err(bad_request(json!({"permit_duration_days":
            ["Ensure this value is between 1 and 10950."]}))),
    }
}

/// Replaces the stored fields with those sent, as a full update does
fn replace_fields(record: &mut Value, body: &Value) {
    if let Some(changes) = body.as_object() {
        for (key, value) in changes {
            if key != "id" {
                record[key] = value.clone();
            }
        }
    }
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn create_vehicle_type(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    check_vehicle_type(&body)?;
    let mut record = body.clone();
    record["is_active"] = json!(true);
    let id = state.insert(Table::VehicleTypes, record);
    Ok(HttpResponse::Created().json(state.get_or_404(Table::VehicleTypes, id)?))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn update_vehicle_type(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<web::Json<Value>> {
    let mut state = backend.enter(&req, Some(&body));
    check_vehicle_type(&body)?;
    let record = state.get_mut_or_404(Table::VehicleTypes, path.into_inner())?;
    replace_fields(record, &body);
    Ok(web::Json(record.clone()))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn delete_vehicle_type(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, None);
    state.remove(Table::VehicleTypes, path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

/// Sent as a bare array like some of the real list endpoints
#[tracing::instrument(skip(backend))]
pub async fn list_permit_types(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    web::Json(json!(state.rows(Table::PermitTypes)))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn create_permit_type(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    check_required(&body, &["name", "code"])?;
    let id = state.insert(Table::PermitTypes, body);
    Ok(HttpResponse::Created().json(state.get_or_404(Table::PermitTypes, id)?))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn update_permit_type(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<web::Json<Value>> {
    let mut state = backend.enter(&req, Some(&body));
    check_required(&body, &["name", "code"])?;
    let record = state.get_mut_or_404(Table::PermitTypes, path.into_inner())?;
    replace_fields(record, &body);
    Ok(web::Json(record.clone()))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn delete_permit_type(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, None);
    state.remove(Table::PermitTypes, path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip(backend))]
pub async fn list_permits(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Query(query): web::Query<HashMap<String, String>>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    web::Json(list_response(state.rows(Table::Permits), &query))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn permit_detail(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<web::Json<Value>> {
    let state = backend.enter(&req, None);
    let id = path.into_inner();
    let mut result = state.get_or_404(Table::Permits, id)?.clone();
    result["history"] = json!(state.history(Table::Permits, id));
    Ok(web::Json(result))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn create_permit(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    let permit_type = body["permit_type"]
        .as_u64()
        .and_then(|id| state.get(Table::PermitTypes, id))
        .cloned()
        .ok_or_else(|| bad_request(json!({"permit_type": ["Invalid permit type."]})))?;
    let vehicle_type = body["vehicle_type"]
        .as_u64()
        .and_then(|id| state.get(Table::VehicleTypes, id))
        .cloned()
        .ok_or_else(|| bad_request(json!({"vehicle_type": ["Invalid vehicle type."]})))?;
    let mut record = body.clone();
    record["permit_type"] = permit_type;
    record["vehicle_type"] = vehicle_type;
    record["status"] = json!("pending");
    let id = state.insert(Table::Permits, record);
    let number = format!("PRM-{id:05}");
    let created = state.get_mut_or_404(Table::Permits, id)?;
    created["permit_number"] = json!(number);
    let created = created.clone();
    let performed_by = state
        .account(session.0)
        .map(|x| x.username.clone())
        .unwrap_or_default();
    state.add_history(
        Table::Permits,
        id,
        json!({"action": "created", "performed_by": performed_by, "changes": {}}),
    );
    Ok(HttpResponse::Created().json(created))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn update_permit(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
    path: web::Path<u64>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<web::Json<Value>> {
    let mut state = backend.enter(&req, Some(&body));
    let id = path.into_inner();
    let performed_by = state
        .account(session.0)
        .map(|x| x.username.clone())
        .unwrap_or_default();
    let record = state.get_mut_or_404(Table::Permits, id)?;
    if let Some(changes) = body.as_object() {
        for (key, value) in changes {
            record[key] = value.clone();
        }
    }
    let result = record.clone();
    state.add_history(
        Table::Permits,
        id,
        json!({"action": "updated", "performed_by": performed_by, "changes": body}),
    );
    Ok(web::Json(result))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn permit_history(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<web::Json<Value>> {
    let state = backend.enter(&req, None);
    let id = path.into_inner();
    state.get_or_404(Table::Permits, id)?;
    Ok(web::Json(json!({"results": state.history(Table::Permits, id)})))
}
