use std::collections::HashMap;

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use serde_json::{json, Value};

use super::{
    bad_request, list_response, reject, state::Account, BackendHandle, BackendState, Table,
};

#[tracing::instrument(skip(backend))]
pub async fn list_users(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Query(query): web::Query<HashMap<String, String>>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    let rows = state
        .accounts
        .iter()
        .map(|account| state.user_json(account))
        .collect();
    web::Json(list_response(rows, &query))
}

fn role_id_from(state: &BackendState, value: &Value) -> actix_web::Result<Option<u64>> {
    if value.is_null() {
        return Ok(None);
    }
    value
        .as_u64()
        .filter(|id| state.get(Table::Roles, *id).is_some())
        .map(Some)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, json!({"detail": "Role not found."})))
}

#[tracing::instrument(ret, err(Debug), skip(backend, body))]
pub async fn create_user(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, None);
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    if username.is_empty() || password.is_empty() {
        return Err(bad_request(
            json!({"error": "Username and password are required"}),
        ));
    }
    if state.accounts.iter().any(|x| x.username == username) {
        return Err(bad_request(
            json!({"error": "A user with that username already exists."}),
        ));
    }
    let role_id = role_id_from(&state, &body["role_id"])?;
    let account = Account {
        id: state.next_id(),
        username,
        email: body["email"].as_str().unwrap_or_default().to_string(),
        first_name: body["first_name"].as_str().unwrap_or_default().to_string(),
        last_name: body["last_name"].as_str().unwrap_or_default().to_string(),
        password,
        is_staff: false,
        is_active: true,
        role_id,
    };
    let user = state.user_json(&account);
    state.accounts.push(account);
    Ok(HttpResponse::Created().json(json!({"message": "User created successfully", "user": user})))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn assign_role(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    let role_id = role_id_from(&state, &body["role_id"])?;
    state.account_mut_or_404(path.into_inner())?.role_id = role_id;
    Ok(HttpResponse::Ok().json(json!({"message": "Role assigned"})))
}

async fn set_active(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    user_id: u64,
    is_active: bool,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, None);
    state.account_mut_or_404(user_id)?.is_active = is_active;
    if !is_active {
        state.sessions.retain(|_, id| *id != user_id);
    }
    Ok(HttpResponse::Ok().json(json!({"is_active": is_active})))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn activate_user(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    set_active(req, backend, path.into_inner(), true).await
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn deactivate_user(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    set_active(req, backend, path.into_inner(), false).await
}

#[tracing::instrument(skip(backend))]
pub async fn list_roles(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Query(query): web::Query<HashMap<String, String>>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    let rows = state
        .rows(Table::Roles)
        .into_iter()
        .map(|mut role| {
            let user_count = state
                .accounts
                .iter()
                .filter(|x| x.role_id.is_some_and(|id| role["id"] == json!(id)))
                .count();
            role["user_count"] = json!(user_count);
            role
        })
        .collect();
    web::Json(list_response(rows, &query))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn create_role(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    let name = body["name"].as_str().unwrap_or_default().trim().to_lowercase();
    if name.is_empty() {
        return Err(bad_request(json!({"name": ["This field is required."]})));
    }
    if state
        .rows(Table::Roles)
        .iter()
        .any(|x| x["name"].as_str() == Some(name.as_str()))
    {
        return Err(bad_request(
            json!({"non_field_errors": ["Role with this name already exists."]}),
        ));
    }
    let record = json!({
        "name": name,
        "display_name": name,
        "description": body["description"].as_str().unwrap_or_default(),
        "features": [],
        "is_active": true,
    });
    let id = state.insert(Table::Roles, record);
    Ok(HttpResponse::Created().json(state.get_or_404(Table::Roles, id)?))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn role_detail(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<web::Json<Value>> {
    let state = backend.enter(&req, None);
    Ok(web::Json(
        state.get_or_404(Table::Roles, path.into_inner())?.clone(),
    ))
}

fn feature_grant(state: &BackendState, body: &Value) -> actix_web::Result<Value> {
    let feature = body["feature_id"]
        .as_u64()
        .and_then(|id| state.get(Table::Features, id))
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, json!({"detail": "Feature not found."})))?;
    Ok(json!({
        "id": feature["id"],
        "name": feature["name"],
        "display_name": feature["display_name"],
    }))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn add_feature(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    let grant = feature_grant(&state, &body)?;
    let role = state.get_mut_or_404(Table::Roles, path.into_inner())?;
    let mut features = role["features"].as_array().cloned().unwrap_or_default();
    if features.iter().any(|x| x["id"] == grant["id"]) {
        return Err(bad_request(
            json!({"error": "Feature already assigned to this role"}),
        ));
    }
    features.push(grant);
    role["features"] = json!(features);
    Ok(HttpResponse::Ok().json(json!({"message": "Feature added"})))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn remove_feature(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    path: web::Path<u64>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    let grant = feature_grant(&state, &body)?;
    let role = state.get_mut_or_404(Table::Roles, path.into_inner())?;
    let Some(features) = role["features"].as_array_mut() else {
        return Err(bad_request(json!({"error": "Feature not assigned to this role"})));
    };
    let before = features.len();
    features.retain(|x| x["id"] != grant["id"]);
    if features.len() == before {
        return Err(bad_request(json!({"error": "Feature not assigned to this role"})));
    }
    Ok(HttpResponse::Ok().json(json!({"message": "Feature removed"})))
}

#[tracing::instrument(skip(backend))]
pub async fn list_features(req: HttpRequest, backend: web::Data<BackendHandle>) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    web::Json(json!(state.rows(Table::Features)))
}
