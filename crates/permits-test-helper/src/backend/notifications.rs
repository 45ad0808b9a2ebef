use actix_web::{http::StatusCode, web, HttpRequest};
use serde_json::{json, Value};

use super::{reject, BackendHandle, BackendState, SessionUser, Table};

fn owned_by(state: &BackendState, user: SessionUser) -> Vec<Value> {
    state
        .rows(Table::Notifications)
        .into_iter()
        .filter(|x| x["user"] == json!(user.0))
        .collect()
}

#[tracing::instrument(skip(backend))]
pub async fn list(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    let mut rows = owned_by(&state, *session);
    rows.sort_by(|a, b| b["created_at"].as_str().cmp(&a["created_at"].as_str()));
    web::Json(json!({"count": rows.len(), "next": null, "previous": null, "results": rows}))
}

#[tracing::instrument(skip(backend))]
pub async fn unread_count(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
) -> web::Json<Value> {
    let state = backend.enter(&req, None);
    let count = owned_by(&state, *session)
        .iter()
        .filter(|x| x["is_read"] != json!(true))
        .count();
    web::Json(json!({"unread_count": count}))
}

/// Notifications of other users are reported as missing
#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn mark_as_read(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
    path: web::Path<u64>,
) -> actix_web::Result<web::Json<Value>> {
    let mut state = backend.enter(&req, None);
    let record = state.get_mut_or_404(Table::Notifications, path.into_inner())?;
    if record["user"] != json!(session.0) {
        return Err(reject(
            StatusCode::NOT_FOUND,
            json!({"detail": "No Notification matches the given query."}),
        ));
    }
    record["is_read"] = json!(true);
    record["read_at"] = json!(chrono::Utc::now().to_rfc3339());
    Ok(web::Json(record.clone()))
}

#[tracing::instrument(skip(backend))]
pub async fn mark_all_as_read(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
) -> web::Json<Value> {
    let mut state = backend.enter(&req, None);
    let mut count = 0;
    for mut row in owned_by(&state, *session) {
        if row["is_read"] == json!(true) {
            continue;
        }
        row["is_read"] = json!(true);
        let id = row["id"].as_u64().unwrap_or_default();
        state.put(Table::Notifications, id, row);
        count += 1;
    }
    web::Json(json!({
        "marked_as_read_count": count,
        "message": format!("{count} notifications marked as read"),
    }))
}

#[tracing::instrument(skip(backend))]
pub async fn clear_read(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
) -> web::Json<Value> {
    let mut state = backend.enter(&req, None);
    let mut count = 0;
    for row in owned_by(&state, *session) {
        if row["is_read"] != json!(true) {
            continue;
        }
        if let Some(id) = row["id"].as_u64() {
            if state.remove(Table::Notifications, id).is_ok() {
                count += 1;
            }
        }
    }
    web::Json(json!({
        "deleted_count": count,
        "message": format!("{count} read notifications deleted"),
    }))
}
