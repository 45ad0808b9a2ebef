use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use serde_json::{json, Value};

use super::{bad_request, reject, state::Account, BackendHandle, SessionUser};

pub async fn health_check(req: HttpRequest, backend: web::Data<BackendHandle>) -> HttpResponse {
    let _state = backend.enter(&req, None);
    HttpResponse::Ok().finish()
}

fn text(body: &Value, field: &str) -> String {
    body[field].as_str().unwrap_or_default().trim().to_string()
}

#[tracing::instrument(ret, err(Debug), skip(backend, body))]
pub async fn login(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, None);
    let username = text(&body, "username");
    let password = body["password"].as_str().unwrap_or_default();
    let Some(account) = state
        .accounts
        .iter()
        .find(|x| x.username == username && x.password == password)
        .cloned()
    else {
        return Err(bad_request(json!({
            "non_field_errors": ["Unable to log in with provided credentials."]
        })));
    };
    if !account.is_active {
        return Err(bad_request(json!({"detail": "User account is disabled."})));
    }
    let token = state.start_session(account.id);
    let user = state.user_json(&account);
    Ok(HttpResponse::Ok().json(json!({"user": user, "token": token, "message": "Login successful"})))
}

#[tracing::instrument(ret, err(Debug), skip(backend, body))]
pub async fn register(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, None);
    let username = text(&body, "username");
    let password = body["password"].as_str().unwrap_or_default().to_string();
    if username.is_empty() || password.is_empty() {
        return Err(bad_request(
            json!({"errors": {"message": "Username and password are required"}}),
        ));
    }
    if body["password2"].as_str() != Some(password.as_str()) {
        return Err(bad_request(
            json!({"errors": {"non_field_errors": ["Password fields didn't match."]}}),
        ));
    }
    if state.accounts.iter().any(|x| x.username == username) {
        return Err(bad_request(
            json!({"errors": {"error": "A user with that username already exists."}}),
        ));
    }
    let account = Account {
        id: state.next_id(),
        username,
        email: text(&body, "email"),
        first_name: text(&body, "first_name"),
        last_name: text(&body, "last_name"),
        password,
        is_staff: false,
        is_active: true,
        role_id: None,
    };
    state.accounts.push(account.clone());
    let token = state.start_session(account.id);
    let user = state.user_json(&account);
    Ok(HttpResponse::Created().json(json!({"user": user, "token": token})))
}

#[tracing::instrument(skip(backend))]
pub async fn logout(req: HttpRequest, backend: web::Data<BackendHandle>) -> HttpResponse {
    let mut state = backend.enter(&req, None);
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|x| x.to_str().ok())
        .and_then(|x| x.split_whitespace().last())
        .map(ToString::to_string);
    if let Some(token) = token {
        state.sessions.remove(&token);
    }
    HttpResponse::Ok().json(json!({"message": "Successfully logged out."}))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn current_user(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
) -> actix_web::Result<web::Json<Value>> {
    let state = backend.enter(&req, None);
    let account = state.account(session.0).ok_or_else(|| {
        reject(StatusCode::UNAUTHORIZED, json!({"detail": "User not found."}))
    })?;
    Ok(web::Json(json!({"user": state.user_json(account)})))
}

#[tracing::instrument(ret, err(Debug), skip(backend, body))]
pub async fn change_password(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, None);
    let account = state.account_mut_or_404(session.0)?;
    if body["old_password"].as_str() != Some(account.password.as_str()) {
        return Err(bad_request(json!({"error": "Old password is incorrect"})));
    }
    let new_password = body["new_password"].as_str().unwrap_or_default();
    if body["confirm_password"].as_str() != Some(new_password) {
        return Err(bad_request(json!({"error": "New passwords do not match"})));
    }
    account.password = new_password.to_string();
    Ok(HttpResponse::Ok().json(json!({"message": "Password changed successfully"})))
}

#[tracing::instrument(ret, err(Debug), skip(backend))]
pub async fn update_profile(
    req: HttpRequest,
    backend: web::Data<BackendHandle>,
    session: web::ReqData<SessionUser>,
    web::Json(body): web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let mut state = backend.enter(&req, Some(&body));
    let account = state.account_mut_or_404(session.0)?;
    if let Some(email) = body["email"].as_str() {
        if !email.contains('@') {
            return Err(bad_request(json!({"message": "Enter a valid email address."})));
        }
        account.email = email.to_string();
    }
    if let Some(first_name) = body["first_name"].as_str() {
        account.first_name = first_name.to_string();
    }
    if let Some(last_name) = body["last_name"].as_str() {
        account.last_name = last_name.to_string();
    }
    Ok(HttpResponse::Ok().json(json!({"message": "Profile updated successfully"})))
}
