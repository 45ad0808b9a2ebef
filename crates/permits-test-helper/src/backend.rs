//! In memory stand in for the permits REST API
//!
//! Only as much behaviour as the clients rely on is reproduced. Records are
//! kept as JSON so responses carry the same loosely typed shapes the real
//! backend sends.

mod admin;
mod auth;
mod catalog;
mod chalans;
mod notifications;
mod reports;
mod state;

use std::{
    collections::HashMap,
    net::TcpListener,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    error::InternalError,
    http::StatusCode,
    middleware::{from_fn, Next},
    web, App, HttpMessage as _, HttpRequest, HttpResponse, HttpServer,
};
use anyhow::Context as _;
use permits_shared::const_config::client::{CLIENT_API_KEY_HEADER, CLIENT_AUTH_SCHEME};
use serde_json::{json, Value};
use tracing::{info, warn};

pub use state::{BackendState, RecordedRequest, Table};

/// Id of the account making the request, set once the token was accepted
#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionUser(pub u64);

/// Shared access to the state of a running backend
#[derive(Debug, Clone)]
pub struct BackendHandle(Arc<Mutex<BackendState>>);

impl BackendHandle {
    fn new(api_key: String) -> Self {
        Self(Arc::new(Mutex::new(BackendState::seeded(api_key))))
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.0.lock().expect("mutex poisoned")
    }

    /// Locks the state and records the request being handled
    pub(crate) fn enter(
        &self,
        req: &HttpRequest,
        body: Option<&Value>,
    ) -> MutexGuard<'_, BackendState> {
        let mut guard = self.lock();
        guard.requests.push(RecordedRequest {
            method: req.method().to_string(),
            path: req.path().to_string(),
            query: req.query_string().to_string(),
            body: body.cloned(),
        });
        guard
    }

    /// Requests received so far with the given method and path (path
    /// excludes the query string)
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|x| x.method == method && x.path == path)
            .cloned()
            .collect()
    }

    /// Makes every request to `path` with `method` fail with the given
    /// response until [`Self::clear_failures`] is called
    pub fn fail_requests(&self, method: &str, path: &str, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.lock().forced_failures.insert(
            (method.to_string(), path.to_string()),
            state::ForcedFailure { status, body },
        );
    }

    /// Holds every request to `path` with `method` for `delay` before it is
    /// handled, the session is checked only after the wait
    pub fn delay_requests(&self, method: &str, path: &str, delay: Duration) {
        self.lock()
            .delays
            .insert((method.to_string(), path.to_string()), delay);
    }

    pub fn clear_failures(&self) {
        self.lock().forced_failures.clear();
    }

    /// Drops all sessions as if they had expired
    pub fn expire_sessions(&self) {
        self.lock().sessions.clear();
    }

    pub fn active_session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn record(&self, table: Table, id: u64) -> Option<Value> {
        self.lock().get(table, id).cloned()
    }

    /// Stores `value` as is under `id`, replacing any existing record
    pub fn put_record(&self, table: Table, id: u64, value: Value) {
        self.lock().put(table, id, value);
    }
}

/// Builds an error whose response carries `body` as JSON
pub(crate) fn reject(status: StatusCode, body: Value) -> actix_web::Error {
    InternalError::from_response(body.to_string(), HttpResponse::build(status).json(body)).into()
}

pub(crate) fn bad_request(body: Value) -> actix_web::Error {
    reject(StatusCode::BAD_REQUEST, body)
}

/// Filters, pages and wraps rows the way the list endpoints do
pub(crate) fn list_response(rows: Vec<Value>, query: &HashMap<String, String>) -> Value {
    let search = query
        .get("search")
        .map(|x| x.to_lowercase())
        .filter(|x| !x.is_empty());
    let matching: Vec<Value> = rows
        .into_iter()
        .filter(|row| {
            search.as_ref().is_none_or(|needle| {
                row.as_object().is_some_and(|fields| {
                    fields.values().any(|v| {
                        v.as_str()
                            .is_some_and(|s| s.to_lowercase().contains(needle.as_str()))
                    })
                })
            })
        })
        .filter(|row| field_matches(row, query, "status"))
        .filter(|row| field_matches(row, query, "authority"))
        .collect();
    let count = matching.len();
    let offset = parse_or(query, "offset", 0);
    let limit = parse_or(query, "limit", count.max(1));
    let results: Vec<Value> = matching.into_iter().skip(offset).take(limit).collect();
    json!({"count": count, "next": null, "previous": null, "results": results})
}

fn field_matches(row: &Value, query: &HashMap<String, String>, field: &str) -> bool {
    query
        .get(field)
        .is_none_or(|expected| row[field].as_str() == Some(expected.as_str()))
}

fn parse_or(query: &HashMap<String, String>, key: &str, default: usize) -> usize {
    query
        .get(key)
        .and_then(|x| x.parse().ok())
        .unwrap_or(default)
}

/// Reads an amount sent either as a string or a number
pub(crate) fn amount_of(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

pub(crate) fn format_amount(value: f64) -> Value {
    json!(format!("{value:.2}"))
}

#[tracing::instrument(skip(next))]
async fn require_api_key(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let Some(backend) = req.app_data::<web::Data<BackendHandle>>().cloned() else {
        return Err(reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"detail": "backend state missing"}),
        ));
    };
    let delay = {
        let mut state = backend.lock();
        let key = req
            .headers()
            .get(CLIENT_API_KEY_HEADER)
            .and_then(|x| x.to_str().ok());
        if key != Some(state.api_key.as_str()) {
            warn!(?key, "request rejected for invalid api key");
            return Err(reject(
                StatusCode::FORBIDDEN,
                json!({"detail": "Invalid or missing API key."}),
            ));
        }
        let failure_key = (req.method().to_string(), req.path().to_string());
        if let Some(failure) = state.forced_failures.get(&failure_key) {
            let err = reject(failure.status, failure.body.clone());
            state.requests.push(RecordedRequest {
                method: failure_key.0,
                path: failure_key.1,
                query: req.query_string().to_string(),
                body: None,
            });
            return Err(err);
        }
        state.delays.get(&failure_key).copied()
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    next.call(req).await
}

#[tracing::instrument(skip(next))]
async fn require_session(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let Some(backend) = req.app_data::<web::Data<BackendHandle>>().cloned() else {
        return Err(reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"detail": "backend state missing"}),
        ));
    };
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|x| x.to_str().ok())
        .and_then(|x| x.strip_prefix(CLIENT_AUTH_SCHEME))
        .map(|x| x.trim().to_string());
    let account_id = token.and_then(|token| backend.lock().sessions.get(&token).copied());
    match account_id {
        Some(id) => {
            req.extensions_mut().insert(SessionUser(id));
            next.call(req).await
        }
        None => Err(reject(
            StatusCode::UNAUTHORIZED,
            json!({"detail": "Invalid token."}),
        )),
    }
}

async fn not_found(req: HttpRequest) -> actix_web::Result<HttpResponse> {
    warn!(method = ?req.method(), path = req.path(), "Failed to match route");
    Err(reject(StatusCode::NOT_FOUND, json!({"detail": "Not found."})))
}

/// Starts the backend on a random port and returns the port and a handle to
/// its state
pub async fn start_backend_in_background(api_key: String) -> anyhow::Result<(u16, BackendHandle)> {
    let backend = BackendHandle::new(api_key);
    let listener = TcpListener::bind("127.0.0.1:0").context("failed to bind to random port")?;
    let port = listener
        .local_addr()
        .context("failed to get local address of listener")?
        .port();
    info!(?port, "Port assigned to the test backend is {port}");

    let data = web::Data::new(backend.clone());
    let server = HttpServer::new(move || {
        App::new().app_data(data.clone()).service(
            web::scope("/api")
                .wrap(from_fn(require_api_key))
                .route("/health/", web::get().to(auth::health_check))
                .route("/auth/login/", web::post().to(auth::login))
                .route("/auth/register/", web::post().to(auth::register))
                .service(
                    web::scope("")
                        .wrap(from_fn(require_session))
                        .service(
                            web::scope("/auth")
                                .route("/logout/", web::post().to(auth::logout))
                                .route("/user/", web::get().to(auth::current_user))
                                .route("/change-password/", web::post().to(auth::change_password))
                                .route("/update-profile/", web::put().to(auth::update_profile)),
                        )
                        .service(
                            web::scope("/chalans")
                                .route("/", web::get().to(chalans::list))
                                .route("/", web::post().to(chalans::create))
                                .route("/statistics/", web::get().to(chalans::statistics))
                                .route("/{id}/", web::get().to(chalans::detail))
                                .route("/{id}/", web::patch().to(chalans::update))
                                .route("/{id}/mark_as_paid/", web::post().to(chalans::mark_paid))
                                .route("/{id}/update_fees/", web::patch().to(chalans::update_fees))
                                .route("/{id}/cancel/", web::post().to(chalans::cancel))
                                .route("/{id}/history/", web::get().to(chalans::history)),
                        )
                        .service(
                            web::scope("/vehicle-fee-structures")
                                .route("/", web::get().to(catalog::list_fees))
                                .route("/", web::post().to(catalog::create_fee))
                                .route("/by_vehicle/", web::get().to(catalog::fees_by_vehicle))
                                .route("/active_only/", web::get().to(catalog::active_fees))
                                .route("/{id}/", web::get().to(catalog::fee_detail))
                                .route("/{id}/", web::patch().to(catalog::update_fee))
                                .route("/{id}/", web::delete().to(catalog::delete_fee)),
                        )
                        .service(
                            web::scope("/vehicle-types")
                                .route("/", web::get().to(catalog::list_vehicle_types))
                                .route("/", web::post().to(catalog::create_vehicle_type))
                                .route("/{id}/", web::get().to(catalog::vehicle_type_detail))
                                .route("/{id}/", web::put().to(catalog::update_vehicle_type))
                                .route("/{id}/", web::delete().to(catalog::delete_vehicle_type)),
                        )
                        .service(
                            web::scope("/permit-types")
                                .route("/", web::get().to(catalog::list_permit_types))
                                .route("/", web::post().to(catalog::create_permit_type))
                                .route("/{id}/", web::put().to(catalog::update_permit_type))
                                .route("/{id}/", web::delete().to(catalog::delete_permit_type)),
                        )
                        .service(
                            web::scope("/permits")
                                .route("/", web::get().to(catalog::list_permits))
                                .route("/", web::post().to(catalog::create_permit))
                                .route(
                                    "/report_detailed_stats/",
                                    web::get().to(reports::detailed_stats),
                                )
                                .route(
                                    "/report_permits_by_type/",
                                    web::get().to(reports::permits_by_type),
                                )
                                .route(
                                    "/report_permits_by_vehicle/",
                                    web::get().to(reports::permits_by_vehicle),
                                )
                                .route(
                                    "/report_authority_summary/",
                                    web::get().to(reports::authority_summary),
                                )
                                .route(
                                    "/report_expiring_permits/",
                                    web::get().to(reports::expiring_permits),
                                )
                                .route("/{id}/", web::get().to(catalog::permit_detail))
                                .route("/{id}/", web::patch().to(catalog::update_permit))
                                .route("/{id}/history/", web::get().to(catalog::permit_history)),
                        )
                        .service(
                            web::scope("/users")
                                .route("/", web::get().to(admin::list_users))
                                .route("/create-user/", web::post().to(admin::create_user))
                                .route("/{id}/assign_role/", web::post().to(admin::assign_role))
                                .route("/{id}/activate/", web::post().to(admin::activate_user))
                                .route("/{id}/deactivate/", web::post().to(admin::deactivate_user)),
                        )
                        .service(
                            web::scope("/roles")
                                .route("/", web::get().to(admin::list_roles))
                                .route("/", web::post().to(admin::create_role))
                                .route("/{id}/", web::get().to(admin::role_detail))
                                .route("/{id}/add-feature/", web::post().to(admin::add_feature))
                                .route("/{id}/remove-feature/", web::post().to(admin::remove_feature)),
                        )
                        .route("/features/", web::get().to(admin::list_features))
                        .service(
                            web::scope("/notifications")
                                .route("/", web::get().to(notifications::list))
                                .route("/unread_count/", web::get().to(notifications::unread_count))
                                .route(
                                    "/mark_all_as_read/",
                                    web::post().to(notifications::mark_all_as_read),
                                )
                                .route("/clear_read/", web::delete().to(notifications::clear_read))
                                .route(
                                    "/{id}/mark_as_read/",
                                    web::post().to(notifications::mark_as_read),
                                ),
                        )
                        .default_service(web::route().to(not_found)),
                ),
        )
    })
    .workers(1)
    .listen(listener)
    .context("failed to listen on test backend port")?
    .run();

    // Detached, the server stops with the test runtime
    tokio::spawn(server);
    Ok((port, backend))
}
