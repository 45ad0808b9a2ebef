use anyhow::Context;
use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use futures::channel::oneshot;
use permits_shared::{
    const_config::{
        client::{
            CLIENT_API_KEY_HEADER, CLIENT_AUTH_SCHEME, CLIENT_DEFAULT_API_BASE_URL,
            CLIENT_DEFAULT_API_KEY,
        },
        path::{ResolvedPath, PATH_AUTH_LOGIN, PATH_AUTH_REGISTER, PATH_HEALTH_CHECK},
    },
    errors::ApiFailure,
    log_err_as_warn,
    req_args::{LoginReqArgs, RegisterReqArgs},
    uac::{LoginResponse, RegisterResponse, User},
};
use reqwest::Method;
use secrecy::{ExposeSecret as _, SecretString};
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub mod api;

/// Query string for requests that take no parameters
pub const DUMMY_ARGUMENT: &[(&str, &str)] = &[];

/// Serializes to `{}` for actions that are posted without fields
#[derive(Debug, serde::Serialize)]
pub(crate) struct EmptyBody {}

/// Handle to the backend, cheap to clone and all clones share the session
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    inner: Arc<Mutex<ClientInner>>,
}

#[derive(Debug)]
struct ClientInner {
    base_url: String,
    api_key: SecretString,
    session: Option<Session>,
}

/// The user is only known once the backend has confirmed the token
#[derive(Debug)]
struct Session {
    token: SecretString,
    user: Option<Arc<User>>,
}

impl Session {
    fn has_token(&self, token: &SecretString) -> bool {
        self.token.expose_secret() == token.expose_secret()
    }
}

/// The client as it was when a request was sent
///
/// Responses only change the session they were sent under. A response that
/// arrives after a logout or a new login must leave the current session alone.
#[derive(Debug, Clone)]
pub(crate) struct RequestOrigin {
    client: Client,
    token: Option<SecretString>,
}

impl RequestOrigin {
    /// Drops the session if it is still the one the request was sent under
    fn end_session(&self) {
        if let Some(token) = self.token.as_ref() {
            self.client.clear_session_with_token(token);
        }
    }

    fn set_session_user(&self, user: User) -> Arc<User> {
        let user = Arc::new(user);
        let mut guard = self.client.inner.lock().expect("mutex poisoned");
        match (guard.session.as_mut(), self.token.as_ref()) {
            (Some(session), Some(token)) if session.has_token(token) => {
                session.user = Some(Arc::clone(&user));
            }
            _ => warn!("user info received for a session that is no longer current"),
        }
        user
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(
            CLIENT_DEFAULT_API_BASE_URL.to_string(),
            CLIENT_DEFAULT_API_KEY.to_string().into(),
        )
    }
}

impl ClientInner {
    #[tracing::instrument(skip(api_key))]
    fn new(base_url: String, api_key: SecretString) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            session: None,
        }
    }
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE", skip(api_key))]
    pub fn new(base_url: String, api_key: SecretString) -> Self {
        let api_client = reqwest::Client::builder()
            .build()
            .expect("Unable to create reqwest client");
        Self {
            api_client,
            inner: Arc::new(Mutex::new(ClientInner::new(base_url, api_key))),
        }
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn login<F: UiCallBack>(
        &self,
        args: LoginReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Arc<User>>> {
        let (tx, rx) = oneshot::channel();
        let args = serde_json::json!({
            "username": args.username,
            "password": args.password.expose_secret(),
        });
        let origin = self.request_origin();
        let token = origin.token.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_login(resp, origin).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(PATH_AUTH_LOGIN.into(), &args, token, on_done);
        rx
    }

    /// Registering also logs the new user in
    #[tracing::instrument(skip(ui_notify))]
    pub fn register<F: UiCallBack>(
        &self,
        args: &RegisterReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Arc<User>>> {
        let (tx, rx) = oneshot::channel();
        let args = serde_json::json!({
            "username": args.username,
            "email": args.email,
            "password": args.password.expose_secret(),
            "password2": args.password_confirmation.expose_secret(),
            "first_name": args.first_name,
            "last_name": args.last_name,
        });
        let origin = self.request_origin();
        let token = origin.token.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_register(resp, origin).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(PATH_AUTH_REGISTER.into(), &args, token, on_done);
        rx
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn health_check<F>(&self, ui_notify: F) -> oneshot::Receiver<anyhow::Result<()>>
    where
        F: UiCallBack,
    {
        self.send_request_expect_empty(PATH_HEALTH_CHECK.into(), &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(args, on_done))]
    // WARNING: Must skip args as it my contain sensitive info and "safe" versions
    // would usually already be logged by the caller
    fn initiate_request<T, F, O>(
        &self,
        path: ResolvedPath,
        args: &T,
        token: Option<SecretString>,
        on_done: F,
    ) where
        T: serde::Serialize + Debug,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let (url, api_key) = {
            let guard = self.inner.lock().expect("failed to unlock client mutex");
            (
                format!("{}{}", guard.base_url, path.path),
                guard.api_key.clone(),
            )
        };
        let mut request = self
            .api_client
            .request(path.method.clone(), url)
            .header(CLIENT_API_KEY_HEADER, api_key.expose_secret());
        if let Some(token) = token {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("{CLIENT_AUTH_SCHEME} {}", token.expose_secret()),
            );
        }
        request = if path.method == Method::GET {
            request.query(&args)
        } else if path.method == Method::DELETE {
            request
        } else {
            request.json(&args)
        };
        reqwest_cross::fetch(request, on_done)
    }

    fn send_request_expect_json<F, T, U>(
        &self,
        path: ResolvedPath,
        args: &T,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<U>>
    where
        T: serde::Serialize + std::fmt::Debug,
        F: UiCallBack,
        U: Send + std::fmt::Debug + serde::de::DeserializeOwned + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let origin = self.request_origin();
        let token = origin.token.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_json_body(resp, origin).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(path, args, token, on_done);
        rx
    }

    /// Any body in a successful response is ignored
    fn send_request_expect_empty<F, T>(
        &self,
        path: ResolvedPath,
        args: &T,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>>
    where
        T: serde::Serialize + std::fmt::Debug,
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let origin = self.request_origin();
        let token = origin.token.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_empty(resp, origin).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(path, args, token, on_done);
        rx
    }

    fn send_request_no_wait<T>(&self, path: ResolvedPath, args: &T)
    where
        T: serde::Serialize + std::fmt::Debug,
    {
        self.initiate_request(path, args, self.token(), |response| async move {
            log_err_as_warn!(response.and_then(|x| x.error_for_status()));
        });
    }

    pub fn base_url(&self) -> String {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .base_url
            .clone()
    }

    pub fn user_info(&self) -> Option<Arc<User>> {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .session
            .as_ref()
            .and_then(|x| x.user.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_info().is_some()
    }

    /// The session token, kept by the app so the session can be restored on
    /// the next start
    pub fn token(&self) -> Option<SecretString> {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .session
            .as_ref()
            .map(|x| x.token.clone())
    }

    pub(crate) fn request_origin(&self) -> RequestOrigin {
        RequestOrigin {
            client: self.clone(),
            token: self.token(),
        }
    }

    fn start_session(&self, token: SecretString, user: Option<User>) {
        self.inner.lock().expect("mutex poisoned").session = Some(Session {
            token,
            user: user.map(Arc::new),
        });
    }

    fn clear_session(&self) {
        self.inner.lock().expect("mutex poisoned").session = None;
    }

    fn clear_session_with_token(&self, token: &SecretString) {
        let mut guard = self.inner.lock().expect("mutex poisoned");
        if guard.session.as_ref().is_some_and(|x| x.has_token(token)) {
            guard.session = None;
        } else {
            info!("ignoring rejection of a token that is no longer in use");
        }
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_empty(
    response: reqwest::Result<reqwest::Response>,
    origin: RequestOrigin,
) -> anyhow::Result<()> {
    let (response, status) = extract_response(response)?;
    if status.is_success() {
        Ok(())
    } else {
        Err(handle_error(response, &origin).await)
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_json_body<T>(
    response: reqwest::Result<reqwest::Response>,
    origin: RequestOrigin,
) -> anyhow::Result<T>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let (response, status) = extract_response(response)?;
    if status.is_success() {
        Ok(response
            .json()
            .await
            .context("failed to parse result as json")?)
    } else {
        Err(handle_error(response, &origin).await)
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_login(
    response: reqwest::Result<reqwest::Response>,
    origin: RequestOrigin,
) -> anyhow::Result<Arc<User>> {
    let client = origin.client.clone();
    let login_response: LoginResponse = process_json_body(response, origin).await?;
    if let Some(msg) = login_response.message.as_ref() {
        info!(?msg, "login message from backend");
    }
    client.start_session(login_response.token, Some(login_response.user));
    client.user_info().context("session cleared during login")
}

#[tracing::instrument(ret, err(Debug))]
async fn process_register(
    response: reqwest::Result<reqwest::Response>,
    origin: RequestOrigin,
) -> anyhow::Result<Arc<User>> {
    let client = origin.client.clone();
    let register_response: RegisterResponse = process_json_body(response, origin).await?;
    client.start_session(register_response.token, Some(register_response.user));
    client
        .user_info()
        .context("session cleared during registration")
}

/// Converts a non 2xx response into an [`ApiFailure`]
///
/// A 401 means the token the request was sent with is no longer valid so
/// that session is dropped
#[tracing::instrument(ret)]
async fn handle_error(response: reqwest::Response, origin: &RequestOrigin) -> anyhow::Error {
    let status = response.status();
    debug_assert!(
        !status.is_success(),
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(?e, "failed to get response body");
            String::new()
        }
    };
    let failure = ApiFailure::new(status, &body);
    if failure.is_unauthorized() {
        info!("session rejected by backend");
        origin.end_session();
    }
    failure.into()
}

/// Provides a way to standardize the error message
#[tracing::instrument(ret, err(Debug))]
fn extract_response(
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<(reqwest::Response, reqwest::StatusCode)> {
    if response.is_err() {
        info!("Response is err: {:#?}", response);
    }
    let response = response.context("failed to send request")?;
    let status = response.status();
    Ok((response, status))
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(not(target_arch = "wasm32"))]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}

#[cfg(target_arch = "wasm32")]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> {}
}
