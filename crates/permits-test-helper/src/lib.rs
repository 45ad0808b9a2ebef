#![warn(unused_crate_dependencies)]

mod backend;

use std::{
    fmt::Debug,
    ops::Deref,
    sync::LazyLock,
    time::{Duration, Instant},
};

use anyhow::bail;
use permits_shared::{
    req_args::LoginReqArgs,
    telemetry::{self, get_subscriber, init_subscriber},
};
use uuid::Uuid;

pub use backend::{BackendHandle, RecordedRequest, Table};

pub const TEST_API_KEY: &str = "sk-test-0123456789abcdef";

const WAIT_TIMEOUT: Duration = Duration::from_secs(2);

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("client_tests{}", Uuid::new_v4());
        let (file, path) = telemetry::create_trace_file(&log_file_name).unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

pub struct TestApp<C> {
    /// Base URL of the API including the `/api` prefix
    pub address: String,
    pub backend: BackendHandle,
    pub core_client: C,
}

impl<C> Debug for TestApp<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp")
            .field("address", &self.address)
            .finish()
    }
}

/// Empty function for use when a call back isn't needed
pub fn no_cb() {}

/// Starts a fresh backend and builds a client pointed at it
///
/// `build_client` receives the API base URL and the key the backend accepts
pub async fn spawn_app<C, F>(build_client: F) -> TestApp<C>
where
    F: FnOnce(String, String) -> C,
{
    start_tracing();
    let (port, backend) = backend::start_backend_in_background(TEST_API_KEY.to_string())
        .await
        .expect("failed to start test backend");
    let address = port_to_api_address(port);
    let core_client = build_client(address.clone(), TEST_API_KEY.to_string());
    TestApp {
        address,
        backend,
        core_client,
    }
}

pub fn port_to_api_address(port: u16) -> String {
    format!("http://127.0.0.1:{port}/api")
}

fn start_tracing() {
    // Accessing TRACING also forces the LazyLock to initialize
    let logging_msg = TRACING.deref();
    println!("{logging_msg}");
}

/// Accounts present in every fresh backend
#[derive(Debug, Clone, Copy)]
pub struct TestUser {
    pub id: u64,
    pub username: &'static str,
    pub password: &'static str,
}

impl TestUser {
    /// Member of the admin role
    pub const ADMIN: Self = Self {
        id: 1,
        username: "admin",
        password: "admin-password",
    };

    /// Inspector role which carries the employee feature
    pub const OFFICER: Self = Self {
        id: 2,
        username: "officer",
        password: "officer-password",
    };

    /// Clerk role without any features
    pub const CLERK: Self = Self {
        id: 3,
        username: "clerk",
        password: "clerk-password",
    };

    pub fn login_args(&self) -> LoginReqArgs {
        LoginReqArgs::new(self.username.to_string(), self.password.to_string().into())
    }
}

/// Polls `condition` until it holds or a short timeout passes
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> anyhow::Result<()> {
    let start = Instant::now();
    while start.elapsed() < WAIT_TIMEOUT {
        if condition() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    bail!("Timed out after {WAIT_TIMEOUT:?}")
}
