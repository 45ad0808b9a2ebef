#![warn(unused_crate_dependencies)]

#[cfg(target_arch = "wasm32")]
mod suppress_wasm_warnings {
    // Only used in binary or natively and triggers unused warning
    use anyhow as _;
    use wasm_bindgen_futures as _;
    use web_sys as _;
}

mod app;
pub mod background_worker;
pub mod cli;
pub mod config;
mod notification_center;
mod pages;
mod shortcuts;
pub mod tracing;
mod ui_helpers;

pub use app::{DataShared, PermitsApp};
pub use pages::{Page, Screen};

/// Function is here to ensure lib also uses the log create to prevent the warning that it is not used
#[cfg(target_arch = "wasm32")]
pub fn wasm_log_level() -> log::LevelFilter {
    log::LevelFilter::Debug
}
