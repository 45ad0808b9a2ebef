//! Types and rules shared between the permits clients and the test backend

#![warn(unused_crate_dependencies)]

pub mod amount;
pub mod chalan;
pub mod const_config;
pub mod errors;
pub mod fee_structure;
pub mod id;
pub mod list;
mod macros;
pub mod nav;
pub mod notification;
pub mod permit;
pub mod report;
pub mod req_args;
pub mod route;
pub mod uac;
pub mod vehicle_type;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
