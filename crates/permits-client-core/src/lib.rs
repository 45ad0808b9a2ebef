//! Session handling, calls to the permits API and the state kept by screens
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]


mod client;
pub mod screen;

pub use client::{Client, UiCallBack, DUMMY_ARGUMENT};
