//! Backend runtime entry point and public API surface.
//!
//! This crate owns the backend lifecycle, routes bridge messages to resource
//! services, and owns the HTTP client boundary every request goes through.

mod app;
pub mod client;
pub mod config;
mod runtime;
mod services;
mod state;

#[cfg(test)]
mod test_support;

pub use crate::runtime::run;
