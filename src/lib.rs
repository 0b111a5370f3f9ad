//! # Payment Admin API Library
//!
//! This library provides the core functionality for the Payment Gateway
//! Admin API service: provider configuration storage, payment dispatch,
//! handlers, and server configuration.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod gateways;
pub mod handlers;
pub mod models;
pub mod server;
pub mod store;
pub mod telemetry;
