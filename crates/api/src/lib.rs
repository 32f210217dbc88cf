//! Store manager REST API library.
//!
//! Catalog, checkout, dashboard and credential endpoints over `PostgreSQL`.
//! The binary in `main.rs` wires configuration, tracing and Sentry around
//! [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
