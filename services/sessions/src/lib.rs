//! Focus session tracker API
//!
//! A REST service storing study "focus session" records. The router in
//! [`routes`] receives its stores through [`state::AppState`], so handlers
//! run the same against PostgreSQL or the in-memory stores.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;
