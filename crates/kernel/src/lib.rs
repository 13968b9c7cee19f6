//! Stockroom Kernel Library
//!
//! Inventory HTTP service: search, CRUD, stats, sheet export, and
//! geolocation distance. This library exposes the internals for
//! integration testing; the `stockroom` binary runs the server.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod routes;
pub mod services;
pub mod state;
