//! API Module
//!
//! HTTP handlers and routing exposing the expiring cache.
//!
//! # Endpoints
//! - `PUT /cache/:key` - Cache a JSON value
//! - `GET /cache/:key` - Read a fresh value
//! - `DELETE /cache/:key` - Clear one key
//! - `GET /cache` - List cached keys
//! - `DELETE /cache` - Clear every cached key
//! - `POST /cache/purge` - Remove expired entries
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
