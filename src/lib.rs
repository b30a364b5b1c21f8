//! Bibliotek: a REST backend for a library catalog.
//!
//! Layers:
//! - `domain`: entities and pure business rules (review aggregation).
//! - `application`: services, repository traits, pagination.
//! - `cache`: the in-process cache over the Book collection.
//! - `infra`: telemetry, in-memory document store, HTTP surface, image pipeline.
//! - `config`: typed settings with file → env → CLI precedence.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
