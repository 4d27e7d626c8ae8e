//! Folio Core - Shared types library.
//!
//! This crate provides the types every Folio component agrees on:
//! - `client` - REST client for the portfolio backend
//! - `site` - Public portfolio pages and the admin interface
//! - `cli` - Command-line access to the same backend
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! Entities are plain serde records; the backend owns their schema and
//! assigns their identifiers.
//!
//! # Modules
//!
//! - [`types`] - Resource names, entity IDs, and email addresses
//! - [`models`] - The portfolio entities exchanged with the backend

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
