//! Core types for Folio.
//!
//! This module provides type-safe wrappers for the concepts shared between
//! the client, the site, and the CLI.

pub mod email;
pub mod id;
pub mod resource;

pub use email::{Email, EmailError};
pub use id::{EntityId, EntityIdError};
pub use resource::{Resource, UnknownResource};
