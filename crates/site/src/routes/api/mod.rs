//! JSON endpoints.

pub mod revalidate;
