//! Domain logic for the inkflow manuscript confirmation service.
//!
//! Everything here is pure: status machine rules, confirmation target
//! resolution, template rendering, token generation, and validation. The
//! `inkflow-db` and `inkflow-api` crates supply persistence and transport.

pub mod clients;
pub mod error;
pub mod manuscript;
pub mod render;
pub mod template;
pub mod token;
pub mod types;
