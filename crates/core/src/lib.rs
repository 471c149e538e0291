//! Sidra Core - Shared domain types.
//!
//! This crate provides the row models and common types used across the Sidra
//! admin components:
//! - `admin` - Data-access layer over the hosted backend
//! - `cli` - Command-line tools for operations and diagnostics
//!
//! # Architecture
//!
//! The core crate contains only types and helpers - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Entity row models, status enums, pagination, and price display

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
