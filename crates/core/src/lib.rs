//! LMW Farm Core - Shared types library.
//!
//! This crate provides common types used across the LMW Farm website:
//! - `site` - Public-facing farm website and cart/checkout flow
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and
//!   pickup locations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
