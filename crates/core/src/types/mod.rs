//! Core types for the LMW Farm website.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod pickup;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use pickup::{PickupLocation, PickupLocationError};
pub use price::Price;
