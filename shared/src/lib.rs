//! Shared types and models for the Garment Workshop backend
//!
//! This crate contains the domain models, validation rules and the
//! material-requirement calculator shared between the backend server and the
//! WASM client module.

pub mod models;
pub mod requirements;
pub mod stock;
pub mod types;
pub mod validation;

pub use models::*;
pub use requirements::*;
pub use stock::*;
pub use types::*;
pub use validation::*;
