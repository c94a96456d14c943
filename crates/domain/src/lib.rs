//! # plansim domain
//!
//! Data model for the planning client.
//!
//! This crate contains:
//! - Wire schema types mirroring the service's JSON (`wire`)
//! - Domain schema types with parsed times and schemas (`types`)
//! - Duration and timestamp codecs (`utils`)
//! - The `PlanError` taxonomy and `Result` alias
//! - Configuration structures and defaults
//!
//! ## Architecture
//! - No dependencies on other plansim crates
//! - No I/O; every conversion is a pure function

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;
pub mod wire;

pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::{Offset, PlanDuration, Timestamp};
