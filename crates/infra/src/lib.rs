//! # plansim infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - `HttpHostSession`, the reqwest-backed `HostSession`
//! - A retrying HTTP client
//! - `TokioSleeper` for real-time polling
//! - Configuration loading from the environment and files
//!
//! ## Architecture
//! - Implements traits defined in `plansim-core`
//! - Contains all I/O

pub mod config;
pub mod errors;
pub mod http;
pub mod session;

pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder, RetryPolicy};
pub use session::{HttpHostSession, TokioSleeper};
