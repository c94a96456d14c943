//! # plansim core
//!
//! Client orchestration with no transport code.
//!
//! This crate contains:
//! - Port interfaces for the host session and the poll sleeper
//! - `PlanningClient`, one async method per remote capability
//! - GraphQL documents and response-envelope classification
//! - The simulation polling protocol
//!
//! ## Architecture Principles
//! - Only depends on `plansim-domain`
//! - No HTTP or filesystem code
//! - All external effects go through `HostSession` and `Sleeper`

pub mod client;
pub mod session_ports;
pub mod simulation;

pub use client::{PlanningClient, SimulationArguments};
pub use session_ports::{HostSession, Sleeper};
pub use simulation::PollOptions;
