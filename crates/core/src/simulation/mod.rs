//! Simulation submission and polling

pub mod polling;

pub use polling::PollOptions;
