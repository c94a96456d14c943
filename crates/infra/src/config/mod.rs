//! Configuration loading
//!
//! Builds a [`plansim_domain::ClientConfig`] from environment variables,
//! `.env` files and JSON/TOML config files.

pub mod loader;

pub use loader::{apply_env_overrides, load, load_from_env, load_from_file, probe_config_paths};
