// src/config/mod.rs

//! Startup configuration: TOML file model and loading.

pub mod loader;
pub mod model;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, RawConfigFile};
