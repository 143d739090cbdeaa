//! Configuration module for lectern
//!
//! Handles loading and managing application settings from TOML files.

mod settings;

pub use settings::Settings;
