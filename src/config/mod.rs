//! Configuration management
//!
//! Static configuration loaded once at startup from `sitebeacon.toml` plus
//! `SB__`-prefixed environment variables, held behind a global
//! `OnceLock<ArcSwap>` so readers never take a lock.

mod structs;

pub use structs::{DatabaseConfig, LoggingConfig, ReportConfig, StaticConfig};

use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
        .load_full()
}

/// Initialize the global configuration
///
/// Loads configuration from "sitebeacon.toml" in the current directory.
/// If the file doesn't exist, uses in-memory defaults.
pub fn init_config() {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load()));
}

/// Replace the global configuration (used by tests)
pub fn set_config(config: StaticConfig) {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .store(Arc::new(config));
}
