use serde::{Deserialize, Serialize};

/// Static configuration, immutable after startup
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StaticConfig {
    pub database: DatabaseConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing env-filter directive, e.g. "info" or "sitebeacon=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlite://, mysql:// or postgres:// URL; backend is inferred from it
    pub database_url: String,
    /// Connection pool size for MySQL/PostgreSQL
    pub pool_size: u32,
    pub retry_count: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://sitebeacon.db".to_string(),
            pool_size: 10,
            retry_count: 3,
            retry_base_delay_ms: 100,
            retry_max_delay_ms: 2000,
        }
    }
}

/// Defaults for the dashboard report windows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Real-time feed window in minutes
    pub realtime_window_min: i64,
    /// Active-visitor window in minutes
    pub active_window_min: i64,
    /// Entries per top-N breakdown
    pub top_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            realtime_window_min: 30,
            active_window_min: 5,
            top_limit: 8,
        }
    }
}

impl StaticConfig {
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path = "sitebeacon.toml";

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SB")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.database.database_url, "sqlite://sitebeacon.db");
        assert_eq!(config.database.retry_count, 3);
        assert_eq!(config.report.realtime_window_min, 30);
        assert_eq!(config.report.active_window_min, 5);
        assert_eq!(config.report.top_limit, 8);
        assert_eq!(config.logging.level, "info");
    }
}
