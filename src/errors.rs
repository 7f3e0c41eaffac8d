use std::fmt;

#[derive(Debug, Clone)]
pub enum SitebeaconError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
}

impl SitebeaconError {
    /// Stable error code for logs and test assertions
    pub fn code(&self) -> &'static str {
        match self {
            SitebeaconError::DatabaseConfig(_) => "E001",
            SitebeaconError::DatabaseConnection(_) => "E002",
            SitebeaconError::DatabaseOperation(_) => "E003",
            SitebeaconError::Validation(_) => "E004",
            SitebeaconError::NotFound(_) => "E005",
            SitebeaconError::Serialization(_) => "E006",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            SitebeaconError::DatabaseConfig(_) => "Database Configuration Error",
            SitebeaconError::DatabaseConnection(_) => "Database Connection Error",
            SitebeaconError::DatabaseOperation(_) => "Database Operation Error",
            SitebeaconError::Validation(_) => "Validation Error",
            SitebeaconError::NotFound(_) => "Resource Not Found",
            SitebeaconError::Serialization(_) => "Serialization Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SitebeaconError::DatabaseConfig(msg) => msg,
            SitebeaconError::DatabaseConnection(msg) => msg,
            SitebeaconError::DatabaseOperation(msg) => msg,
            SitebeaconError::Validation(msg) => msg,
            SitebeaconError::NotFound(msg) => msg,
            SitebeaconError::Serialization(msg) => msg,
        }
    }

    /// True for the store-unavailable class of failures: the write gateway
    /// swallows these, the dashboard read path surfaces them.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(
            self,
            SitebeaconError::DatabaseConnection(_) | SitebeaconError::DatabaseOperation(_)
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SitebeaconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SitebeaconError {}

impl SitebeaconError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        SitebeaconError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        SitebeaconError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        SitebeaconError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SitebeaconError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SitebeaconError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SitebeaconError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for SitebeaconError {
    fn from(err: sea_orm::DbErr) -> Self {
        SitebeaconError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SitebeaconError {
    fn from(err: std::io::Error) -> Self {
        SitebeaconError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SitebeaconError {
    fn from(err: serde_json::Error) -> Self {
        SitebeaconError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SitebeaconError>;
