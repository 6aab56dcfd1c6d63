//! Server configuration, read from the environment (a `.env` file is honoured).

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Secret shared with the auth service that signs identity tokens
    pub jwt_secret: String,
    pub max_connection_pooling: u32,
    pub port: u16,
    /// JSON log file, written next to the binary
    pub log_file: String,
    /// Root of the uploaded-files tree served at `/uploads`
    pub upload_dir: String,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        Ok(Self {
            // mandatory fields
            database_url: lookup("DATABASE_URL").ok_or("DATABASE_URL must be set")?,
            // optional fields
            jwt_secret: lookup("JWT_SECRET").unwrap_or_else(|| "your-jwt-secret".to_string()),
            max_connection_pooling: parse_or(&lookup, "MAX_CONNECTION_POOLING", 5)?,
            port: parse_or(&lookup, "PORT", 3001)?,
            log_file: lookup("LOG_FILE").unwrap_or_else(|| "app.log".to_string()),
            upload_dir: lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, String> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
