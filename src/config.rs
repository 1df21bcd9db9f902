// Runtime configuration, read from the environment (after `.env` is loaded).

use std::path::Path;

const DEFAULT_DATABASE_URL: &str = "data/livecomments.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bare path or `sqlite:` URL.
    pub database_url: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("LIVECOMMENT_DATABASE_URL").ok(),
            std::env::var("LIVECOMMENT_DB_MAX_CONNECTIONS").ok(),
        )
    }

    fn from_values(database_url: Option<String>, max_connections: Option<String>) -> Self {
        let database_url = database_url
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_connections = max_connections
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            database_url,
            max_connections,
        }
    }

    /// Directory holding the database file, when the URL is a bare path.
    pub fn database_dir(&self) -> Option<&Path> {
        if self.database_url.starts_with("sqlite:") {
            return None;
        }
        Path::new(&self.database_url)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }
}
