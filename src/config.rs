use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub node_env: String,

    // PostgreSQL
    pub database_url: String,
    pub db_max_connections: u32,

    // Fetching
    pub max_m3u_size_mb: usize,
    pub fetch_timeout_ms: u64,
    pub max_retries: u32,
    pub user_agent: String,

    // Catalogue
    pub max_items_page: usize,
    pub placeholder_logo: String,
    pub default_category: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),
            node_env: env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string()),

            // PostgreSQL
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/iptv_catalogue".to_string()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap_or(15),

            // Fetching
            max_m3u_size_mb: env::var("MAX_M3U_SIZE_MB")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),

            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .unwrap_or_else(|_| "120000".to_string())
                .parse()
                .unwrap_or(120_000), // 2 minutes

            max_retries: env::var("MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),

            // Playlist servers tend to block unknown agents
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
            }),

            // Catalogue
            max_items_page: env::var("MAX_ITEMS_PAGE")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap_or(500),
            placeholder_logo: env::var("PLACEHOLDER_LOGO")
                .unwrap_or_else(|_| "/placeholder.svg".to_string()),
            default_category: env::var("DEFAULT_CATEGORY")
                .unwrap_or_else(|_| "Sem categoria".to_string()),
        }
    }

    /// Size bound applied to downloaded playlists, in bytes
    pub fn max_m3u_bytes(&self) -> u64 {
        (self.max_m3u_size_mb as u64) * 1024 * 1024
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
