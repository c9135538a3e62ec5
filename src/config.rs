/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server listen port.
    pub port: u16,
    /// Server bind host.
    pub host: String,
    /// Upper bound on concurrently stored game sessions.
    pub max_games: usize,
}

const DEFAULT_PORT: u16 = 8090;
const DEFAULT_MAX_GAMES: usize = 1000;

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        AppConfig {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            max_games: std::env::var("CHESS_MAX_GAMES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(DEFAULT_MAX_GAMES),
        }
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
            max_games: DEFAULT_MAX_GAMES,
        }
    }
}
