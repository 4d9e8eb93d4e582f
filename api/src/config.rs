use std::env;

const DEV_COOKIE_KEY: &str = "dev-cookie-key-not-for-production";

#[derive(Clone)]
pub struct Config {
    /// Environment name, selects `.env.<app_env>`
    pub app_env: String,
    pub database_url: String,
    /// Secret for signing session cookies
    pub cookie_key: String,
    pub port: u16,
    /// Seconds between rate limiter replenishments, per client IP
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        dotenvy::from_filename(format!(".env.{}", app_env)).ok();
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://db.sqlite?mode=rwc".to_string()),
            cookie_key: env::var("COOKIE_KEY").unwrap_or_else(|_| DEV_COOKIE_KEY.to_string()),
            port: parse_or("PORT", 3000),
            rate_limit_per_second: parse_or("RATE_LIMIT_PER_SECOND", 1),
            rate_limit_burst: parse_or("RATE_LIMIT_BURST", 30),
            app_env,
        }
    }

    /// Check if the built-in development cookie key is in use
    pub fn uses_dev_cookie_key(&self) -> bool {
        self.cookie_key == DEV_COOKIE_KEY
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
