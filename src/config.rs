use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

/// Settings for the AI assist gateway. When `stub_mode` is true (or no API
/// key is configured) suggestions are synthesized locally and never leave
/// the process.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistConfig {
    pub stub_mode: bool,
    pub google_api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub assist: AssistConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let google_api_key = std::env::var("GOOGLE_API_KEY").unwrap_or_default();
        let assist = AssistConfig {
            stub_mode: std::env::var("ASSIST_STUB_MODE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(google_api_key.is_empty()),
            google_api_key,
            timeout_secs: std::env::var("ASSIST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(15),
        };
        Ok(Self {
            database_url,
            jwt,
            assist,
        })
    }
}
