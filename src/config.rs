use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Optional so the service boots without a key; calls fail with NotConfigured.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "crumble".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "crumble-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES").unwrap_or(60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES").unwrap_or(60 * 24 * 14),
        };
        let llm = LlmConfig {
            api_key: std::env::var("LLM_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://ai.gateway.lovable.dev/v1".into()),
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "google/gemini-2.5-flash".into()),
            timeout_secs: env_parse("LLM_TIMEOUT_SECS").unwrap_or(60),
        };
        Ok(Self {
            database_url,
            jwt,
            llm,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
