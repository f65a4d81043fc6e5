// src/config/mod.rs

use std::str::FromStr;

/// Runtime configuration, loaded once at startup and passed explicitly to the
/// components that need it. Values come from the environment (with a `.env`
/// file honored if present); every key has a usable local default.
#[derive(Debug, Clone)]
pub struct Config {
    // ── Server
    pub host: String,
    pub port: u16,
    pub cors_origin: String,

    // ── Database
    pub database_url: String,
    pub migrations_path: String,

    // ── Inference endpoint
    pub ollama_base_url: String,
    pub ollama_model: String,
    /// Where the raw analysis envelope gets dumped as a diagnostic aid.
    pub analysis_debug_path: String,

    // ── Auth
    pub jwt_secret: String,

    // ── Logging
    pub log_level: String,
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            // Tolerate trailing comments and whitespace in .env values
            let clean = val.split('#').next().unwrap_or("").trim();
            match clean.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            host: env_var_or("GW_HOST", "0.0.0.0".to_string()),
            port: env_var_or("GW_PORT", 8000),
            cors_origin: env_var_or("GW_CORS_ORIGIN", "http://localhost:3000".to_string()),
            database_url: env_var_or(
                "DATABASE_URL",
                "sqlite:./ghostwriter.db?mode=rwc".to_string(),
            ),
            migrations_path: env_var_or("GW_MIGRATIONS_PATH", "migrations".to_string()),
            ollama_base_url: env_var_or(
                "OLLAMA_BASE_URL",
                "http://localhost:11434".to_string(),
            ),
            ollama_model: env_var_or("OLLAMA_MODEL", "qwen2.5:32b".to_string()),
            analysis_debug_path: env_var_or(
                "GW_ANALYSIS_DEBUG_PATH",
                "generated_text.md".to_string(),
            ),
            jwt_secret: env_var_or(
                "JWT_SECRET",
                "ghostwriter-jwt-secret-change-in-production".to_string(),
            ),
            log_level: env_var_or("GW_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
