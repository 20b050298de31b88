use secrecy::SecretString;
use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Errors raised while reading configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid URL in {name}: {value}")]
    InvalidUrl { name: &'static str, value: String },
}

#[derive(Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub supabase: SupabaseConfig,
    pub openai: OpenAiConfig,
    pub query: QueryConfig,
    pub insights: InsightsConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub upstream_timeout: Duration,
}

#[derive(Debug)]
pub struct SupabaseConfig {
    pub url: url::Url,
    pub key: SecretString,
}

#[derive(Debug)]
pub struct OpenAiConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Reject generated SQL that is not a single read-only statement
    pub read_only: bool,
    /// Name of the PostgREST function that runs raw SQL
    pub rpc_function: String,
}

#[derive(Debug, Clone)]
pub struct InsightsConfig {
    /// Days before today included in the window; negative or unparsable overrides keep the default
    pub window_days: u32,
    pub top_n: usize,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
}

/// Secrets and endpoints that have no sensible default
pub struct Secrets {
    pub supabase_url: url::Url,
    pub supabase_key: SecretString,
    pub openai_key: SecretString,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let secrets = Secrets {
            supabase_url: parse_url("SUPABASE_URL", &required("SUPABASE_URL")?)?,
            supabase_key: SecretString::from(required("SUPABASE_KEY")?),
            openai_key: SecretString::from(required("OPENAI_KEY")?),
        };

        let config = match environment {
            Environment::Production => Self::production(secrets),
            Environment::Staging => Self::staging(secrets),
            Environment::Development => Self::development(secrets),
        };
        config.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(port) = env::var("PARALLER_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("UPSTREAM_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse() {
                self.server.upstream_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(v) = env::var("OPENAI_BASE_URL") {
            parse_url("OPENAI_BASE_URL", &v)?;
            self.openai.base_url = v;
        }
        if let Ok(v) = env::var("OPENAI_MODEL") {
            self.openai.model = v;
        }

        if let Ok(v) = env::var("QUERY_READ_ONLY") {
            self.query.read_only = v.parse().unwrap_or(self.query.read_only);
        }
        if let Ok(v) = env::var("QUERY_RPC_FUNCTION") {
            self.query.rpc_function = v;
        }

        if let Ok(v) = env::var("INSIGHTS_WINDOW_DAYS") {
            self.insights.window_days = v.parse().unwrap_or(self.insights.window_days);
        }
        if let Ok(v) = env::var("INSIGHTS_TOP_N") {
            self.insights.top_n = v.parse().unwrap_or(self.insights.top_n);
        }

        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    pub fn development(secrets: Secrets) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 8000,
                upstream_timeout: Duration::from_secs(60),
            },
            supabase: SupabaseConfig {
                url: secrets.supabase_url,
                key: secrets.supabase_key,
            },
            openai: OpenAiConfig {
                api_key: secrets.openai_key,
                base_url: DEFAULT_OPENAI_URL.to_string(),
                model: "gpt-4".to_string(),
            },
            query: QueryConfig {
                read_only: true,
                rpc_function: "run_raw_sql".to_string(),
            },
            insights: InsightsConfig {
                window_days: 14,
                top_n: 5,
            },
            security: SecurityConfig {
                cors_origins: vec![
                    "http://localhost:5173".to_string(),
                    "https://paraller.vercel.app".to_string(),
                ],
            },
        }
    }

    pub fn staging(secrets: Secrets) -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 8000,
                upstream_timeout: Duration::from_secs(30),
            },
            ..Self::development(secrets)
        }
    }

    pub fn production(secrets: Secrets) -> Self {
        Self {
            environment: Environment::Production,
            ..Self::staging(secrets)
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<url::Url, ConfigError> {
    url::Url::parse(value).map_err(|_| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
    })
}
