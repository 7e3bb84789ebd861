use std::env;
use std::fmt;

pub const DEFAULT_RELAY_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_RELAY_PORT: u16 = 587;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub mail: MailConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("OUTREACH_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let relay_host =
            env::var("OUTREACH_SMTP_HOST").unwrap_or_else(|_| DEFAULT_RELAY_HOST.to_string());
        if relay_host.trim().is_empty() {
            return Err(ConfigError::EmptyRelayHost);
        }

        let relay_port = match env::var("OUTREACH_SMTP_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            Err(_) => DEFAULT_RELAY_PORT,
        };

        let log_level = env::var("OUTREACH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            mail: MailConfig {
                relay_host: relay_host.trim().to_string(),
                relay_port,
                sender_email: non_empty_var("OUTREACH_SENDER_EMAIL"),
                sender_name: non_empty_var("OUTREACH_SENDER_NAME"),
                password: non_empty_var("OUTREACH_SMTP_PASSWORD"),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Submission relay and sender identity.
#[derive(Clone)]
pub struct MailConfig {
    pub relay_host: String,
    pub relay_port: u16,
    pub sender_email: Option<String>,
    pub sender_name: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("relay_host", &self.relay_host)
            .field("relay_port", &self.relay_port)
            .field("sender_email", &self.sender_email)
            .field("sender_name", &self.sender_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort { value: String },
    EmptyRelayHost,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "OUTREACH_SMTP_PORT must be a valid u16, got '{value}'")
            }
            ConfigError::EmptyRelayHost => write!(f, "OUTREACH_SMTP_HOST must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}
