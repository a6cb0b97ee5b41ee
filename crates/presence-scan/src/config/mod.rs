use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::workflows::assessment::persistence::RetryPolicy;
use crate::workflows::assessment::report::{ReportTheme, Rgb};

/// Distinguishes runtime behavior for different stages of the service.
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
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scan: ScanConfig,
    pub report: ReportConfig,
    pub persistence: PersistenceConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let questionnaire =
            optional("SCAN_QUESTIONNAIRE").unwrap_or_else(|| "brand_scanner_360".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scan: ScanConfig { questionnaire },
            report: ReportConfig::from_env()?,
            persistence: PersistenceConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which questionnaire the service scores: a builtin slug or a JSON file path.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub questionnaire: String,
}

/// Branding applied to rendered reports.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub organization: String,
    pub primary: Rgb,
    pub accent: Rgb,
    pub text: Rgb,
}

impl ReportConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = ReportTheme::default();
        Ok(Self {
            organization: optional("REPORT_ORGANIZATION").unwrap_or(defaults.organization),
            primary: color("REPORT_PRIMARY_COLOR", defaults.primary)?,
            accent: color("REPORT_ACCENT_COLOR", defaults.accent)?,
            text: color("REPORT_TEXT_COLOR", defaults.text)?,
        })
    }

    pub fn theme(&self) -> ReportTheme {
        ReportTheme {
            organization: self.organization.clone(),
            primary: self.primary,
            accent: self.accent,
            text: self.text,
        }
    }
}

/// Google service-account access for the Sheets log and Drive store.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub service_account_key: PathBuf,
    pub spreadsheet_id: Option<String>,
    pub sheet_range: String,
    pub drive_folder_id: Option<String>,
}

/// Where submissions are recorded and how hard each call is retried.
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    pub csv_path: Option<PathBuf>,
    pub google: Option<GoogleConfig>,
    pub timeout: Duration,
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl PersistenceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let spreadsheet_id = optional("GOOGLE_SPREADSHEET_ID");
        let drive_folder_id = optional("GOOGLE_DRIVE_FOLDER_ID");
        let google = match optional("GOOGLE_SERVICE_ACCOUNT_KEY") {
            Some(key) => Some(GoogleConfig {
                service_account_key: PathBuf::from(key),
                spreadsheet_id,
                sheet_range: optional("GOOGLE_SHEET_RANGE")
                    .unwrap_or_else(|| "Submissions!A1".to_string()),
                drive_folder_id,
            }),
            None if spreadsheet_id.is_some() || drive_folder_id.is_some() => {
                return Err(ConfigError::MissingServiceAccountKey)
            }
            None => None,
        };

        let max_attempts = number("PERSIST_MAX_ATTEMPTS", 2)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidNumber {
                variable: "PERSIST_MAX_ATTEMPTS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            csv_path: optional("PERSIST_CSV_PATH").map(PathBuf::from),
            google,
            timeout: Duration::from_secs(number("PERSIST_TIMEOUT_SECS", 10)?),
            max_attempts: u32::try_from(max_attempts).map_err(|_| ConfigError::InvalidNumber {
                variable: "PERSIST_MAX_ATTEMPTS",
                value: max_attempts.to_string(),
            })?,
            backoff: Duration::from_millis(number("PERSIST_BACKOFF_MS", 250)?),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: self.backoff,
        }
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn color(variable: &'static str, default: Rgb) -> Result<Rgb, ConfigError> {
    match optional(variable) {
        Some(value) => Rgb::parse_hex(&value).ok_or(ConfigError::InvalidColor { variable, value }),
        None => Ok(default),
    }
}

fn number(variable: &'static str, default: u64) -> Result<u64, ConfigError> {
    match optional(variable) {
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { variable, value }),
        None => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidColor { variable: &'static str, value: String },
    InvalidNumber { variable: &'static str, value: String },
    MissingServiceAccountKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidColor { variable, value } => {
                write!(f, "{variable} must be a #RRGGBB color, got '{value}'")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a positive integer, got '{value}'")
            }
            ConfigError::MissingServiceAccountKey => write!(
                f,
                "GOOGLE_SERVICE_ACCOUNT_KEY is required when a spreadsheet or drive folder is configured"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidColor { .. }
            | ConfigError::InvalidNumber { .. }
            | ConfigError::MissingServiceAccountKey => None,
        }
    }
}
