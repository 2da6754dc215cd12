use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Renewal reminder settings. All wall-clock values are interpreted in the
/// fixed offset given by `utc_offset_minutes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub utc_offset_minutes: i32,
    pub alert_hour: u32,
    pub lead_days: i64,
    pub recipient: String,
    pub maintenance_interval_secs: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            // Asia/Karachi, no DST
            utc_offset_minutes: 300,
            alert_hour: 21,
            lead_days: 2,
            recipient: String::new(),
            maintenance_interval_secs: 3600,
        }
    }
}

impl AlertConfig {
    pub fn offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
    }
}

/// Sender credential pair for the Resend API.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MailConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub from: String,
}

impl MailConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.from.trim().is_empty()
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // No config file means environment variables plus defaults
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => toml::from_str(&config_str)
                .map_err(|e| format!("failed to parse config file: {e}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and config.toml was not found")?;

                let defaults = AlertConfig::default();
                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    alerts: AlertConfig {
                        utc_offset_minutes: get_env_parse(
                            "ALERT_UTC_OFFSET_MINUTES",
                            defaults.utc_offset_minutes,
                        ),
                        alert_hour: get_env_parse("ALERT_HOUR", defaults.alert_hour),
                        lead_days: get_env_parse("ALERT_LEAD_DAYS", defaults.lead_days),
                        recipient: get_env("ALERT_RECIPIENT").unwrap_or_default(),
                        maintenance_interval_secs: get_env_parse(
                            "MAINTENANCE_INTERVAL_SECS",
                            defaults.maintenance_interval_secs,
                        ),
                    },
                    mail: MailConfig {
                        api_key: get_env("RESEND_API_KEY").unwrap_or_default(),
                        from: get_env("RESEND_FROM").unwrap_or_default(),
                    },
                }
            }
            Err(e) => {
                return Err(format!("cannot read config file {config_path}: {e}").into());
            }
        };

        // Environment always wins over the file
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("ALERT_UTC_OFFSET_MINUTES")
            && let Ok(n) = v.parse()
        {
            self.alerts.utc_offset_minutes = n;
        }
        if let Ok(v) = env::var("ALERT_HOUR")
            && let Ok(n) = v.parse()
        {
            self.alerts.alert_hour = n;
        }
        if let Ok(v) = env::var("ALERT_LEAD_DAYS")
            && let Ok(n) = v.parse()
        {
            self.alerts.lead_days = n;
        }
        if let Ok(v) = env::var("ALERT_RECIPIENT") {
            self.alerts.recipient = v;
        }
        if let Ok(v) = env::var("MAINTENANCE_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            self.alerts.maintenance_interval_secs = n;
        }
        if let Ok(v) = env::var("RESEND_API_KEY") {
            self.mail.api_key = v;
        }
        if let Ok(v) = env::var("RESEND_FROM") {
            self.mail.from = v;
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.alerts.alert_hour > 23 {
            return Err(format!(
                "alerts.alert_hour must be 0-23, got {}",
                self.alerts.alert_hour
            ));
        }
        if self.alerts.offset().is_none() {
            return Err(format!(
                "alerts.utc_offset_minutes out of range: {}",
                self.alerts.utc_offset_minutes
            ));
        }
        if self.alerts.lead_days < 0 {
            return Err("alerts.lead_days must not be negative".to_string());
        }
        Ok(())
    }
}
