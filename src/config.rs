use std::net::SocketAddr;

/// All runtime configuration, read from the environment exactly once in
/// `main` and handed to constructors. Nothing below this layer touches env.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub smtp: SmtpConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Recipient of the scheduled report email.
    pub recipient: String,
    /// Six-field cron expression (sec min hour day month weekday).
    pub cron: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL is not set".to_string())?;

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "PORT must be a number".to_string())?;

        let config = Self {
            database_url,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            smtp: SmtpConfig::from_env()?,
            report: ReportConfig::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.smtp.enabled {
            if self.smtp.host.is_empty() {
                return Err("SMTP_ENABLED is true but SMTP_HOST is not set".to_string());
            }
            if self.smtp.from_email.is_empty() {
                return Err("SMTP_ENABLED is true but SMTP_FROM_EMAIL is not set".to_string());
            }
            if self.report.recipient.is_empty() {
                return Err("SMTP_ENABLED is true but REPORT_RECIPIENT is not set".to_string());
            }
        }
        Ok(())
    }
}

impl SmtpConfig {
    fn from_env() -> Result<Self, String> {
        let enabled = std::env::var("SMTP_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        let port = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "465".to_string())
            .parse::<u16>()
            .map_err(|_| "SMTP_PORT must be a number".to_string())?;

        Ok(Self {
            enabled,
            host: std::env::var("SMTP_HOST").unwrap_or_default(),
            port,
            username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
            password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_email: std::env::var("SMTP_FROM_EMAIL").unwrap_or_default(),
            from_name: std::env::var("SMTP_FROM_NAME")
                .unwrap_or_else(|_| "Dukadash".to_string()),
        })
    }
}

impl ReportConfig {
    fn from_env() -> Self {
        Self {
            recipient: std::env::var("REPORT_RECIPIENT").unwrap_or_default(),
            // Daily at 7:00 AM unless overridden
            cron: std::env::var("REPORT_CRON").unwrap_or_else(|_| "0 0 7 * * *".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_enabled_smtp_without_host() {
        let config = AppConfig {
            database_url: "postgres://localhost/dukadash".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            smtp: SmtpConfig {
                enabled: true,
                host: String::new(),
                port: 465,
                username: String::new(),
                password: String::new(),
                from_email: "reports@example.com".to_string(),
                from_name: "Dukadash".to_string(),
            },
            report: ReportConfig {
                recipient: "owner@example.com".to_string(),
                cron: "0 0 7 * * *".to_string(),
            },
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_disabled_smtp_without_host() {
        let config = AppConfig {
            database_url: "postgres://localhost/dukadash".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            smtp: SmtpConfig {
                enabled: false,
                host: String::new(),
                port: 465,
                username: String::new(),
                password: String::new(),
                from_email: String::new(),
                from_name: "Dukadash".to_string(),
            },
            report: ReportConfig {
                recipient: String::new(),
                cron: "0 0 7 * * *".to_string(),
            },
        };

        assert!(config.validate().is_ok());
    }
}
