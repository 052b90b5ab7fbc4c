use anyhow::{Context, Result};
use chrono_tz::Tz;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub court: CourtConfig,
    pub reservation: ReservationConfig,
    pub registration: RegistrationConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: env_or("DATABASE_HOST", "localhost"),
            port: env_or("DATABASE_PORT", "5432")
                .parse()
                .context("DATABASE_PORT must be a port number")?,
            username: env_or("DATABASE_USERNAME", "app"),
            password: env_or("DATABASE_PASSWORD", "passwd"),
            database: env_or("DATABASE_NAME", "app"),
        };
        let court = CourtConfig {
            total_courts: env_or("TOTAL_COURTS", "20")
                .parse()
                .context("TOTAL_COURTS must be an integer")?,
        };
        let reservation = ReservationConfig {
            duration_minutes: env_or("RESERVATION_MINUTES", "60")
                .parse()
                .context("RESERVATION_MINUTES must be an integer")?,
        };
        let registration = RegistrationConfig {
            phone_digits: env_or("PHONE_DIGITS", "10")
                .parse()
                .context("PHONE_DIGITS must be an integer")?,
            timezone: env_or("COURT_TIMEZONE", "America/Los_Angeles")
                .parse()
                .map_err(|e| anyhow::anyhow!("COURT_TIMEZONE must be an IANA timezone name: {e}"))?,
        };
        let admin = AdminConfig {
            password: env_or("ADMIN_PASSWORD", "canamadmin"),
        };
        Ok(Self {
            database,
            court,
            reservation,
            registration,
            admin,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct CourtConfig {
    pub total_courts: i32,
}

/// How long a reservation holds a court. One canonical duration is applied
/// on every path; historical deployments disagreed between 30 and 60
/// minutes, so the window is configurable with 60 as the default.
#[derive(Debug, Clone)]
pub struct ReservationConfig {
    pub duration_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    pub phone_digits: usize,
    /// Identities expire at the end of the calendar day in this timezone.
    pub timezone: Tz,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub password: String,
}
