//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;

/// Credentials and knobs the monitor needs at runtime.
///
/// Built once in `main` and passed down; nothing reads the environment
/// after this.
#[derive(Debug, Clone)]
pub struct Config {
    pub email_user: String,
    pub email_pass: String,
    pub email_recv: String,
    pub openai_api_key: String,
    pub smtp_host: String,
    /// Directory holding the state file, history log and PDF slots
    pub data_dir: PathBuf,
    /// Delete the state file when the notification mail fails, forcing the
    /// next run to re-detect the same bulletin
    pub reset_state_on_mail_failure: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            email_user: env::var("EMAIL_USER").context("EMAIL_USER must be set")?,
            email_pass: env::var("EMAIL_PASS").context("EMAIL_PASS must be set")?,
            email_recv: env::var("EMAIL_RECV").context("EMAIL_RECV must be set")?,
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            data_dir: env::var("MONITOR_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            reset_state_on_mail_failure: env::var("MONITOR_RESET_STATE_ON_MAIL_FAILURE")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_accepts_common_truthy_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("no"));
        assert!(!parse_flag(""));
    }
}
