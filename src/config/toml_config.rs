use crate::config::NotificationMethod;
use crate::core::dispatch::RetryPolicy;
use crate::core::engine::{DrawOptions, DEFAULT_MAX_ATTEMPTS};
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_required_field,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SantaConfig {
    #[serde(default)]
    pub draw: DrawConfig,
    pub sms: Option<SmsConfig>,
    pub email: Option<EmailConfig>,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawConfig {
    pub max_attempts: Option<usize>,
    pub strict_feasibility: Option<bool>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmsConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    pub from_name: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    pub connection_string: Option<String>,
    pub sender_address: Option<String>,
    pub template_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryConfig {
    pub retry_attempts: Option<u32>,
    pub retry_delay_millis: Option<u64>,
}

impl SantaConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| SantaError::ConfigError {
            message: format!(
                "Cannot read config file '{}': {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SantaError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SantaError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn draw_options(&self) -> DrawOptions {
        DrawOptions {
            max_attempts: self.draw.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            strict_feasibility: self.draw.strict_feasibility.unwrap_or(false),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            retry_attempts: self
                .delivery
                .retry_attempts
                .unwrap_or(defaults.retry_attempts),
            retry_delay: self
                .delivery
                .retry_delay_millis
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
        }
    }

    /// Checks that the settings the chosen channel needs are present.
    pub fn validate_for(&self, method: NotificationMethod) -> Result<()> {
        self.validate()?;

        match method {
            NotificationMethod::Sms => {
                let sms = validate_required_field("sms", &self.sms)?;
                validate_non_empty_string(
                    "sms.account_sid",
                    validate_required_field("sms.account_sid", &sms.account_sid)?,
                )?;
                validate_non_empty_string(
                    "sms.auth_token",
                    validate_required_field("sms.auth_token", &sms.auth_token)?,
                )?;
                if sms.from_number.is_none() && sms.from_name.is_none() {
                    return Err(SantaError::MissingConfigError {
                        field: "sms.from_number or sms.from_name".to_string(),
                    });
                }
            }
            NotificationMethod::Email => {
                let email = validate_required_field("email", &self.email)?;
                validate_non_empty_string(
                    "email.connection_string",
                    validate_required_field("email.connection_string", &email.connection_string)?,
                )?;
                validate_non_empty_string(
                    "email.sender_address",
                    validate_required_field("email.sender_address", &email.sender_address)?,
                )?;
            }
            NotificationMethod::None => {}
        }

        Ok(())
    }
}

impl Validate for SantaConfig {
    fn validate(&self) -> Result<()> {
        if let Some(max_attempts) = self.draw.max_attempts {
            validate_positive_number("draw.max_attempts", max_attempts, 1)?;
        }

        if let Some(retry_attempts) = self.delivery.retry_attempts {
            validate_range("delivery.retry_attempts", retry_attempts, 0, 10)?;
        }

        if let Some(api_base) = self.sms.as_ref().and_then(|sms| sms.api_base.as_deref()) {
            validate_url("sms.api_base", api_base)?;
        }

        Ok(())
    }
}
