use crate::config::toml_config::{DrawConfig, EmailConfig, SantaConfig, SmsConfig};
use std::env;

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl SantaConfig {
    /// Settings for runs without a TOML file: channel credentials come from
    /// the same variables the provider SDKs use.
    pub fn from_env() -> Self {
        let sms = SmsConfig {
            account_sid: var("TWILIO_ACCOUNT_SID"),
            auth_token: var("TWILIO_AUTH_TOKEN"),
            from_number: var("TWILIO_FROM_NUMBER"),
            from_name: var("TWILIO_FROM_NAME"),
            api_base: var("TWILIO_API_BASE"),
        };
        let email = EmailConfig {
            connection_string: var("AZURE_COMMUNICATION_CONNECTION_STRING"),
            sender_address: var("AZURE_SENDER_EMAIL"),
            template_path: var("EMAIL_TEMPLATE_PATH"),
        };

        Self {
            draw: DrawConfig {
                max_attempts: var("SANTA_MAX_ATTEMPTS").and_then(|v| v.parse().ok()),
                strict_feasibility: None,
                seed: None,
            },
            sms: Some(sms),
            email: Some(email),
            delivery: Default::default(),
        }
    }
}
