use crate::adapters::gift_message;
use crate::config::toml_config::SmsConfig;
use crate::domain::model::{Pairing, Participant};
use crate::domain::ports::Notifier;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;

pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// SMS through Twilio's Messages REST resource.
pub struct TwilioSms {
    client: Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
    sender: String,
}

impl TwilioSms {
    /// The sender name, when given, is used instead of the number.
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: Option<String>,
        from_name: Option<String>,
    ) -> Result<Self> {
        let sender = from_name
            .or(from_number)
            .ok_or_else(|| SantaError::MissingConfigError {
                field: "sms.from_number or sms.from_name".to_string(),
            })?;

        Ok(Self {
            client: Client::new(),
            api_base: TWILIO_API_BASE.to_string(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            sender,
        })
    }

    pub fn from_config(config: &SmsConfig) -> Result<Self> {
        let sms = Self::new(
            validate_required_field("sms.account_sid", &config.account_sid)?.clone(),
            validate_required_field("sms.auth_token", &config.auth_token)?.clone(),
            config.from_number.clone(),
            config.from_name.clone(),
        )?;

        Ok(match &config.api_base {
            Some(api_base) => sms.with_api_base(api_base.clone()),
            None => sms,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }
}

#[async_trait]
impl Notifier for TwilioSms {
    fn channel(&self) -> &'static str {
        "SMS"
    }

    fn address<'a>(&self, giver: &'a Participant) -> Option<&'a str> {
        giver.phone_number.as_deref()
    }

    fn missing_address_reason(&self) -> &'static str {
        "No phone number"
    }

    async fn notify(&self, address: &str, pairing: &Pairing) -> Result<()> {
        let body = gift_message(&pairing.giver.name, &pairing.receiver.name);
        let form = [
            ("To", address),
            ("From", self.sender.as_str()),
            ("Body", body.as_str()),
        ];

        tracing::debug!("Posting SMS for {} to {}", pairing.giver.name, self.api_base);
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SantaError::NotificationError {
                recipient: address.to_string(),
                message: format!("Twilio returned {}: {}", status, detail),
            });
        }

        Ok(())
    }
}
