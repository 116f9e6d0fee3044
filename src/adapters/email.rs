use crate::adapters::gift_message;
use crate::config::toml_config::EmailConfig;
use crate::domain::model::{Pairing, Participant};
use crate::domain::ports::Notifier;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::Path;
use url::Url;

const API_VERSION: &str = "2023-03-31";

/// HTML body with `{recipient_name}` and `{receiver_name}` placeholders.
#[derive(Debug, Clone)]
pub struct EmailTemplate {
    content: String,
}

impl EmailTemplate {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| SantaError::ConfigError {
                message: format!(
                    "Email template file not found: {} ({})",
                    path.as_ref().display(),
                    e
                ),
            })?;
        Ok(Self { content })
    }

    pub fn from_string(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn render(&self, recipient_name: &str, receiver_name: &str) -> String {
        self.content
            .replace("{recipient_name}", recipient_name)
            .replace("{receiver_name}", receiver_name)
    }
}

fn default_html(name: &str, receiver_name: &str) -> String {
    format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; padding: 20px;">
    <h1 style="color: #d32f2f;">🎅 Ho ho ho, {name}!</h1>
    <p>🎁 You are buying a gift for:</p>
    <h2 style="color: #1976d2;">✨ {receiver_name} ✨</h2>
    <p>Keep it secret! 🤫</p>
</body>
</html>"#
    )
}

/// Email through Azure Communication Services, authenticated with an
/// HMAC-SHA256 signed request.
pub struct AzureEmail {
    client: Client,
    endpoint: Url,
    access_key: Vec<u8>,
    sender_address: String,
    template: Option<EmailTemplate>,
}

/// Splits `endpoint=https://...;accesskey=...` into the endpoint and the decoded key.
pub fn parse_connection_string(connection_string: &str) -> Result<(Url, Vec<u8>)> {
    let mut endpoint = None;
    let mut access_key = None;

    for part in connection_string.split(';').filter(|p| !p.trim().is_empty()) {
        let (key, value) = part.split_once('=').ok_or_else(|| invalid_connection_string(
            format!("segment '{}' is not key=value", part),
        ))?;
        match key.trim().to_ascii_lowercase().as_str() {
            "endpoint" => endpoint = Some(value.trim().to_string()),
            "accesskey" => access_key = Some(value.trim().to_string()),
            _ => {}
        }
    }

    let endpoint = endpoint.ok_or_else(|| invalid_connection_string("missing endpoint".into()))?;
    let endpoint = Url::parse(&endpoint)
        .map_err(|e| invalid_connection_string(format!("bad endpoint: {}", e)))?;
    let access_key = access_key.ok_or_else(|| invalid_connection_string("missing accesskey".into()))?;
    let access_key = STANDARD
        .decode(access_key)
        .map_err(|e| invalid_connection_string(format!("accesskey is not base64: {}", e)))?;

    Ok((endpoint, access_key))
}

fn invalid_connection_string(reason: String) -> SantaError {
    SantaError::InvalidConfigValueError {
        field: "email.connection_string".to_string(),
        value: "<redacted>".to_string(),
        reason,
    }
}

impl AzureEmail {
    pub fn new(connection_string: &str, sender_address: impl Into<String>) -> Result<Self> {
        let (endpoint, access_key) = parse_connection_string(connection_string)?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            access_key,
            sender_address: sender_address.into(),
            template: None,
        })
    }

    pub fn with_template(mut self, template: EmailTemplate) -> Self {
        self.template = Some(template);
        self
    }

    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let email = Self::new(
            validate_required_field("email.connection_string", &config.connection_string)?,
            validate_required_field("email.sender_address", &config.sender_address)?.clone(),
        )?;

        match &config.template_path {
            Some(path) => Ok(email.with_template(EmailTemplate::from_file(path)?)),
            None => Ok(email),
        }
    }

    fn send_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path("/emails:send");
        url.set_query(Some(&format!("api-version={}", API_VERSION)));
        url
    }

    fn message_body(&self, address: &str, pairing: &Pairing) -> serde_json::Value {
        let name = &pairing.giver.name;
        let receiver = &pairing.receiver.name;
        let html = match &self.template {
            Some(template) => template.render(name, receiver),
            None => default_html(name, receiver),
        };

        serde_json::json!({
            "senderAddress": self.sender_address,
            "recipients": {
                "to": [{"address": address, "displayName": name}]
            },
            "content": {
                "subject": format!("🎅 Secret Santa Assignment for {}!", name),
                "html": html,
                "plainText": gift_message(name, receiver),
            }
        })
    }

    /// Headers for Azure's HMAC scheme: the signature covers the method, path
    /// and query, date, host and body hash.
    fn signed_headers(&self, url: &Url, body: &[u8], date: &str) -> Result<(String, String)> {
        let content_hash = STANDARD.encode(Sha256::digest(body));

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(invalid_connection_string("endpoint has no host".into()));
            }
        };
        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let string_to_sign = format!("POST\n{}\n{};{};{}", path_and_query, date, host, content_hash);

        let mut mac = Hmac::<Sha256>::new_from_slice(&self.access_key)
            .map_err(|e| invalid_connection_string(format!("unusable accesskey: {}", e)))?;
        mac.update(string_to_sign.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        let authorization = format!(
            "HMAC-SHA256 SignedHeaders=x-ms-date;host;x-ms-content-sha256&Signature={}",
            signature
        );
        Ok((content_hash, authorization))
    }
}

#[async_trait]
impl Notifier for AzureEmail {
    fn channel(&self) -> &'static str {
        "email"
    }

    fn address<'a>(&self, giver: &'a Participant) -> Option<&'a str> {
        giver.email.as_deref()
    }

    fn missing_address_reason(&self) -> &'static str {
        "No email address"
    }

    async fn notify(&self, address: &str, pairing: &Pairing) -> Result<()> {
        let url = self.send_url();
        let body = serde_json::to_vec(&self.message_body(address, pairing))?;
        let date = chrono::Utc::now()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string();
        let (content_hash, authorization) = self.signed_headers(&url, &body, &date)?;

        tracing::debug!("Posting email for {} to {}", pairing.giver.name, url);
        let response = self
            .client
            .post(url)
            .header("x-ms-date", date)
            .header("x-ms-content-sha256", content_hash)
            .header("Authorization", authorization)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SantaError::NotificationError {
                recipient: address.to_string(),
                message: format!("Azure returned {}: {}", status, detail),
            });
        }

        Ok(())
    }
}
