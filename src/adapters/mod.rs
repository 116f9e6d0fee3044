// Adapters layer: concrete implementations for external systems (roster files, SMS, email).

pub mod email;
pub mod roster;
pub mod sms;

use crate::config::{NotificationMethod, SantaConfig};
use crate::domain::ports::Notifier;
use crate::utils::error::{Result, SantaError};

/// Plain-text body shared by every channel.
pub fn gift_message(name: &str, receiver_name: &str) -> String {
    format!(
        "🎅 Ho ho ho, {}!\n\n🎁 You are buying a gift for:\n✨ {} ✨\n\nKeep it secret! 🤫",
        name, receiver_name
    )
}

/// Notifier for `method`, or `None` when nobody should be contacted.
pub fn build_notifier(
    method: NotificationMethod,
    config: &SantaConfig,
) -> Result<Option<Box<dyn Notifier>>> {
    let missing = |field: &str| SantaError::MissingConfigError {
        field: field.to_string(),
    };

    match method {
        NotificationMethod::Sms => {
            let settings = config.sms.as_ref().ok_or_else(|| missing("sms"))?;
            let notifier: Box<dyn Notifier> = Box::new(sms::TwilioSms::from_config(settings)?);
            Ok(Some(notifier))
        }
        NotificationMethod::Email => {
            let settings = config.email.as_ref().ok_or_else(|| missing("email"))?;
            let notifier: Box<dyn Notifier> = Box::new(email::AzureEmail::from_config(settings)?);
            Ok(Some(notifier))
        }
        NotificationMethod::None => Ok(None),
    }
}
