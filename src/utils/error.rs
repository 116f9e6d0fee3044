use thiserror::Error;

/// Terminal failures of a single draw. Validation variants are raised before
/// any randomness is consumed; `DrawExhausted` only after every attempt ran.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("Need at least 2 participants for Secret Santa, got {count}")]
    InsufficientParticipants { count: usize },

    #[error("Participant '{name}' is listed more than once")]
    DuplicateParticipant { name: String },

    #[error("Couple member '{name}' not in participants list")]
    UnknownExclusionMember { name: String },

    #[error("Cannot draw: {reason}")]
    ImpossibleDraw { reason: String },

    #[error("Could not generate a valid Secret Santa draw after {attempts} attempts")]
    DrawExhausted { attempts: usize },
}

#[derive(Error, Debug)]
pub enum SantaError {
    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Roster error: {message}")]
    RosterError { message: String },

    #[error("Notification failed for {recipient}: {message}")]
    NotificationError { recipient: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Draw,
    Configuration,
    Input,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SantaError::Draw(_) => ErrorCategory::Draw,
            SantaError::ConfigError { .. }
            | SantaError::MissingConfigError { .. }
            | SantaError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SantaError::CsvError(_)
            | SantaError::SerializationError(_)
            | SantaError::RosterError { .. } => ErrorCategory::Input,
            SantaError::ApiError(_) | SantaError::NotificationError { .. } => {
                ErrorCategory::Network
            }
            SantaError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SantaError::NotificationError { .. } => ErrorSeverity::Low,
            SantaError::ApiError(_) => ErrorSeverity::Medium,
            SantaError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SantaError::Draw(DrawError::InsufficientParticipants { .. }) => {
                "Add at least two participants to the roster".to_string()
            }
            SantaError::Draw(DrawError::DuplicateParticipant { name }) => {
                format!("Give '{}' a unique name in the roster", name)
            }
            SantaError::Draw(DrawError::UnknownExclusionMember { name }) => {
                format!("Add '{}' to the participants or remove the couple entry", name)
            }
            SantaError::Draw(DrawError::ImpossibleDraw { .. })
            | SantaError::Draw(DrawError::DrawExhausted { .. }) => {
                "Relax the couple constraints or invite more participants".to_string()
            }
            SantaError::MissingConfigError { field } => {
                format!("Set {} in the config file or environment", field)
            }
            SantaError::InvalidConfigValueError { field, .. } => {
                format!("Check the value of {}", field)
            }
            SantaError::ConfigError { .. } => {
                "Check the TOML config file and environment variables".to_string()
            }
            SantaError::RosterError { .. }
            | SantaError::CsvError(_)
            | SantaError::SerializationError(_) => {
                "Check the roster file format (see participants.json.example)".to_string()
            }
            SantaError::ApiError(_) | SantaError::NotificationError { .. } => {
                "Check network access and the notification provider credentials".to_string()
            }
            SantaError::IoError(_) => "Check that the file exists and is readable".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Draw => format!("Draw failed: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Could not read participants: {}", self),
            ErrorCategory::Network => format!("Notification problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;
