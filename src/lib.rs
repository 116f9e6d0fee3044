pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::roster::FileRoster;
pub use crate::config::{NotificationMethod, SantaConfig};
pub use crate::core::dispatch::{Dispatcher, RetryPolicy};
pub use crate::core::engine::{draw, DrawEngine, DrawOptions, DEFAULT_MAX_ATTEMPTS};
pub use crate::core::session::{SantaSession, SessionOutcome};
pub use crate::domain::model::{
    Assignment, Couple, DeliveryEntry, DeliveryReport, DeliveryStatus, Pairing, Participant,
    Roster,
};
pub use crate::utils::error::{DrawError, Result, SantaError};
