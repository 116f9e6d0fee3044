pub mod dispatch;
pub mod engine;
pub mod feasibility;
pub mod session;

pub use crate::domain::model::{Assignment, Couple, Pairing, Participant, Roster};
pub use crate::domain::ports::{Notifier, RosterSource};
pub use crate::utils::error::{DrawError, Result};
