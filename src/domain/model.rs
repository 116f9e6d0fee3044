use serde::{Deserialize, Serialize};

/// One person taking part in a draw. The name is the lookup key and must be
/// unique within a draw; contact channels play no part in the assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone_number: None,
            email: None,
        }
    }

    pub fn with_phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Two participants, by name, who never give to each other in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Couple {
    pub person1: String,
    pub person2: String,
}

impl Couple {
    pub fn new(person1: impl Into<String>, person2: impl Into<String>) -> Self {
        Self {
            person1: person1.into(),
            person2: person2.into(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.person1 == name || self.person2 == name
    }

    pub fn partner_of(&self, name: &str) -> Option<&str> {
        if self.person1 == name {
            Some(&self.person2)
        } else if self.person2 == name {
            Some(&self.person1)
        } else {
            None
        }
    }

    /// True when `{a, b}` is this couple, in either order.
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.person1 == a && self.person2 == b) || (self.person1 == b && self.person2 == a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub giver: Participant,
    pub receiver: Participant,
}

/// Result of one successful draw. Only the engine builds these, and only once
/// every participant gives and receives exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pairings: Vec<Pairing>,
}

impl Assignment {
    pub(crate) fn new(pairings: Vec<Pairing>) -> Self {
        Self { pairings }
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    pub fn receiver_of(&self, giver: &str) -> Option<&Participant> {
        self.pairings
            .iter()
            .find(|pairing| pairing.giver.name == giver)
            .map(|pairing| &pairing.receiver)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pairing> {
        self.pairings.iter()
    }
}

impl IntoIterator for Assignment {
    type Item = Pairing;
    type IntoIter = std::vec::IntoIter<Pairing>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairings.into_iter()
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = &'a Pairing;
    type IntoIter = std::slice::Iter<'a, Pairing>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairings.iter()
    }
}

/// Participants and couples as handed over by a roster source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub couples: Vec<Couple>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Skipped { reason: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryEntry {
    pub giver: String,
    pub receiver: String,
    #[serde(flatten)]
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub entries: Vec<DeliveryEntry>,
}

impl DeliveryReport {
    pub fn sent(&self) -> usize {
        self.count(|status| matches!(status, DeliveryStatus::Sent))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, DeliveryStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, DeliveryStatus::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&DeliveryStatus) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.status))
            .count()
    }
}
