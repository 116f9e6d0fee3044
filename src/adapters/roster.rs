use crate::domain::model::{Couple, Participant, Roster};
use crate::domain::ports::RosterSource;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::validate_file_extension;
use serde::Deserialize;
use std::path::PathBuf;

pub const ROSTER_EXTENSIONS: &[&str] = &["json", "csv"];

/// Roster read from a `.json` or `.csv` file, picked by extension.
#[derive(Debug, Clone)]
pub struct FileRoster {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    participants: Vec<Participant>,
    #[serde(default)]
    couples: Vec<Couple>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    partner: Option<String>,
}

impl FileRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn parse_json(content: &[u8]) -> Result<Roster> {
        let file: RosterFile = serde_json::from_slice(content)?;

        if file.participants.is_empty() {
            return Err(SantaError::RosterError {
                message: "JSON file must contain a 'participants' array".to_string(),
            });
        }

        let participants = file
            .participants
            .into_iter()
            .map(tidy)
            .collect::<Result<Vec<_>>>()?;
        let couples = file
            .couples
            .into_iter()
            .map(|couple| Couple::new(couple.person1.trim(), couple.person2.trim()))
            .collect();

        Ok(Roster {
            participants,
            couples,
        })
    }

    /// Columns `name,phone_number,email,partner`; only `name` is required.
    /// A `partner` on both sides of a couple declares it once.
    pub fn parse_csv(content: &[u8]) -> Result<Roster> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content);

        let mut participants = Vec::new();
        let mut couples: Vec<Couple> = Vec::new();

        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            let participant = tidy(Participant {
                name: row.name,
                phone_number: row.phone_number,
                email: row.email,
            })?;

            if let Some(partner) = row.partner.filter(|p| !p.is_empty()) {
                if !couples.iter().any(|c| c.joins(&participant.name, &partner)) {
                    couples.push(Couple::new(participant.name.clone(), partner));
                }
            }
            participants.push(participant);
        }

        if participants.is_empty() {
            return Err(SantaError::RosterError {
                message: "CSV file has no participant rows".to_string(),
            });
        }

        Ok(Roster {
            participants,
            couples,
        })
    }
}

/// Trims the name, drops blank contact fields, rejects blank names.
fn tidy(participant: Participant) -> Result<Participant> {
    let name = participant.name.trim().to_string();
    if name.is_empty() {
        return Err(SantaError::RosterError {
            message: "participant with an empty name".to_string(),
        });
    }

    let clean = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    Ok(Participant {
        name,
        phone_number: clean(participant.phone_number),
        email: clean(participant.email),
    })
}

impl RosterSource for FileRoster {
    async fn load(&self) -> Result<Roster> {
        let path_str = self.path.to_string_lossy();
        let extension = validate_file_extension("roster", &path_str, ROSTER_EXTENSIONS)?;

        tracing::debug!("Reading roster from {}", path_str);
        let data = tokio::fs::read(&self.path).await?;

        match extension.as_str() {
            "json" => Self::parse_json(&data),
            _ => Self::parse_csv(&data),
        }
    }
}
