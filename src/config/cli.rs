use crate::adapters::roster::ROSTER_EXTENSIONS;
use crate::config::{NotificationMethod, SantaConfig};
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_positive_number, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "secret-santa")]
#[command(about = "Draw Secret Santa pairs, keep couples apart, and tell every giver")]
pub struct CliConfig {
    /// Participants file (.json or .csv)
    #[arg(long, default_value = "participants.json")]
    pub roster: String,

    #[arg(long, value_enum, default_value_t = NotificationMethod::Sms)]
    pub method: NotificationMethod,

    /// TOML settings file; without it channel settings come from the environment
    #[arg(short, long)]
    pub config: Option<String>,

    /// Seed the draw for a reproducible result
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Check up front that the couples leave at least one valid draw
    #[arg(long)]
    pub strict: bool,

    /// Draw but do not send anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CliConfig {
    /// TOML file (or environment) with the command line applied on top.
    pub fn load_settings(&self) -> Result<SantaConfig> {
        let mut settings = match &self.config {
            Some(path) => SantaConfig::from_file(path)?,
            None => SantaConfig::from_env(),
        };
        self.apply_overrides(&mut settings);
        Ok(settings)
    }

    pub fn apply_overrides(&self, settings: &mut SantaConfig) {
        if let Some(seed) = self.seed {
            settings.draw.seed = Some(seed);
        }
        if let Some(max_attempts) = self.max_attempts {
            settings.draw.max_attempts = Some(max_attempts);
        }
        if self.strict {
            settings.draw.strict_feasibility = Some(true);
        }
    }

    /// The channel actually used for this run.
    pub fn effective_method(&self) -> NotificationMethod {
        if self.dry_run {
            NotificationMethod::None
        } else {
            self.method
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_file_extension("roster", &self.roster, ROSTER_EXTENSIONS)?;
        if let Some(max_attempts) = self.max_attempts {
            validate_positive_number("max_attempts", max_attempts, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let cli = CliConfig::parse_from(["secret-santa"]);
        assert_eq!(cli.roster, "participants.json");
        assert_eq!(cli.method, NotificationMethod::Sms);
        assert!(!cli.dry_run);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[draw]\nmax_attempts = 10\nseed = 1\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "secret-santa",
            "--config",
            path.as_str(),
            "--seed",
            "99",
            "--strict",
            "--method",
            "email",
        ]);
        let settings = cli.load_settings().unwrap();

        assert_eq!(settings.draw.seed, Some(99));
        assert_eq!(settings.draw.max_attempts, Some(10));
        assert!(settings.draw_options().strict_feasibility);
        assert_eq!(cli.effective_method(), NotificationMethod::Email);
    }

    #[test]
    fn test_dry_run_disables_notifications() {
        let cli = CliConfig::parse_from(["secret-santa", "--dry-run"]);
        assert_eq!(cli.effective_method(), NotificationMethod::None);
    }

    #[test]
    fn test_rejects_unknown_roster_format() {
        let cli = CliConfig::parse_from(["secret-santa", "--roster", "people.xlsx"]);
        assert!(cli.validate().is_err());
    }
}
