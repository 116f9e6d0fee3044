use clap::Parser;
use secret_santa::adapters::build_notifier;
use secret_santa::utils::error::ErrorSeverity;
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{
    CliConfig, DeliveryStatus, Dispatcher, DrawEngine, FileRoster, NotificationMethod,
    SantaSession, SessionOutcome,
};

async fn run(cli: &CliConfig) -> secret_santa::Result<SessionOutcome> {
    cli.validate()?;

    let settings = cli.load_settings()?;
    let method = cli.effective_method();
    settings.validate_for(method)?;

    let mut engine = match settings.draw.seed {
        Some(seed) => {
            tracing::info!("🎲 Using fixed seed {}", seed);
            DrawEngine::seeded(seed)
        }
        None => DrawEngine::from_entropy(),
    };
    engine.set_options(settings.draw_options());

    let mut session = SantaSession::new(engine);
    if let Some(notifier) = build_notifier(method, &settings)? {
        session = session.with_dispatcher(Dispatcher::with_retry(notifier, settings.retry_policy()));
    }

    let roster = FileRoster::new(&cli.roster);
    session.run(&roster).await
}

fn print_summary(cli: &CliConfig, outcome: &SessionOutcome) {
    println!("\n🎄 Secret Santa Draw Complete! 🎄");
    println!("Drew {} pairs\n", outcome.assignment.len());

    match &outcome.delivery {
        Some(report) => {
            for entry in &report.entries {
                match &entry.status {
                    DeliveryStatus::Sent => println!("✓ Notified {}", entry.giver),
                    DeliveryStatus::Skipped { reason } => {
                        println!("✗ Skipped {} - {}", entry.giver, reason)
                    }
                    DeliveryStatus::Failed { reason } => {
                        println!("✗ Failed to notify {} - {}", entry.giver, reason)
                    }
                }
            }
            println!(
                "\n📨 {} sent, {} skipped, {} failed",
                report.sent(),
                report.skipped(),
                report.failed()
            );
        }
        None if cli.dry_run || cli.method == NotificationMethod::None => {
            println!("🔍 Dry run: nobody was notified");
        }
        None => {}
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting secret-santa");
    tracing::debug!("CLI config: {:?}", cli);

    match run(&cli).await {
        Ok(outcome) => {
            print_summary(&cli, &outcome);

            let failed = outcome.delivery.as_ref().map_or(0, |report| report.failed());
            if failed > 0 {
                tracing::warn!("{} notifications could not be delivered", failed);
                std::process::exit(2);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Secret Santa failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
