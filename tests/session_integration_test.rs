use httpmock::prelude::*;
use secret_santa::adapters::build_notifier;
use secret_santa::adapters::sms::TwilioSms;
use secret_santa::{
    Dispatcher, DrawEngine, DrawError, FileRoster, NotificationMethod, RetryPolicy, SantaConfig,
    SantaError, SantaSession,
};
use std::time::Duration;
use tempfile::TempDir;

fn write_roster(dir: &TempDir, file_name: &str, content: &str) -> FileRoster {
    let path = dir.path().join(file_name);
    std::fs::write(&path, content).unwrap();
    FileRoster::new(path)
}

const JSON_ROSTER: &str = r#"{
    "participants": [
        {"name": "Alice", "phone_number": "+15550001"},
        {"name": "Bob", "phone_number": "+15550002"},
        {"name": "Carol", "phone_number": "+15550003"},
        {"name": "Dave"}
    ],
    "couples": [
        {"person1": "Alice", "person2": "Bob"}
    ]
}"#;

#[tokio::test]
async fn test_end_to_end_json_roster_over_sms() {
    let temp_dir = TempDir::new().unwrap();
    let roster = write_roster(&temp_dir, "participants.json", JSON_ROSTER);

    let server = MockServer::start();
    let sms_mock = server.mock(|when, then| {
        when.method(POST).path("/2010-04-01/Accounts/AC1/Messages.json");
        then.status(201).json_body(serde_json::json!({"sid": "SM1"}));
    });

    let sms = TwilioSms::new("AC1", "token", None, Some("Santa".to_string()))
        .unwrap()
        .with_api_base(server.base_url());
    let mut session = SantaSession::new(DrawEngine::seeded(77)).with_dispatcher(
        Dispatcher::with_retry(
            sms,
            RetryPolicy {
                retry_attempts: 0,
                retry_delay: Duration::ZERO,
            },
        ),
    );

    let outcome = session.run(&roster).await.unwrap();

    assert_eq!(outcome.assignment.len(), 4);
    assert_ne!(outcome.assignment.receiver_of("Alice").unwrap().name, "Bob");
    assert_ne!(outcome.assignment.receiver_of("Bob").unwrap().name, "Alice");

    let report = outcome.delivery.unwrap();
    assert_eq!(report.sent(), 3);
    assert_eq!(report.skipped(), 1);
    sms_mock.assert_hits(3);
}

#[tokio::test]
async fn test_end_to_end_csv_roster_draw_only() {
    let temp_dir = TempDir::new().unwrap();
    let roster = write_roster(
        &temp_dir,
        "participants.csv",
        "name,phone_number,email,partner\nAlice,,,Bob\nBob,,,Alice\nCarol,,,Dave\nDave,,,Carol\n",
    );

    let mut session = SantaSession::new(DrawEngine::seeded(3));
    let outcome = session.run(&roster).await.unwrap();

    assert_eq!(outcome.assignment.len(), 4);
    assert!(outcome.delivery.is_none());
    for pairing in &outcome.assignment {
        let partner = match pairing.giver.name.as_str() {
            "Alice" => "Bob",
            "Bob" => "Alice",
            "Carol" => "Dave",
            _ => "Carol",
        };
        assert_ne!(pairing.receiver.name, partner);
    }
}

#[tokio::test]
async fn test_two_person_couple_sends_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let roster = write_roster(
        &temp_dir,
        "couple.json",
        r#"{"participants": [{"name": "Alice", "phone_number": "+1"}, {"name": "Bob", "phone_number": "+2"}],
            "couples": [{"person1": "Alice", "person2": "Bob"}]}"#,
    );

    let server = MockServer::start();
    let sms_mock = server.mock(|when, then| {
        when.method(POST);
        then.status(201);
    });
    let sms = TwilioSms::new("AC1", "token", Some("+15559999".to_string()), None)
        .unwrap()
        .with_api_base(server.base_url());
    let mut session =
        SantaSession::new(DrawEngine::seeded(1)).with_dispatcher(Dispatcher::new(sms));

    let err = session.run(&roster).await.unwrap_err();

    assert!(matches!(
        err,
        SantaError::Draw(DrawError::ImpossibleDraw { .. })
    ));
    sms_mock.assert_hits(0);
}

#[tokio::test]
async fn test_missing_roster_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let roster = FileRoster::new(temp_dir.path().join("nobody.json"));

    let mut session = SantaSession::new(DrawEngine::seeded(1));
    let err = session.run(&roster).await.unwrap_err();

    assert!(matches!(err, SantaError::IoError(_)));
}

#[tokio::test]
async fn test_notifier_built_from_toml_settings() {
    let server = MockServer::start();
    let sms_mock = server.mock(|when, then| {
        when.method(POST).path("/2010-04-01/Accounts/ACtoml/Messages.json");
        then.status(201);
    });

    let settings = SantaConfig::from_toml_str(&format!(
        r#"
[draw]
seed = 12

[sms]
account_sid = "ACtoml"
auth_token = "token"
from_number = "+15559999"
api_base = "{}"

[delivery]
retry_attempts = 0
"#,
        server.base_url()
    ))
    .unwrap();
    settings.validate_for(NotificationMethod::Sms).unwrap();

    let notifier = build_notifier(NotificationMethod::Sms, &settings)
        .unwrap()
        .unwrap();
    let mut engine = DrawEngine::seeded(settings.draw.seed.unwrap());
    engine.set_options(settings.draw_options());
    let mut session = SantaSession::new(engine)
        .with_dispatcher(Dispatcher::with_retry(notifier, settings.retry_policy()));

    let temp_dir = TempDir::new().unwrap();
    let roster = write_roster(&temp_dir, "participants.json", JSON_ROSTER);
    let outcome = session.run(&roster).await.unwrap();

    assert_eq!(outcome.delivery.unwrap().sent(), 3);
    sms_mock.assert_hits(3);
}
