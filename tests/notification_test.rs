use httpmock::prelude::*;
use secret_santa::adapters::email::{AzureEmail, EmailTemplate};
use secret_santa::adapters::sms::TwilioSms;
use secret_santa::core::dispatch::{Dispatcher, RetryPolicy};
use secret_santa::domain::ports::Notifier;
use secret_santa::{DeliveryStatus, DrawEngine, Pairing, Participant, SantaError};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn pairing() -> Pairing {
    Pairing {
        giver: Participant::new("Alice")
            .with_phone("+15550001")
            .with_email("alice@example.com"),
        receiver: Participant::new("Bob"),
    }
}

fn twilio(server: &MockServer) -> TwilioSms {
    TwilioSms::new("AC1", "token", Some("+15559999".to_string()), None)
        .unwrap()
        .with_api_base(server.base_url())
}

fn no_delay(retry_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        retry_attempts,
        retry_delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn test_twilio_posts_form_with_basic_auth() {
    let server = MockServer::start();
    let sms_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/2010-04-01/Accounts/AC1/Messages.json")
            .header("authorization", "Basic QUMxOnRva2Vu")
            .body_contains("To=%2B15550001")
            .body_contains("From=%2B15559999")
            .body_contains("Bob");
        then.status(201)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"sid": "SM1", "status": "queued"}));
    });

    let sms = twilio(&server);
    sms.notify("+15550001", &pairing()).await.unwrap();

    sms_mock.assert();
}

#[tokio::test]
async fn test_twilio_error_becomes_notification_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(400).body("The 'To' number is not a valid phone number.");
    });

    let err = twilio(&server)
        .notify("not-a-number", &pairing())
        .await
        .unwrap_err();

    match err {
        SantaError::NotificationError { recipient, message } => {
            assert_eq!(recipient, "not-a-number");
            assert!(message.contains("400"));
            assert!(message.contains("not a valid phone number"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_azure_email_signs_request() {
    let server = MockServer::start();
    let email_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/emails:send")
            .query_param("api-version", "2023-03-31")
            .header_exists("x-ms-date")
            .header_exists("x-ms-content-sha256")
            .header("content-type", "application/json")
            .body_contains("\"senderAddress\":\"santa@example.com\"")
            .body_contains("Dear Alice, you drew Bob");
        then.status(202)
            .json_body(serde_json::json!({"id": "op-1", "status": "Running"}));
    });

    let connection = format!("endpoint={}/;accesskey=c2VjcmV0LWtleQ==", server.base_url());
    let email = AzureEmail::new(&connection, "santa@example.com")
        .unwrap()
        .with_template(EmailTemplate::from_string(
            "<p>Dear {recipient_name}, you drew {receiver_name}</p>",
        ));

    email.notify("alice@example.com", &pairing()).await.unwrap();

    email_mock.assert();
}

#[test]
fn test_email_template_loaded_from_file() {
    let mut template_file = NamedTempFile::new().unwrap();
    template_file
        .write_all(b"<h1>{recipient_name}</h1><h2>{receiver_name}</h2>")
        .unwrap();

    let template = EmailTemplate::from_file(template_file.path()).unwrap();
    assert_eq!(template.render("Carol", "Dave"), "<h1>Carol</h1><h2>Dave</h2>");
}

#[tokio::test]
async fn test_dispatcher_retries_then_reports_failure() {
    let server = MockServer::start();
    let failing = server.mock(|when, then| {
        when.method(POST);
        then.status(503);
    });

    let participants = vec![
        Participant::new("Alice").with_phone("+15550001"),
        Participant::new("Bob"),
    ];
    let assignment = DrawEngine::seeded(5).draw(&participants, &[]).unwrap();
    let dispatcher = Dispatcher::with_retry(twilio(&server), no_delay(2));

    let report = dispatcher.dispatch(&assignment).await;

    // Alice is tried three times, Bob has no phone and is skipped.
    failing.assert_hits(3);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 1);
    let bob = report.entries.iter().find(|e| e.giver == "Bob").unwrap();
    assert_eq!(
        bob.status,
        DeliveryStatus::Skipped {
            reason: "No phone number".to_string()
        }
    );
}
