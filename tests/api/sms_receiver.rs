use motr::domain::{ContactDetail, ContactType};
use motr::repo::SubscriptionRepository;

use crate::helpers::{subscription, TestApp, SMS_BEARER_TOKEN};

fn inbound(message: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "a4a8c9e6-3b1f-4aa0-a2fd-0e4a2b9b3c10",
        "source_number": "447123456789",
        "destination_number": "07900000000",
        "message": message,
        "date_received": "2017-10-10T10:00:00.000000Z"
    })
}

async fn subscribed_app() -> TestApp {
    let app = TestApp::spawn().await;
    app.mount_notify().await;

    let contact = ContactDetail::new("07123456789", ContactType::Mobile);
    app.subscriptions
        .save(&subscription("AB12CDE", contact, "unsubscribe-id"))
        .await
        .unwrap();
    app
}

#[tokio::test]
async fn callbacks_without_the_token_are_unauthorized() {
    let app = subscribed_app().await;

    let res = app.sms_receiver(None, &inbound("STOP AB12CDE")).await.unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let res = app
        .sms_receiver(Some("wrong-token"), &inbound("STOP AB12CDE"))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);

    assert_eq!(app.subscriptions.all().len(), 1);
}

#[tokio::test]
async fn stop_message_unsubscribes_the_sender() {
    let app = subscribed_app().await;

    let res = app
        .sms_receiver(Some(SMS_BEARER_TOKEN), &inbound("Stop ab12 cde"))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert!(app.subscriptions.all().is_empty());
    assert_eq!(app.cancelled.all().len(), 1);

    let bodies = app.notify_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["template_id"], "sms-unsubscription-confirmation");
    assert_eq!(bodies[0]["phone_number"], "07123456789");
}

#[tokio::test]
async fn unprocessable_messages_still_answer_ok() {
    let app = subscribed_app().await;

    for message in ["Hello", "STOP", "STOP AB12£CDE"] {
        let res = app
            .sms_receiver(Some(SMS_BEARER_TOKEN), &inbound(message))
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200, "message `{}`", message);
    }

    assert_eq!(app.subscriptions.all().len(), 1);
    assert!(app.notify_bodies().await.is_empty());
}
