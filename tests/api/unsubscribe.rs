use motr::domain::{ContactDetail, ContactType};
use motr::repo::SubscriptionRepository;

use crate::helpers::{subscription, TestApp};

async fn subscribed_app() -> TestApp {
    let app = TestApp::spawn().await;
    let contact = ContactDetail::new("test@example.com", ContactType::Email);
    app.subscriptions
        .save(&subscription("AB12CDE", contact, "unsubscribe-id"))
        .await
        .unwrap();
    app
}

#[tokio::test]
async fn unsubscribe_page_names_the_vehicle() {
    let app = subscribed_app().await;

    let res = app.get("unsubscribe/unsubscribe-id").await.unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert!(res.text().await.unwrap().contains("AB12CDE"));
    assert_eq!(app.subscriptions.all().len(), 1);
}

#[tokio::test]
async fn unsubscribe_archives_exactly_one_record() {
    let app = subscribed_app().await;

    let res = app.post("unsubscribe/unsubscribe-id").await.unwrap();
    assert_eq!(res.status().as_u16(), 200);

    assert!(app.subscriptions.all().is_empty());
    let cancelled = app.cancelled.all();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, "unsubscribe-id");
    assert_eq!(cancelled[0].reason_for_cancellation, "User cancelled");

    let res = app.post("unsubscribe/unsubscribe-id").await.unwrap();
    assert_eq!(res.status().as_u16(), 404);
    assert!(res
        .text()
        .await
        .unwrap()
        .contains("You’ve already unsubscribed or the link hasn’t worked."));
    assert_eq!(app.cancelled.all().len(), 1);
}

#[tokio::test]
async fn unknown_unsubscribe_link_is_reported() {
    let app = TestApp::spawn().await;

    let res = app.get("unsubscribe/not-a-real-id").await.unwrap();

    assert_eq!(res.status().as_u16(), 404);
    assert!(res
        .text()
        .await
        .unwrap()
        .contains("You’ve already unsubscribed or the link hasn’t worked."));
}
