use wiremock::matchers::any;
use wiremock::{Mock, ResponseTemplate};

use motr::domain::{ContactDetail, ContactType};
use motr::repo::SubscriptionRepository;

use crate::helpers::{assert_redirect_to, future_expiry, subscription, TestApp};

/// Pull the first link out of text
fn first_link(text: &str) -> String {
    let links: Vec<_> = linkify::LinkFinder::new()
        .links(text)
        .filter(|l| *l.kind() == linkify::LinkKind::Url)
        .collect();
    assert_eq!(links.len(), 1);
    links[0].as_str().to_owned()
}

#[tokio::test]
async fn email_journey_creates_a_confirmed_subscription() {
    let app = TestApp::spawn().await;
    app.mount_vehicle("AB12CDE", future_expiry()).await;
    app.mount_notify().await;

    app.fill_in_email_journey("AB12CDE", "test@example.com").await;

    let review = app.get("review").await.unwrap().text().await.unwrap();
    assert!(review.contains("TEST-MAKE TEST-MODEL, AB12CDE"));
    assert!(review.contains("test@example.com"));

    let res = app.submit_review().await.unwrap();
    assert_redirect_to(&res, "/email-confirmation-pending");
    assert_eq!(app.pending.all().len(), 1);

    let bodies = app.notify_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["template_id"], "email-confirmation");
    assert_eq!(bodies[0]["email_address"], "test@example.com");

    let link = first_link(bodies[0]["personalisation"]["confirmation_link"].as_str().unwrap());
    let confirmation_path = link.strip_prefix(crate::helpers::BASE_URL).unwrap().trim_start_matches('/');

    let res = app.get(confirmation_path).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    assert!(res.text().await.unwrap().contains("You’ve signed up for an MOT reminder"));

    let subscriptions = app.subscriptions.all();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].vrm, "AB12CDE");
    assert_eq!(subscriptions[0].mot_due_date, future_expiry());
    assert!(app.pending.all().is_empty());

    // The pending record is gone, so the link no longer works
    let res = app.get(confirmation_path).await.unwrap();
    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn resubmitting_reuses_the_confirmation_id() {
    let app = TestApp::spawn().await;
    app.mount_vehicle("AB12CDE", future_expiry()).await;
    app.mount_notify().await;

    app.fill_in_email_journey("AB12CDE", "test@example.com").await;
    app.submit_review().await.unwrap();
    let first_id = app.pending.all()[0].confirmation_id.clone();

    app.submit_review().await.unwrap();

    let pending = app.pending.all();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].confirmation_id, first_id);

    let bodies = app.notify_bodies().await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(
        bodies[0]["personalisation"]["confirmation_link"],
        bodies[1]["personalisation"]["confirmation_link"]
    );
}

#[tokio::test]
async fn existing_subscriber_is_told_they_are_subscribed() {
    let app = TestApp::spawn().await;
    app.mount_vehicle("AB12CDE", future_expiry()).await;
    app.mount_notify().await;

    let contact = ContactDetail::new("test@example.com", ContactType::Email);
    app.subscriptions
        .save(&subscription("AB12CDE", contact, "unsubscribe-id"))
        .await
        .unwrap();

    app.fill_in_email_journey("AB12CDE", "test@example.com").await;
    let res = app.submit_review().await.unwrap();

    assert_redirect_to(&res, "/subscription-confirmed/already");
    assert!(app.pending.all().is_empty());
    assert!(app.notify_bodies().await.is_empty());
}

#[tokio::test]
async fn existing_subscriber_is_recognised_while_vehicle_api_is_down() {
    let app = TestApp::spawn().await;
    app.mount_vehicle("AB12CDE", future_expiry()).await;
    app.mount_notify().await;

    let contact = ContactDetail::new("test@example.com", ContactType::Email);
    let mut existing = subscription("AB12CDE", contact, "unsubscribe-id");
    existing.mot_due_date = future_expiry() + chrono::Duration::days(7);
    app.subscriptions.save(&existing).await.unwrap();

    app.fill_in_email_journey("AB12CDE", "test@example.com").await;
    app.vehicle_server.reset().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.vehicle_server)
        .await;

    let res = app.submit_review().await.unwrap();

    assert_redirect_to(&res, "/subscription-confirmed/already");
    assert_eq!(app.subscriptions.all()[0].mot_due_date, existing.mot_due_date);
}

#[tokio::test]
async fn invalid_contact_details_show_validation_messages() {
    let app = TestApp::spawn().await;
    app.mount_vehicle("AB12CDE", future_expiry()).await;

    let res = app.submit_vrm("AB12CDE").await.unwrap();
    assert_redirect_to(&res, "/channel-selection");

    let body = app
        .post_form("channel-selection", &[("channel", "")])
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Choose a type of reminder"));

    let test_cases = vec![
        ("email", "emailAddress", "", "Enter your email address"),
        ("email", "emailAddress", "not-an-email", "Enter a valid email address"),
        ("phone-number", "phoneNumber", "", "Enter your mobile number"),
        ("phone-number", "phoneNumber", "01234567890", "Enter a valid UK mobile number"),
    ];

    for (page, field, value, message) in test_cases {
        let res = app.post_form(page, &[(field, value)]).await.unwrap();

        assert_eq!(res.status().as_u16(), 200, "{} `{}`", page, value);
        assert!(res.text().await.unwrap().contains(message), "{} `{}`", page, value);
    }

    // Nothing was accepted, so there is no contact to review
    let res = app.get("review").await.unwrap();
    assert_redirect_to(&res, "/vrm");
    assert!(app.pending.all().is_empty());
}

#[tokio::test]
async fn sms_journey_confirms_with_the_texted_code() {
    let app = TestApp::spawn().await;
    app.mount_vehicle("AB12CDE", future_expiry()).await;
    app.mount_notify().await;

    app.fill_in_sms_journey("AB12CDE", "+44 7123 456789").await;

    let review = app.get("review").await.unwrap().text().await.unwrap();
    assert!(review.contains("+44 7123 456789"));

    let res = app.submit_review().await.unwrap();
    assert_redirect_to(&res, "/confirm-phone");

    let pending = app.pending.all();
    assert_eq!(pending[0].contact.value, "07123456789");

    let bodies = app.notify_bodies().await;
    assert_eq!(bodies[0]["template_id"], "sms-confirmation-code");
    assert_eq!(bodies[0]["phone_number"], "07123456789");
    let code = bodies[0]["personalisation"]["confirmation_code"]
        .as_str()
        .unwrap()
        .to_owned();

    let wrong_code = if code == "000000" { "111111" } else { "000000" };
    let body = app
        .post_form("confirm-phone", &[("confirmationCode", wrong_code)])
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("The code is not valid"));

    let body = app
        .post_form("confirm-phone", &[("confirmationCode", "12")])
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Enter the 6-digit code from the text message"));

    let res = app
        .post_form("confirm-phone", &[("confirmationCode", code.as_str())])
        .await
        .unwrap();
    let confirmation_path = format!("/confirm-subscription/{}", pending[0].confirmation_id);
    assert_redirect_to(&res, &confirmation_path);

    let res = app.get(confirmation_path.trim_start_matches('/')).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let subscriptions = app.subscriptions.all();
    assert_eq!(subscriptions.len(), 1);
    assert!(subscriptions[0].contact.is_mobile());
}

#[tokio::test]
async fn third_wrong_code_locks_the_confirmation() {
    let app = TestApp::spawn().await;
    app.mount_vehicle("AB12CDE", future_expiry()).await;
    app.mount_notify().await;

    app.fill_in_sms_journey("AB12CDE", "07123456789").await;
    app.submit_review().await.unwrap();

    let code = app.pending.all()[0].sms_confirmation.clone().unwrap().code;
    let wrong_code = if code == "000000" { "111111" } else { "000000" };

    let mut last_body = String::new();
    for _ in 0..3 {
        last_body = app
            .post_form("confirm-phone", &[("confirmationCode", wrong_code)])
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
    }
    assert!(last_body.contains("You’ve entered an incorrect code 3 times"));

    // Even the right code is refused now
    let body = app
        .post_form("confirm-phone", &[("confirmationCode", code.as_str())])
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("You’ve entered an incorrect code 3 times"));
    assert!(app.subscriptions.all().is_empty());
}

#[tokio::test]
async fn code_resends_are_limited() {
    let app = TestApp::spawn().await;
    app.mount_vehicle("AB12CDE", future_expiry()).await;
    app.mount_notify().await;

    app.fill_in_sms_journey("AB12CDE", "07123456789").await;
    app.submit_review().await.unwrap();

    for _ in 0..3 {
        let res = app.get("confirm-phone/resend").await.unwrap();
        assert_redirect_to(&res, "/confirm-phone");
    }

    let res = app.get("confirm-phone/resend").await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    assert!(res.text().await.unwrap().contains("You’ve already requested a new code"));

    // One code from the review page, three re-sends
    let bodies = app.notify_bodies().await;
    assert_eq!(bodies.len(), 4);
}

#[tokio::test]
async fn resubmitting_the_review_page_does_not_reset_the_resend_limit() {
    let app = TestApp::spawn().await;
    app.mount_vehicle("AB12CDE", future_expiry()).await;
    app.mount_notify().await;

    app.fill_in_sms_journey("AB12CDE", "07123456789").await;
    app.submit_review().await.unwrap();
    for _ in 0..3 {
        app.get("confirm-phone/resend").await.unwrap();
    }

    let res = app.submit_review().await.unwrap();
    assert_redirect_to(&res, "/confirm-phone/resend");

    let res = app.get("confirm-phone/resend").await.unwrap();
    assert!(res.text().await.unwrap().contains("You’ve already requested a new code"));
    assert_eq!(app.notify_bodies().await.len(), 4);
}
