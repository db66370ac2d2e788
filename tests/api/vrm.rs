use chrono::Utc;

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{assert_redirect_to, future_expiry, vehicle_json, TestApp, VrmForm};

#[tokio::test]
async fn invalid_registrations_show_validation_messages() {
    let app = TestApp::spawn().await;

    let test_cases = vec![
        ("", "Enter your vehicle’s registration"),
        ("AB12CDEFGHIJKL", "Registration must be shorter than 14 characters"),
        ("AB12£CD", "Registration can only contain letters, numbers and hyphens"),
    ];

    for (vrm, message) in test_cases {
        let res = app.submit_vrm(vrm).await.expect("Failed to execute request");

        assert_eq!(res.status().as_u16(), 200, "vrm `{}`", vrm);
        let body = res.text().await.unwrap();
        assert!(body.contains(message), "vrm `{}` should show `{}`", vrm, message);
    }

    let requests = app.vehicle_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn unknown_vehicle_is_reported() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.vehicle_server)
        .await;

    let body = app.submit_vrm("AB12CDE").await.unwrap().text().await.unwrap();
    assert!(body.contains("We don&#x27;t hold information about this vehicle."));

    let body = app.submit_vrm("A123456").await.unwrap().text().await.unwrap();
    assert!(body.contains("We don&#x27;t hold information about this trailer."));
}

#[tokio::test]
async fn failed_search_asks_to_try_again() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.vehicle_server)
        .await;

    let body = app.submit_vrm("AB12CDE").await.unwrap().text().await.unwrap();
    assert!(body.contains("Something went wrong with the search. Try again later."));
}

#[tokio::test]
async fn expired_test_redirects_to_test_expired() {
    let app = TestApp::spawn().await;
    let yesterday = Utc::now().date_naive() - chrono::Duration::days(1);

    Mock::given(path_regex(r"^/vehicles/registration/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vehicle_json("AB12CDE", yesterday)))
        .mount(&app.vehicle_server)
        .await;

    let res = app.submit_vrm("AB12CDE").await.unwrap();
    assert_redirect_to(&res, "/test-expired");
}

#[tokio::test]
async fn missing_expiry_redirects_to_unknown_test_date() {
    let app = TestApp::spawn().await;
    let mut vehicle = vehicle_json("AB12CDE", future_expiry());
    vehicle["motTestExpiryDate"] = serde_json::Value::Null;
    vehicle["vehicleType"] = "HGV".into();

    Mock::given(path_regex(r"^/vehicles/registration/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vehicle))
        .mount(&app.vehicle_server)
        .await;

    let res = app.submit_vrm("AB12CDE").await.unwrap();
    assert_redirect_to(&res, "/unknown-test-date");
}

#[tokio::test]
async fn mot_vehicle_without_expiry_is_not_held() {
    let app = TestApp::spawn().await;
    let mut vehicle = vehicle_json("AB12CDE", future_expiry());
    vehicle["motTestExpiryDate"] = serde_json::Value::Null;

    Mock::given(path_regex(r"^/vehicles/registration/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vehicle))
        .mount(&app.vehicle_server)
        .await;

    let res = app.submit_vrm("AB12CDE").await.unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("We don&#x27;t hold information about this vehicle."));
}

#[tokio::test]
async fn registration_is_normalised_before_lookup() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/vehicles/registration/AB12CDE"))
        .and(header("x-api-key", "test-api-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(vehicle_json("AB12CDE", future_expiry())),
        )
        .expect(1)
        .mount(&app.vehicle_server)
        .await;

    let res = app.submit_vrm(" ab12 cde ").await.unwrap();
    assert_redirect_to(&res, "/channel-selection");
}

#[tokio::test]
async fn filled_honeypot_skips_the_journey() {
    let app = TestApp::spawn().await;

    let form = VrmForm {
        reg_number: "AB12CDE".into(),
        honey: "i am a bot".into(),
    };
    let res = app.post_form("vrm", &form).await.unwrap();

    assert_redirect_to(&res, "/email-confirmation-pending");
    let requests = app.vehicle_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn later_pages_need_a_registration() {
    let app = TestApp::spawn().await;

    for page in ["channel-selection", "email", "phone-number"] {
        let res = app.get(page).await.unwrap();
        assert_redirect_to(&res, "/");
    }

    let res = app.get("review").await.unwrap();
    assert_redirect_to(&res, "/vrm");
}
