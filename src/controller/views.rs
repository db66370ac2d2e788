//! Server-rendered pages for the subscription journey

use chrono::NaiveDate;

use crate::domain::{ContactDetail, VehicleType};

const SERVICE_NAME: &str = "Get an annual MOT reminder";

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - {service}</title>
</head>
<body>
<header><a href="/">{service}</a></header>
<main id="main-content">
{content}
</main>
</body>
</html>"#,
        title = escape(title),
        service = SERVICE_NAME,
        content = content,
    )
}

fn error_summary(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(
            r#"<div class="error-summary" role="alert"><h2>There was a problem</h2><p id="error-message">{}</p></div>"#,
            escape(message)
        ),
        None => String::new(),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

pub fn start_page() -> String {
    layout(
        SERVICE_NAME,
        r#"<h1>Get an annual MOT reminder</h1>
<p>Get a free reminder by email or text message when your MOT is due.</p>
<a class="button" href="/vrm" role="button">Start now</a>"#,
    )
}

pub fn vrm_page(vrm: &str, error: Option<&str>) -> String {
    let content = format!(
        r#"{error}<h1>What is the vehicle’s registration number?</h1>
<form method="post" action="/vrm">
<label for="regNumber">Registration number</label>
<input id="regNumber" name="regNumber" type="text" value="{vrm}">
<div class="honeypot" aria-hidden="true"><input name="honey" type="text" tabindex="-1" autocomplete="off"></div>
<button type="submit">Continue</button>
</form>"#,
        error = error_summary(error),
        vrm = escape(vrm),
    );
    layout("Registration number", &content)
}

pub fn channel_selection_page(error: Option<&str>) -> String {
    let content = format!(
        r#"{error}<h1>How would you like to get your reminder?</h1>
<form method="post" action="/channel-selection">
<input id="channel-email" name="channel" type="radio" value="email"><label for="channel-email">Email</label>
<input id="channel-text" name="channel" type="radio" value="text"><label for="channel-text">Text message</label>
<button type="submit">Continue</button>
</form>"#,
        error = error_summary(error),
    );
    layout("Choose reminder type", &content)
}

pub fn email_page(email: &str, error: Option<&str>) -> String {
    let content = format!(
        r#"{error}<h1>What’s your email address?</h1>
<form method="post" action="/email">
<label for="emailAddress">Email address</label>
<input id="emailAddress" name="emailAddress" type="email" value="{email}">
<button type="submit">Continue</button>
</form>"#,
        error = error_summary(error),
        email = escape(email),
    );
    layout("Email address", &content)
}

pub fn phone_number_page(phone_number: &str, error: Option<&str>) -> String {
    let content = format!(
        r#"{error}<h1>What’s your mobile number?</h1>
<form method="post" action="/phone-number">
<label for="phoneNumber">UK mobile number</label>
<input id="phoneNumber" name="phoneNumber" type="tel" value="{phone_number}">
<button type="submit">Continue</button>
</form>"#,
        error = error_summary(error),
        phone_number = escape(phone_number),
    );
    layout("Mobile number", &content)
}

pub struct ReviewDetails<'a> {
    pub vehicle: &'a str,
    pub colour: Option<&'a str>,
    pub expiry_date: Option<NaiveDate>,
    pub contact: &'a ContactDetail,
    pub contact_as_entered: &'a str,
}

pub fn review_page(details: &ReviewDetails<'_>) -> String {
    let expiry = details
        .expiry_date
        .map(format_date)
        .unwrap_or_else(|| "Unknown".into());
    let (contact_label, change_link) = if details.contact.is_email() {
        ("Email address", "/email")
    } else {
        ("Mobile number", "/phone-number")
    };

    let content = format!(
        r#"<h1>Check your details</h1>
<dl>
<dt>Vehicle</dt><dd id="vehicle">{vehicle}</dd><dd><a href="/vrm">Change</a></dd>
<dt>Colour</dt><dd>{colour}</dd>
<dt>MOT due date</dt><dd id="mot-due-date">{expiry}</dd>
<dt>{contact_label}</dt><dd id="contact">{contact}</dd><dd><a href="{change_link}">Change</a></dd>
</dl>
<form method="post" action="/review">
<button type="submit">Continue</button>
</form>"#,
        vehicle = escape(details.vehicle),
        colour = escape(details.colour.unwrap_or("Unknown")),
        expiry = expiry,
        contact_label = contact_label,
        contact = escape(details.contact_as_entered),
        change_link = change_link,
    );
    layout("Check your details", &content)
}

pub fn email_confirmation_pending_page() -> String {
    layout(
        "Check your email",
        r#"<h1>You’ve been sent an email</h1>
<p>Click the link in the email to confirm your MOT reminder.</p>
<p>The link will expire in 24 hours.</p>"#,
    )
}

pub fn confirm_phone_page(phone_number: &str, error: Option<&str>) -> String {
    let content = format!(
        r#"{error}<h1>Check your phone</h1>
<p>We’ve sent a code to <strong>{phone_number}</strong>.</p>
<form method="post" action="/confirm-phone">
<label for="confirmationCode">Text message code</label>
<input id="confirmationCode" name="confirmationCode" type="text" inputmode="numeric" autocomplete="off">
<button type="submit">Continue</button>
</form>
<p><a href="/confirm-phone/resend">Send a new code</a></p>"#,
        error = error_summary(error),
        phone_number = escape(phone_number),
    );
    layout("Confirm your mobile number", &content)
}

pub fn subscription_confirmed_page(vehicle_type: VehicleType, contact: &ContactDetail) -> String {
    let channel = if contact.is_email() { "an email" } else { "a text message" };
    let reminders = if vehicle_type.is_annual_test() {
        "two months and one month before its annual test is due"
    } else {
        "one month and two weeks before its MOT is due, and the day after it expires"
    };

    let content = format!(
        r#"<h1 id="confirmed">You’ve signed up for an MOT reminder</h1>
<p>You’ll get {channel} {reminders}.</p>"#,
    );
    layout("Reminder confirmed", &content)
}

pub fn already_subscribed_page() -> String {
    layout(
        "Already subscribed",
        r#"<h1>You’ve already signed up for a reminder</h1>
<p>You’ll get a reminder for this vehicle when its MOT is due.</p>"#,
    )
}

pub fn unknown_test_date_page() -> String {
    layout(
        "Unknown test date",
        r#"<h1>We can’t find the test due date for this vehicle</h1>
<p>You can’t set up a reminder for this vehicle yet.</p>"#,
    )
}

pub fn test_expired_page() -> String {
    layout(
        "MOT expired",
        r#"<h1>This vehicle’s MOT has expired</h1>
<p>You must not drive this vehicle on the road unless you’re driving it to a pre-booked MOT test.</p>"#,
    )
}

pub fn unsubscribe_page(unsubscribe_id: &str, vrm: &str) -> String {
    let content = format!(
        r#"<h1>Unsubscribe from MOT reminders for {vrm}</h1>
<form method="post" action="/unsubscribe/{id}">
<button type="submit">Unsubscribe</button>
</form>"#,
        vrm = escape(vrm),
        id = escape(unsubscribe_id),
    );
    layout("Unsubscribe", &content)
}

pub fn unsubscribed_page(vrm: &str) -> String {
    let content = format!(
        r#"<h1 id="unsubscribed">You’ve unsubscribed</h1>
<p>You won’t get any more MOT reminders for {}.</p>"#,
        escape(vrm)
    );
    layout("Unsubscribed", &content)
}

pub fn error_page(message: &str) -> String {
    let content = format!(
        r#"<h1>Sorry, there is a problem</h1>
<p id="error-message">{}</p>"#,
        escape(message)
    );
    layout("Error", &content)
}
