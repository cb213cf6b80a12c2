//! Reqwest-backed SendGrid notifier adapter.
//!
//! This adapter owns transport details only: message serialisation, HTTP
//! error mapping, and the HTML bodies for invite and confirmation notices.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::dto::{AddressDto, MailSendDto};
use crate::domain::ports::{ConfirmationNotice, InviteNotice, Notifier, NotifierError};

const MAIL_SEND_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// API key and sender identity for outbound mail.
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// SendGrid API key presented as a bearer token.
    pub api_key: String,
    /// Verified sender address.
    pub sender_email: String,
    /// Display name shown beside the sender address.
    pub sender_name: String,
}

/// Notifier adapter that delivers notices through the SendGrid REST API.
pub struct SendGridNotifier {
    client: Client,
    config: SendGridConfig,
    endpoint: String,
}

impl SendGridNotifier {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: SendGridConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            config,
            endpoint: MAIL_SEND_ENDPOINT.to_owned(),
        })
    }

    /// Point the adapter at an alternative endpoint, e.g. a local stub.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn sender(&self) -> AddressDto {
        AddressDto::named(&self.config.sender_email, &self.config.sender_name)
    }

    async fn deliver(
        &self,
        to: AddressDto,
        subject: String,
        body: String,
    ) -> Result<(), NotifierError> {
        let message = MailSendDto::html(self.sender(), to, subject, body);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&message)
            .send()
            .await
            .map_err(map_transport_error)?;

        // SendGrid acknowledges accepted mail with 202 and an empty body.
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn send_invite(&self, notice: &InviteNotice) -> Result<(), NotifierError> {
        self.deliver(
            AddressDto::named(&notice.recipient_email, &notice.recipient_name),
            notice.subject(),
            invite_html(notice),
        )
        .await
    }

    async fn send_confirmation(&self, notice: &ConfirmationNotice) -> Result<(), NotifierError> {
        self.deliver(
            AddressDto::named(&notice.recipient_email, &notice.recipient_name),
            notice.subject(),
            confirmation_html(notice),
        )
        .await
    }
}

fn invite_html(notice: &InviteNotice) -> String {
    format!(
        "<p>Hi {name},</p>\
         <p>You have been invited to find a time for <strong>{title}</strong>.</p>\
         <p><a href=\"{link}\">Vote on your availability</a></p>\
         <p>The link is yours alone, so there is no need to sign in.</p>",
        name = notice.recipient_name,
        title = notice.poll_title,
        link = notice.voting_link,
    )
}

fn confirmation_html(notice: &ConfirmationNotice) -> String {
    let when = notice.start_time.format("%A %-d %B %Y at %H:%M UTC");
    let mut body = format!(
        "<p>Hi {name},</p>\
         <p><strong>{title}</strong> is confirmed for {when} ({minutes} minutes).</p>",
        name = notice.recipient_name,
        title = notice.poll_title,
        when = when,
        minutes = notice.duration_minutes,
    );
    if let Some(join_url) = &notice.join_url {
        body.push_str(&format!(
            "<p>Join online: <a href=\"{join_url}\">{join_url}</a></p>"
        ));
    }
    body.push_str("<p>A calendar invitation should reach you shortly.</p>");
    body
}

fn map_transport_error(error: reqwest::Error) -> NotifierError {
    NotifierError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> NotifierError {
    NotifierError::status(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network SendGrid mapping helpers.

    use chrono::{TimeZone, Utc};

    use super::*;

    fn confirmation(join_url: Option<&str>) -> ConfirmationNotice {
        ConfirmationNotice {
            recipient_name: "Ada".to_owned(),
            recipient_email: "ada@example.com".to_owned(),
            poll_title: "Sprint retro".to_owned(),
            start_time: Utc
                .with_ymd_and_hms(2026, 3, 2, 14, 0, 0)
                .single()
                .expect("valid instant"),
            duration_minutes: 45,
            join_url: join_url.map(str::to_owned),
        }
    }

    #[test]
    fn invite_html_links_the_personal_ballot() {
        let notice = InviteNotice {
            recipient_name: "Ada".to_owned(),
            recipient_email: "ada@example.com".to_owned(),
            poll_title: "Sprint retro".to_owned(),
            voting_link: "http://localhost:8080/poll/p1?token=abc".to_owned(),
        };

        let body = invite_html(&notice);
        assert!(body.contains("Hi Ada,"));
        assert!(body.contains("<strong>Sprint retro</strong>"));
        assert!(body.contains("href=\"http://localhost:8080/poll/p1?token=abc\""));
    }

    #[test]
    fn confirmation_html_spells_out_the_winning_slot() {
        let body = confirmation_html(&confirmation(Some("https://zoom.us/j/1")));
        assert!(body.contains("Monday 2 March 2026 at 14:00 UTC"));
        assert!(body.contains("(45 minutes)"));
        assert!(body.contains("href=\"https://zoom.us/j/1\""));
    }

    #[test]
    fn confirmation_html_omits_the_join_link_without_a_booking() {
        let body = confirmation_html(&confirmation(None));
        assert!(!body.contains("Join online"));
        assert!(body.contains("calendar invitation"));
    }

    #[test]
    fn mail_payload_nests_recipient_and_html_content() {
        let message = MailSendDto::html(
            AddressDto::named("polls@example.com", "Polls"),
            AddressDto::named("ada@example.com", "Ada"),
            "Confirmed: Sprint retro".to_owned(),
            "<p>hello</p>".to_owned(),
        );
        let body = serde_json::to_value(message).expect("message should serialise");

        assert_eq!(
            body["personalizations"][0]["to"][0]["email"],
            "ada@example.com"
        );
        assert_eq!(body["personalizations"][0]["to"][0]["name"], "Ada");
        assert_eq!(body["from"]["email"], "polls@example.com");
        assert_eq!(body["subject"], "Confirmed: Sprint retro");
        assert_eq!(body["content"][0]["type"], "text/html");
        assert_eq!(body["content"][0]["value"], "<p>hello</p>");
    }

    #[test]
    fn status_error_carries_code_and_preview() {
        let error = map_status_error(
            StatusCode::UNAUTHORIZED,
            br#"{"errors":[{"message":"The provided authorization grant is invalid"}]}"#,
        );
        match error {
            NotifierError::Status { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("authorization grant is invalid"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
