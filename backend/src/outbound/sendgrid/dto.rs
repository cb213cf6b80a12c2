//! DTOs for the SendGrid v3 mail send endpoint.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub(super) struct MailSendDto {
    pub(super) personalizations: Vec<PersonalizationDto>,
    pub(super) from: AddressDto,
    pub(super) subject: String,
    pub(super) content: Vec<ContentDto>,
}

#[derive(Debug, Serialize)]
pub(super) struct PersonalizationDto {
    pub(super) to: Vec<AddressDto>,
}

#[derive(Debug, Serialize)]
pub(super) struct AddressDto {
    pub(super) email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ContentDto {
    #[serde(rename = "type")]
    pub(super) content_type: String,
    pub(super) value: String,
}

impl MailSendDto {
    /// Single-recipient HTML message, the only shape this service sends.
    pub(super) fn html(from: AddressDto, to: AddressDto, subject: String, body: String) -> Self {
        Self {
            personalizations: vec![PersonalizationDto { to: vec![to] }],
            from,
            subject,
            content: vec![ContentDto {
                content_type: "text/html".to_owned(),
                value: body,
            }],
        }
    }
}

impl AddressDto {
    pub(super) fn named(email: &str, name: &str) -> Self {
        Self {
            email: email.to_owned(),
            name: Some(name.to_owned()),
        }
    }
}
