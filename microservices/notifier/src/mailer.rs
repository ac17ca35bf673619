//! Outbound email delivery
//!
//! Delivery goes through an HTTP email API and is its own failure domain:
//! a `Delivery` error is logged by the caller, never retried, never
//! propagated past the consumer.

use async_trait::async_trait;
use certhub_core::domain::CertificateRecord;
use certhub_core::{CerthubError, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

use crate::config::NotifierConfig;

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send_certificate_created(&self, record: &CertificateRecord) -> Result<()>;
}

pub struct HttpMailer {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
    to: String,
}

#[derive(Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    text: String,
}

impl HttpMailer {
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.email_timeout_ms))
            .build()
            .map_err(|err| CerthubError::Config(format!("http client: {err}")))?;
        Ok(Self {
            http,
            api_url: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from: config.email_from.clone(),
            to: config.email_to.clone(),
        })
    }
}

pub(crate) fn email_body(record: &CertificateRecord) -> String {
    let mut body = format!(
        "A new certification was registered.\n\n\
         Name: {}\n\
         Issuing organization: {}\n\
         Date obtained: {}\n",
        record.name, record.issuing_organization, record.date_obtained
    );
    if let Some(expiration) = &record.date_expiration {
        body.push_str(&format!("Expires: {expiration}\n"));
    }
    if let Some(skills) = &record.skills {
        body.push_str(&format!("Related skills: {skills}\n"));
    }
    body
}

#[async_trait]
impl MailSender for HttpMailer {
    async fn send_certificate_created(&self, record: &CertificateRecord) -> Result<()> {
        let email = OutboundEmail {
            from: &self.from,
            to: &self.to,
            subject: format!("New certification: {}", record.name),
            text: email_body(record),
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await
            .map_err(|err| CerthubError::Delivery(err.to_string()))?;

        response
            .error_for_status()
            .map_err(|err| CerthubError::Delivery(err.to_string()))?;

        info!(record_id = %record.id, to = %self.to, "notification email sent");
        Ok(())
    }
}
