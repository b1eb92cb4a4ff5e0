//! Email delivery over SMTP or a local `sendmail`-compatible binary.
//!
//! Messages are assembled with `lettre`, which picks a transfer encoding for
//! the HTML body and RFC 2047-encodes non-ASCII headers.

use std::time::Duration;

use lettre::message::{Mailbox, Message, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSendmailTransport, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use localbirds_core::{EmailSettings, EmailTransport, SmtpSettings};

use crate::error::NotifyError;

enum Transport {
    Sendmail(AsyncSendmailTransport<Tokio1Executor>),
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
}

pub struct EmailNotifier {
    transport: Transport,
    from: String,
}

impl EmailNotifier {
    /// Builds the configured transport. SMTP connections are opened lazily
    /// on the first send.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Smtp`] if the SMTP relay cannot be configured.
    pub fn new(settings: &EmailSettings, timeout_secs: u64) -> Result<Self, NotifyError> {
        let transport = match &settings.transport {
            EmailTransport::Sendmail { path } => Transport::Sendmail(
                AsyncSendmailTransport::<Tokio1Executor>::new_with_command(path.clone()),
            ),
            EmailTransport::Smtp(smtp) => Transport::Smtp(smtp_transport(smtp, timeout_secs)?),
        };
        Ok(Self {
            transport,
            from: settings.from.clone(),
        })
    }

    /// Sends `html` as a single-part HTML message to every recipient.
    ///
    /// # Errors
    ///
    /// - [`NotifyError::NoRecipients`] if `recipients` is empty.
    /// - [`NotifyError::Address`] if the sender or a recipient is not a valid address.
    /// - [`NotifyError::Message`] if the message cannot be assembled.
    /// - [`NotifyError::Sendmail`] or [`NotifyError::Smtp`] if delivery fails.
    pub async fn send(
        &self,
        html: &str,
        subject: &str,
        recipients: &[String],
    ) -> Result<(), NotifyError> {
        if recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }
        let message = build_message(&self.from, recipients, subject, html)?;

        match &self.transport {
            Transport::Sendmail(transport) => {
                transport.send(message).await?;
                tracing::info!(recipients = recipients.len(), "digest email handed to sendmail");
            }
            Transport::Smtp(transport) => {
                transport.send(message).await?;
                tracing::info!(recipients = recipients.len(), "digest email sent over SMTP");
            }
        }
        Ok(())
    }
}

fn smtp_transport(
    smtp: &SmtpSettings,
    timeout_secs: u64,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
    let builder = if smtp.starttls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?
    };
    Ok(builder
        .port(smtp.port)
        .credentials(Credentials::new(smtp.username.clone(), smtp.password.clone()))
        .timeout(Some(Duration::from_secs(timeout_secs)))
        .build())
}

/// Assembles an RFC 5322 message with an HTML body.
///
/// Line breaks in the subject are replaced with spaces so a configured
/// subject cannot inject extra headers.
fn build_message(
    from: &str,
    recipients: &[String],
    subject: &str,
    html: &str,
) -> Result<Message, NotifyError> {
    let mut builder = Message::builder()
        .from(from.trim().parse::<Mailbox>()?)
        .subject(single_line(subject));
    for recipient in recipients {
        builder = builder.to(recipient.trim().parse::<Mailbox>()?);
    }
    Ok(builder.singlepart(SinglePart::html(html.to_string()))?)
}

fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
