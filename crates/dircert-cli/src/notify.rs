//! SMTP delivery of the finished report.

use std::path::Path;
use std::time::Duration;

use dircert_core::{NotifyError, Notifier};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use tracing::{debug, error};

use crate::config::MailConfig;

/// Subject line of the report mail
pub const REPORT_SUBJECT: &str = "Directory Cert Checker Report";

const SMTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Sends mail through one SMTP relay.
pub struct MailNotifier {
    config: MailConfig,
}

impl MailNotifier {
    pub const fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Whether there is anyone to send to
    pub fn has_recipients(&self) -> bool {
        !self.config.to.is_empty()
    }

    fn mailbox(address: &str, name: Option<&str>) -> Result<Mailbox, NotifyError> {
        let parsed: Address = address.trim().parse().map_err(|e: lettre::address::AddressError| {
            NotifyError::Address {
                address: address.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Mailbox::new(name.map(str::to_string), parsed))
    }

    /// Assemble the message. A missing attachment is logged and skipped.
    pub fn build_message(
        &self,
        subject: &str,
        body: &str,
        attachment: Option<&Path>,
    ) -> Result<Message, NotifyError> {
        if self.config.to.is_empty() {
            return Err(NotifyError::Message("no recipients configured".to_string()));
        }

        let mut builder = Message::builder()
            .from(Self::mailbox(
                &self.config.from,
                Some(&self.config.from_display_name),
            )?)
            .subject(subject);
        for to in &self.config.to {
            builder = builder.to(Self::mailbox(to, None)?);
        }

        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(body.to_string()));
        if let Some(path) = attachment {
            match std::fs::read(path) {
                Ok(content) => {
                    debug!(path = %path.display(), bytes = content.len(), "attaching report");
                    let filename = path
                        .file_name()
                        .map_or_else(|| "report.csv".to_string(), |n| n.to_string_lossy().into_owned());
                    let content_type = ContentType::parse("text/csv")
                        .map_err(|e| NotifyError::Message(e.to_string()))?;
                    parts = parts.singlepart(Attachment::new(filename).body(content, content_type));
                }
                Err(e) => error!(path = %path.display(), error = %e, "unable to attach report"),
            }
        }

        builder
            .multipart(parts)
            .map_err(|e| NotifyError::Message(e.to_string()))
    }

    fn transport(&self) -> Result<SmtpTransport, NotifyError> {
        let server = self.config.smtp_server.trim();
        let builder = if self.config.use_starttls {
            SmtpTransport::starttls_relay(server).map_err(|e| NotifyError::Transport(e.to_string()))?
        } else {
            SmtpTransport::builder_dangerous(server)
        };

        let mut builder = builder
            .port(self.config.smtp_port)
            .timeout(Some(SMTP_TIMEOUT));
        if let Some(username) = self.config.username.as_deref().filter(|u| !u.is_empty()) {
            builder = builder.credentials(Credentials::new(
                username.to_string(),
                self.config.password.clone().unwrap_or_default(),
            ));
        }

        Ok(builder.build())
    }
}

impl Notifier for MailNotifier {
    fn deliver(
        &self,
        subject: &str,
        body: &str,
        attachment: Option<&Path>,
    ) -> Result<(), NotifyError> {
        let message = self.build_message(subject, body, attachment)?;
        self.transport()?
            .send(&message)
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        debug!(
            server = %self.config.smtp_server,
            recipients = self.config.to.len(),
            subject,
            "sent report mail"
        );
        Ok(())
    }
}
