/*!
 * Warning mail channel
 *
 * SMTP transport for best-effort warning mails and the weekly rollup. The
 * channel is optional: if construction fails the run carries on without it,
 * it just cannot escalate failures by mail any more.
 */

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::MailConfig;
use crate::error::{HygroError, Result};

/// A channel for best-effort notification mails
pub trait NotificationChannel {
    fn send_warning(&self, subject: &str, body: &str) -> Result<()>;
}

/// SMTP implementation of [`NotificationChannel`]
#[derive(Debug)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    sender: Mailbox,
    recipients: Vec<Mailbox>,
}

impl SmtpMailer {
    /// Build the mailer, validating addresses and the relay eagerly so a
    /// broken mail section fails here, once, and not per send.
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        if config.smtp_host.is_empty() {
            return Err(HygroError::Mail("mail.smtp_host is not set".to_string()));
        }
        if config.recipients.is_empty() {
            return Err(HygroError::Mail("mail.recipients is empty".to_string()));
        }

        let sender: Mailbox = config.sender.parse().map_err(|e| {
            HygroError::Mail(format!("Invalid sender address {:?}: {}", config.sender, e))
        })?;
        let mut recipients = Vec::with_capacity(config.recipients.len());
        for addr in &config.recipients {
            let mailbox = addr.parse().map_err(|e| {
                HygroError::Mail(format!("Invalid recipient address {:?}: {}", addr, e))
            })?;
            recipients.push(mailbox);
        }

        let transport = SmtpTransport::relay(&config.smtp_host)
            .map_err(|e| {
                HygroError::Mail(format!("Invalid SMTP relay {}: {}", config.smtp_host, e))
            })?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            sender,
            recipients,
        })
    }
}

impl NotificationChannel for SmtpMailer {
    fn send_warning(&self, subject: &str, body: &str) -> Result<()> {
        let mut builder = Message::builder().from(self.sender.clone());
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }
        let message = builder
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| HygroError::Mail(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(&message)
            .map_err(|e| HygroError::Mail(format!("SMTP send failed: {}", e)))?;
        Ok(())
    }
}
