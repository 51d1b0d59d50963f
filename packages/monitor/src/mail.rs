//! Notification mail over SMTP.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::error::{MonitorError, Result};
use crate::types::Announcement;

const SUBJECT: &str = "Notificación de cambio en Rodajes";
const ATTACHMENT_NAME: &str = "rodajes_actual.pdf";

/// Delivers the change notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the notification for `announcement` with the diff `summary`,
    /// attaching the downloaded bulletin when given.
    async fn notify(
        &self,
        announcement: &Announcement,
        summary: &str,
        bulletin: Option<Vec<u8>>,
    ) -> Result<()>;
}

/// SMTP notifier: STARTTLS submission with username/password auth.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    recipient: String,
}

impl SmtpNotifier {
    pub fn new(host: &str, user: &str, pass: &str, recipient: &str) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(MonitorError::transport)?
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();

        Ok(Self {
            transport,
            sender: user.to_string(),
            recipient: recipient.to_string(),
        })
    }

    fn build_message(
        &self,
        announcement: &Announcement,
        summary: &str,
        bulletin: Option<Vec<u8>>,
    ) -> Result<Message> {
        let from: Mailbox = self
            .sender
            .parse()
            .map_err(|e| MonitorError::Transport(format!("invalid sender address: {e}").into()))?;
        let to: Mailbox = self
            .recipient
            .parse()
            .map_err(|e| MonitorError::Transport(format!("invalid recipient address: {e}").into()))?;

        let body = format!(
            "Se han detectado cambios en la página de rodajes:\n{}\nTexto: {}\n\n\
             Diferencias encontradas:\n{}",
            announcement.link, announcement.label, summary
        );

        let builder = Message::builder().from(from).to(to).subject(SUBJECT);

        let message = match bulletin {
            Some(bytes) => {
                let pdf = Attachment::new(ATTACHMENT_NAME.to_string()).body(
                    bytes,
                    ContentType::parse("application/pdf").expect("static content type parses"),
                );
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(body))
                        .singlepart(pdf),
                )
            }
            None => builder.body(body),
        }
        .map_err(MonitorError::transport)?;

        Ok(message)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(
        &self,
        announcement: &Announcement,
        summary: &str,
        bulletin: Option<Vec<u8>>,
    ) -> Result<()> {
        let message = self.build_message(announcement, summary, bulletin)?;

        self.transport
            .send(message)
            .await
            .map_err(MonitorError::transport)?;

        info!(recipient = %self.recipient, "notification mail sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> SmtpNotifier {
        SmtpNotifier::new(
            "smtp.example.com",
            "monitor@example.com",
            "secret",
            "desk@example.com",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn message_with_bulletin_carries_a_pdf_part() {
        let announcement = Announcement::new("/x.pdf", "Rodajes enero");
        let message = notifier()
            .build_message(&announcement, "two new shoots", Some(b"%PDF-1.4 fake".to_vec()))
            .unwrap();

        let rendered = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(rendered.contains("To: desk@example.com"));
        assert!(rendered.contains("application/pdf"));
        assert!(rendered.contains(ATTACHMENT_NAME));
    }

    #[tokio::test]
    async fn message_without_bulletin_is_plain() {
        let announcement = Announcement::new("/x.pdf", "Rodajes enero");
        let message = notifier()
            .build_message(&announcement, "two new shoots", None)
            .unwrap();

        let rendered = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(!rendered.contains("application/pdf"));
    }

    #[tokio::test]
    async fn bad_recipient_is_a_transport_error() {
        let notifier = SmtpNotifier::new(
            "smtp.example.com",
            "monitor@example.com",
            "secret",
            "not an address",
        )
        .unwrap();
        let announcement = Announcement::new("/x.pdf", "Rodajes enero");

        let result = notifier.build_message(&announcement, "", None);

        assert!(matches!(result, Err(MonitorError::Transport(_))));
    }
}
