//! 邮件通知
//!
//! 正文 = 模式说明文字 + 空行 + 制表符分隔的表头与数据行；
//! `To` 为本人，`Cc` 为逐层上级。通过 STARTTLS 发送。

use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::calendar::ReportingPeriod;
use crate::config::MailSettings;
use crate::directory::RecipientSet;
use crate::error::ReportError;
use crate::models::ReportRecord;

/// 邮件标题：`<模式标题> MM/DD-MM/DD`
pub fn compose_subject(mail_title: &str, period: &ReportingPeriod) -> String {
    format!(
        "{} {}-{}",
        mail_title,
        period.start().format("%m/%d"),
        period.end().format("%m/%d")
    )
}

/// 邮件正文
pub fn compose_body(preamble: &str, records: &[ReportRecord]) -> String {
    let mut body = format!("{}\n\n", preamble);
    if let Some(first) = records.first() {
        body.push_str(&first.headers().join("\t"));
        for record in records {
            body.push_str("\r\n");
            body.push_str(&record.rendered_values().join("\t"));
        }
    }
    body
}

/// 待发送的邮件
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub recipients: RecipientSet,
    pub attachment: Option<PathBuf>,
}

fn mailbox(address: &str) -> Result<Mailbox, ReportError> {
    address.parse().map_err(|source| ReportError::Address {
        address: address.to_string(),
        source,
    })
}

fn csv_attachment(path: &Path) -> Result<SinglePart, ReportError> {
    let content = std::fs::read(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "result.csv".to_string());
    let content_type = ContentType::parse("text/csv").map_err(|e| ReportError::Attachment {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(Attachment::new(file_name).body(content, content_type))
}

impl OutgoingMail {
    /// 构建 MIME 邮件
    pub fn build(&self, from: &str) -> Result<Message, ReportError> {
        if self.recipients.is_empty() {
            return Err(ReportError::NoRecipients);
        }

        let mut builder = Message::builder()
            .from(mailbox(from)?)
            .subject(self.subject.clone())
            .date_now();
        for address in &self.recipients.to {
            builder = builder.to(mailbox(address)?);
        }
        for address in &self.recipients.cc {
            builder = builder.cc(mailbox(address)?);
        }

        let message = match &self.attachment {
            Some(path) => builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(self.body.clone()))
                    .singlepart(csv_attachment(path)?),
            )?,
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(self.body.clone())?,
        };
        Ok(message)
    }
}

/// SMTP 发送器
pub struct Mailer {
    settings: MailSettings,
}

impl Mailer {
    pub fn new(settings: MailSettings) -> Self {
        Self { settings }
    }

    pub async fn send(&self, mail: &OutgoingMail) -> Result<(), ReportError> {
        let message = mail.build(&self.settings.from)?;

        let relay = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.smtp_host)?;
        let transport = relay
            .port(self.settings.smtp_port)
            .credentials(Credentials::new(
                self.settings.username.clone(),
                self.settings.password.clone(),
            ))
            .build();

        info!(
            "📧 发送邮件 '{}' (To {} / Cc {})",
            mail.subject,
            mail.recipients.to.len(),
            mail.recipients.cc.len()
        );
        transport.send(message).await?;
        info!("✓ 邮件已发送");
        Ok(())
    }
}
