// ABOUTME: Outgoing mail abstraction with a development transport that writes mail to the log
// ABOUTME: Renders the password reset template around a signed link
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;
use widget_store_core::errors::AppResult;

/// Name of the password reset template
pub const PASSWORD_RESET_TEMPLATE: &str = "password-reset";

/// A rendered email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub template: String,
    pub body: String,
}

impl MailMessage {
    /// Password reset mail pointing at `link`
    #[must_use]
    pub fn password_reset(from: &str, to: &str, link: &str) -> Self {
        Self {
            from: from.to_owned(),
            to: to.to_owned(),
            subject: "Password Reset Request".to_owned(),
            template: PASSWORD_RESET_TEMPLATE.to_owned(),
            body: format!(
                "Hello,\n\n\
                 You recently requested a link to reset your password.\n\
                 Follow the link below to choose a new one. It expires in 60 minutes.\n\n\
                 {link}\n\n\
                 If you did not request a reset you can ignore this message.\n"
            ),
        }
    }
}

/// Mail transport
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message
    async fn send(&self, message: &MailMessage) -> AppResult<()>;
}

/// Writes every message to the log instead of delivering it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        info!(
            mail.from = %message.from,
            mail.to = %message.to,
            mail.subject = %message.subject,
            mail.template = %message.template,
            "Outgoing mail:\n{}",
            message.body
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_reset_renders_link() {
        let message = MailMessage::password_reset(
            "info@widgets.local",
            "admin@example.com",
            "http://localhost:4000/reset-password?email=admin@example.com&hash=abc",
        );

        assert_eq!(message.template, PASSWORD_RESET_TEMPLATE);
        assert_eq!(message.to, "admin@example.com");
        assert!(message
            .body
            .contains("http://localhost:4000/reset-password?email=admin@example.com&hash=abc"));
    }
}
