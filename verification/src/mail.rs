//! Email composition and the log-only notifier used in development.

use cohort_types::{Identity, NotificationKind, Notifier, VerificationToken};
use url::form_urlencoded;

/// A composed email, ready for a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub message: String,
}

impl EmailMessage {
    /// Compose the email carrying `token` for `identity`.
    pub fn for_token(
        host: &str,
        identity: &Identity,
        kind: NotificationKind,
        token: &VerificationToken,
    ) -> Self {
        let (route, subject, prompt) = match kind {
            NotificationKind::SignUpConfirmation => (
                "check-email-token",
                "Confirm your cohort account",
                "Follow the link to verify your email address",
            ),
            NotificationKind::LoginLink => (
                "login-by-email",
                "Your cohort login link",
                "Follow the link to log in",
            ),
        };
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("token", token.as_str())
            .append_pair("email", &identity.email)
            .finish();
        let link = format!("{}/{}?{}", host.trim_end_matches('/'), route, query);
        Self {
            to: identity.email.clone(),
            subject: subject.to_string(),
            message: format!("Hi {},\n{}:\n{}", identity.nickname, prompt, link),
        }
    }
}

/// Writes outgoing emails to the log instead of delivering them.
pub struct ConsoleNotifier {
    host: String,
}

impl ConsoleNotifier {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, identity: &Identity, kind: NotificationKind, token: &VerificationToken) {
        let email = EmailMessage::for_token(&self.host, identity, kind, token);
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            %kind,
            "sent email: {}",
            email.message
        );
    }
}
