//! Email verification and passwordless login.
//!
//! Built around a single time-stamped token per identity:
//! 1. **Issue**: a fresh random token is stamped onto the identity and emailed.
//!    Issuing again replaces (invalidates) the previous token.
//! 2. **Verify**: a presented token must equal the stored one exactly. Tokens
//!    are not consumed, so a confirmation link keeps working as a login link.
//! 3. **Cool-down**: a new token is sent at most once per window, which
//!    rate-limits both resend-confirmation and login-link requests.
//!
//! A successful check is turned into an explicit [`Principal`] by the
//! [`AuthenticationBridge`]; there is no ambient "current user".

pub mod accounts;
pub mod auth;
pub mod error;
pub mod issuer;
pub mod mail;

pub use accounts::{AccountService, VerifiedEmail};
pub use auth::{AuthMethod, AuthenticationBridge, Principal};
pub use error::VerificationError;
pub use issuer::TokenIssuer;
pub use mail::{ConsoleNotifier, EmailMessage};
