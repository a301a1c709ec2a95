//! Newsletter rendering and delivery for eventboard
//!
//! Renders subscriber digests and the monthly preview (calendar grid plus
//! event table) as inline-styled HTML, and sends mail over SMTP.

mod error;
mod mailer;
mod render;

pub use error::MailError;
pub use mailer::{Mailer, SmtpConfig, SmtpMailer};
pub use render::{build_calendar_html, build_preview_email, build_subscriber_email, escape_html};
