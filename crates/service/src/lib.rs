//! Service layer for eventboard
//!
//! Centralizes business logic between HTTP/CLI handlers and storage/mail.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod error;
mod event_service;
mod import_service;
mod newsletter_service;
mod subscriber_service;

pub use error::ServiceError;
pub use event_service::EventService;
pub use import_service::{ImportRecord, ImportService};
pub use newsletter_service::NewsletterService;
pub use subscriber_service::SubscriberService;
