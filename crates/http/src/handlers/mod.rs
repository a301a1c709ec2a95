#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod admin;
pub mod catalog;
pub mod events;
pub mod subscriptions;
