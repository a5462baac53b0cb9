//! HTTP request handlers for the REST API.

pub mod chat;
pub mod configurations;
pub mod dashboard;
pub mod session;
