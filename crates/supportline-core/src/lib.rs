//! Business logic and repository trait definitions for Supportline.
//!
//! This crate defines the "ports" (repository and provider traits) that the
//! infrastructure layer implements. It depends only on `supportline-types`
//! -- never on `supportline-infra` or any database/IO crate.

pub mod chat;
pub mod feedback;
pub mod llm;
pub mod prompt;
