//! Shared domain types for Supportline.
//!
//! This crate contains the core domain types used across the Supportline
//! backend: sessions, messages, feedback, AI configuration profiles, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod feedback;
pub mod llm;
pub mod user;
