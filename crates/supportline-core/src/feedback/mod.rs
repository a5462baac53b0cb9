//! Feedback workflow: rating upserts and dashboard aggregation.

pub mod repository;
pub mod service;
