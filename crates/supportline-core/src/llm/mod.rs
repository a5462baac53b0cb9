//! LLM provider abstraction.
//!
//! [`provider::LlmProvider`] is the trait concrete clients implement,
//! [`box_provider::BoxLlmProvider`] erases it for runtime selection, and
//! [`registry::ProviderRegistry`] indexes providers by name.

pub mod box_provider;
pub mod provider;
pub mod registry;
