//! vibeprompt: compose project and sub-agent context into runnable prompts,
//! optionally compiled through an LLM API.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::*;
