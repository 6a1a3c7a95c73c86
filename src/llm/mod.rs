//! LLM integration module.
//!
//! Provides an OpenAI-compatible client for LLM API calls, the
//! [`CompletionModel`] seam it implements, and the prompts we send.

mod client;
mod prompts;

pub use client::{
    Completion, CompletionModel, LlmClient, LlmResponse, MODEL, Message, Role, TEMPERATURE, TokenUsage,
};
pub use prompts::Prompts;
