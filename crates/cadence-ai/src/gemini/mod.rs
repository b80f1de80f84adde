//! Google Gemini adapter.
//!
//! Implements [`ModelInvoker`](crate::ModelInvoker) over the Generative
//! Language `generateContent` endpoint with function calling.

mod api;
mod client;
mod config;


pub use client::GeminiClient;
pub use config::GeminiConfig;
