//! Generation gateway port
//!
//! Defines the interface for the external text-generation capability.
//! The engine treats it as a black box: a structured prompt goes in,
//! free text or a hard failure comes out. Implementations (adapters)
//! live in the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during generation gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication rejected by provider")]
    AuthenticationFailed,

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Provider error {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Timeout")]
    Timeout,

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Bounds for one generation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationParams {
    /// Tuning for agent dialogue turns
    pub fn dialogue() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 300,
        }
    }

    /// Tuning for the final summary
    pub fn summary() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

/// A structured prompt for the generation capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Role/persona framing
    pub system: String,
    /// The actual ask
    pub prompt: String,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(
        system: impl Into<String>,
        prompt: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            params,
        }
    }
}

/// Gateway to the external text-generation capability
///
/// Every call is independent; the engine does no pooling, retrying or
/// rate limiting of its own. Any non-success result from the provider
/// is a hard failure for that call, never a partial success.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError>;
}
