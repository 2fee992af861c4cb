//! Prompt building and reply parsing
//!
//! Deterministic payloads out, forgiving parsing back in.

pub mod reply;
pub mod template;

pub use reply::{AgentReply, parse_agent_reply};
pub use template::PromptTemplate;
