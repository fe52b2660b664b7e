//! Rewrite/generation gateway: the opaque text-transform service used to
//! paraphrase rendered manuscripts and to draft one-off custom manuscripts.
//!
//! The platform programs against [`RewriteGateway`]; the production adapter
//! talks to the Anthropic Messages API.

pub mod anthropic;
pub mod gateway;
pub mod prompt;

pub use anthropic::{AnthropicConfig, AnthropicGateway};
pub use gateway::{ClientBrief, Draft, GenerateRequest, RewriteError, RewriteGateway, RewriteRequest};
