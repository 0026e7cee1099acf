//! Travel assistant chat
//!
//! - history: bounded per-session conversation memory
//! - sessions: capped store of histories keyed by session id
//! - format: markdown-like model output to the HTML the chat panel renders
//! - assistant: system prompt, language model seam and the reply flow

pub mod assistant;
pub mod format;
pub mod history;
pub mod sessions;

pub use assistant::{Assistant, LanguageModel, OpenAiChat};
pub use format::to_html;
pub use history::ConversationHistory;
pub use sessions::SessionStore;
