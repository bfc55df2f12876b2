//! Knowledge-base assistant.
//!
//! # Data Flow
//! ```text
//! GET /api/assistant?q=...
//!     → handler.rs (validate query, CORS)
//!     → store.rs (full-text search, top N, store ranking)
//!     → answer.rs (ordered rules pick the answer text)
//!     → { query, answer, sources }
//! ```

pub mod answer;
pub mod handler;
pub mod store;

pub use answer::{synthesize, Source, SynthesizedAnswer, FALLBACK_ANSWER};
pub use handler::{AssistantError, AssistantState};
pub use store::{ContentStore, KnowledgeItem, PostgrestStore, StoreError};
