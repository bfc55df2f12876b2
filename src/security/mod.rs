//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → gate.rs (log cross-origin, tag API responses)
//!     → handler
//!         → client_ip.rs (resolve client key from proxy headers)
//!         → rate_limit.rs (sliding-log check per client key)
//! ```
//!
//! # Design Decisions
//! - Availability first: the gate observes, it does not reject
//! - Rate limiting is opt-in per handler with per-call limits
//! - Limiter state is injected, never global

pub mod client_ip;
pub mod gate;
pub mod rate_limit;

pub use gate::{security_gate, GateState};
pub use rate_limit::{Clock, ManualClock, SlidingWindowLimiter, SystemClock};
