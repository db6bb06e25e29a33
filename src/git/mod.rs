//! Git smart-HTTP reference advertisement handling
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌─────────────┐
//! │    Fetch    │────▶│ Advertisement │────▶│   Rewrite   │
//! │ (upstream)  │     │   (records)   │     │  (select)   │
//! └─────────────┘     └───────────────┘     └─────────────┘
//!                            │                     │
//!                            ▼                     ▼
//!                     ┌─────────────┐       ┌──────────────┐
//!                     │   PktLine   │       │ Capabilities │
//!                     │  (framing)  │       │   (symref)   │
//!                     └─────────────┘       └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`pktline`]: Length-prefixed frame cursor and encoder
//! - [`advertisement`]: Reference records parsed from frames
//! - [`capabilities`]: Capability list rules for the rewritten `HEAD` line
//! - [`rewrite`]: Version selection and advertisement rewriting
//! - [`fetch`]: Upstream fetcher trait and its HTTP implementation

pub mod advertisement;
pub mod capabilities;
pub mod fetch;
pub mod pktline;
pub mod rewrite;

pub use fetch::{FetchError, HttpFetcher, RefsFetcher};
pub use rewrite::{RefPolicy, Rewrite, RewriteError, rewrite};
