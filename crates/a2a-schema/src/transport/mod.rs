//! Transport layer — wire-level protocol bindings for A2A.
//!
//! - JSON-RPC 2.0 envelopes (primary)
//! - Streamed results, as delivered over SSE

pub mod jsonrpc;
pub mod stream;
