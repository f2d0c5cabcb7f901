//! Byte-stream plumbing.
//!
//! [`StreamAdapter`] turns a duplex connection into two suspending calls,
//! `read()` and `write()`, with end-of-stream and failure latched so that the
//! HTTP layer above never has to reason about the transport twice.

pub mod adapter;
pub mod error;

pub use adapter::{StreamAdapter, StreamState, Transport};
pub use error::TransportError;
