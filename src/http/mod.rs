//! HTTP/1.1 client protocol engine.
//!
//! This module implements the client side of a single signed exchange: one
//! request head, an optional body of declared length, and one response.
//!
//! # Architecture
//!
//! - **`connection`**: the connection state machine owning the transport
//! - **`buffer`**: fixed-capacity receive buffer refilled from the transport
//! - **`parser`**: incremental response-head parser working on that buffer
//! - **`request`**: signed request head construction and serialization
//! - **`response`**: parsed response head and status code mapping
//!
//! # Exchange
//!
//! ```text
//!   open ──▶ send signed head ──┬─ GET ─▶ parse response head ─▶ read body…
//!                               └─ PUT ─▶ write body… ─▶ parse response head
//! ```
//!
//! Response heads may arrive in arbitrarily small fragments, including a CR
//! and its LF landing in different reads. Body bytes that arrive together
//! with the head are kept in the buffer and handed out first by `read`.

pub mod buffer;
pub mod connection;
pub mod parser;
pub mod request;
pub mod response;

pub use connection::{Connection, Mode, Target};
