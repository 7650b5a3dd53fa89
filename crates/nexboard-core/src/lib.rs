//! Core types, the authorization core, and the mutation orchestrators for the
//! NexBoard task tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::TrackerStore`]; transports call into the
//! orchestrators under [`service`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod board;
pub mod error;
pub mod guard;
pub mod ids;
pub mod membership;
pub mod resolve;
pub mod service;
pub mod status;
pub mod store;
pub mod task;
pub mod user;
pub mod workspace;

pub use error::{Error, ErrorKind, Result};
