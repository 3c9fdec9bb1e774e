//! Core types and the entity-resolution engine for MathSwitch.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement the traits in [`store`]; the pure resolution
//! pieces ([`union_find`], [`link`], [`component`], [`materialize`]) never
//! touch I/O themselves.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod component;
pub mod concept;
pub mod error;
pub mod item;
pub mod link;
pub mod materialize;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod store;
pub mod union_find;

pub use error::{Error, Result};
