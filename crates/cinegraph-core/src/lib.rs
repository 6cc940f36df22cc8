//! Core types, the storage trait, and the social-graph and ranking logic for
//! Cinegraph.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::FilmStore`]; the HTTP layer drives a
//! [`service::Service`] built over one of them.

// We intentionally use native `async fn` in trait impls (stabilised in Rust
// 1.75). Suppress the advisory lint about `Send` bounds on the returned
// futures.
#![allow(async_fn_in_trait)]

pub mod engagement;
pub mod error;
pub mod event;
pub mod feed;
pub mod film;
pub mod id;
pub mod memory;
pub mod ranking;
pub mod recommend;
pub mod review;
pub mod service;
pub mod social;
pub mod store;
pub mod user;

pub use error::{Error, ErrorKind, Result};
pub use event::Outcome;
pub use memory::MemoryStore;
pub use service::Service;
