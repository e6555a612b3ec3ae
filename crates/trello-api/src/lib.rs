//! `trello-api` — the Trello REST implementation of the janitor
//! [`Board`](janitor_core::Board) capability.
//!
//! Requests are authenticated with `key` and `token` query parameters
//! against a configurable base URL (`https://api.trello.com/1` in
//! production, a mock server in tests).

pub mod client;
pub mod error;
pub(crate) mod wire;

pub use client::TrelloClient;
pub use error::ClientError;
