//! `janitor-core` — the staleness and reordering engine behind
//! `trello-janitor`.
//!
//! ```text
//! JanitorConfig ──plan()──▶ [Group: archive | delete | reorder]
//!                                 │
//!                                 ▼
//! Orchestrator ── list task per list ── card task per card
//!                                 │
//!           ┌─────────────────────┴────────────────────┐
//!           ▼                                          ▼
//!   staleness::evaluate_staleness             similarity::reorder_card
//!   (activity::resolve_last_activity)
//!           │                                          │
//!           └──────────────▶ dyn Board ◀───────────────┘
//! ```
//!
//! The board is an injected capability ([`board::Board`]); nothing in this
//! crate talks HTTP.

pub mod activity;
pub mod board;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod orchestrator;
pub mod policy;
pub mod report;
pub mod similarity;
pub mod staleness;

pub use board::{Board, BoardResult};
pub use config::{JanitorConfig, RawConfig};
pub use error::{BoardError, JanitorError, Result};
pub use orchestrator::{plan, Group, Orchestrator};
pub use report::{CardOutcome, Pass, RunReport};
