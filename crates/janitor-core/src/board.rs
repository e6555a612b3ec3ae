//! The capability surface the janitor consumes from a board.
//!
//! Everything the engine does to Trello goes through [`Board`]. The HTTP
//! implementation lives in the `trello-api` crate; an in-memory board backs
//! the unit tests.

use async_trait::async_trait;

use crate::error::BoardError;
use crate::model::{Action, ActionFilter, BoardList, Card};

pub type BoardResult<T> = std::result::Result<T, BoardError>;

#[async_trait]
pub trait Board: Send + Sync {
    async fn get_list(&self, list_id: &str) -> BoardResult<BoardList>;

    async fn list_cards(&self, list_id: &str) -> BoardResult<Vec<Card>>;

    /// The card's own action history.
    async fn card_actions(&self, card_id: &str) -> BoardResult<Vec<Action>>;

    /// A list's action history narrowed by `filter`.
    async fn list_actions(&self, list_id: &str, filter: &ActionFilter)
        -> BoardResult<Vec<Action>>;

    async fn archive_card(&self, card_id: &str) -> BoardResult<()>;

    async fn delete_card(&self, card_id: &str) -> BoardResult<()>;

    async fn set_card_position(&self, card_id: &str, pos: f64) -> BoardResult<()>;
}

#[cfg(test)]
mod memory;

#[cfg(test)]
pub use memory::{MemoryBoard, Mutation};
