use crate::board::Board;
use crate::error::{JanitorError, Result};
use crate::model::{BoardList, Card};

/// Resolve `list_id` to the list and its cards. Any failure is fatal to the
/// run: a list cannot be processed partially.
pub async fn fetch_list(board: &dyn Board, list_id: &str) -> Result<(BoardList, Vec<Card>)> {
    tracing::info!(list = list_id, "querying cards of list");
    let list = board
        .get_list(list_id)
        .await
        .map_err(|e| JanitorError::fetch(format!("list {list_id}"), e))?;
    let cards = board
        .list_cards(list_id)
        .await
        .map_err(|e| JanitorError::fetch(format!("cards of list '{}'", list.name), e))?;
    tracing::info!(list = %list.name, cards = cards.len(), "list fetched");
    Ok((list, cards))
}
