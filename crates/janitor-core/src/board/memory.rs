//! In-memory [`Board`] used by the engine's unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::{Board, BoardResult};
use crate::error::BoardError;
use crate::model::{Action, ActionFilter, BoardList, Card};

/// A mutation recorded by [`MemoryBoard`].
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Archive(String),
    Delete(String),
    SetPosition(String, f64),
}

#[derive(Default)]
struct MemoryState {
    lists: HashMap<String, BoardList>,
    cards: Vec<Card>,
    card_actions: HashMap<String, Vec<Action>>,
    list_actions: HashMap<String, Vec<Action>>,
    failing_fetches: HashSet<String>,
    failing_mutations: HashSet<String>,
    mutations: Vec<Mutation>,
}

/// In-memory board. Mutations are applied to the stored cards and recorded
/// in order so callers can assert on them.
#[derive(Default)]
pub struct MemoryBoard {
    state: Mutex<MemoryState>,
}

impl MemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_list(&self, id: &str, name: &str) {
        self.lock().lists.insert(
            id.to_string(),
            BoardList {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
    }

    pub fn add_card(&self, card: Card) {
        self.lock().cards.push(card);
    }

    pub fn add_card_action(&self, card_id: &str, action: Action) {
        self.lock()
            .card_actions
            .entry(card_id.to_string())
            .or_default()
            .push(action);
    }

    pub fn add_list_action(&self, list_id: &str, action: Action) {
        self.lock()
            .list_actions
            .entry(list_id.to_string())
            .or_default()
            .push(action);
    }

    /// Any read touching `id` (list or card) fails.
    pub fn fail_fetch(&self, id: &str) {
        self.lock().failing_fetches.insert(id.to_string());
    }

    /// Any mutation of card `id` fails.
    pub fn fail_mutation(&self, id: &str) {
        self.lock().failing_mutations.insert(id.to_string());
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.lock().mutations.clone()
    }

    pub fn card(&self, id: &str) -> Option<Card> {
        self.lock().cards.iter().find(|c| c.id == id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another test thread panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_fetch(state: &MemoryState, id: &str) -> BoardResult<()> {
        if state.failing_fetches.contains(id) {
            return Err(BoardError::Transport(format!("injected fetch failure for {id}")));
        }
        Ok(())
    }

    fn mutate(&self, card_id: &str, mutation: Mutation) -> BoardResult<()> {
        let mut state = self.lock();
        if state.failing_mutations.contains(card_id) {
            return Err(BoardError::Status {
                endpoint: format!("cards/{card_id}"),
                status: 500,
                body: "injected mutation failure".into(),
            });
        }
        let Some(idx) = state.cards.iter().position(|c| c.id == card_id) else {
            return Err(BoardError::NotFound(format!("card {card_id}")));
        };
        match &mutation {
            Mutation::Archive(_) | Mutation::Delete(_) => {
                state.cards.remove(idx);
            }
            Mutation::SetPosition(_, pos) => state.cards[idx].pos = *pos,
        }
        state.mutations.push(mutation);
        Ok(())
    }
}

#[async_trait]
impl Board for MemoryBoard {
    async fn get_list(&self, list_id: &str) -> BoardResult<BoardList> {
        let state = self.lock();
        Self::check_fetch(&state, list_id)?;
        state
            .lists
            .get(list_id)
            .cloned()
            .ok_or_else(|| BoardError::NotFound(format!("list {list_id}")))
    }

    async fn list_cards(&self, list_id: &str) -> BoardResult<Vec<Card>> {
        let state = self.lock();
        Self::check_fetch(&state, list_id)?;
        Ok(state
            .cards
            .iter()
            .filter(|c| c.list_id == list_id)
            .cloned()
            .collect())
    }

    async fn card_actions(&self, card_id: &str) -> BoardResult<Vec<Action>> {
        let state = self.lock();
        Self::check_fetch(&state, card_id)?;
        Ok(state.card_actions.get(card_id).cloned().unwrap_or_default())
    }

    async fn list_actions(
        &self,
        list_id: &str,
        filter: &ActionFilter,
    ) -> BoardResult<Vec<Action>> {
        let state = self.lock();
        Self::check_fetch(&state, list_id)?;
        // Filtering by kind only; the card narrowing is left to the caller
        // like the real API, which may return other cards' actions.
        Ok(state
            .list_actions
            .get(list_id)
            .map(|actions| {
                actions
                    .iter()
                    .filter(|a| {
                        filter
                            .action_types
                            .iter()
                            .any(|t| crate::model::ActionKind::classify(t, false) == a.kind)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn archive_card(&self, card_id: &str) -> BoardResult<()> {
        self.mutate(card_id, Mutation::Archive(card_id.to_string()))
    }

    async fn delete_card(&self, card_id: &str) -> BoardResult<()> {
        self.mutate(card_id, Mutation::Delete(card_id.to_string()))
    }

    async fn set_card_position(&self, card_id: &str, pos: f64) -> BoardResult<()> {
        self.mutate(card_id, Mutation::SetPosition(card_id.to_string(), pos))
    }
}
