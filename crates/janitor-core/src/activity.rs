use chrono::{DateTime, Utc};

use crate::board::Board;
use crate::error::{JanitorError, Result};
use crate::model::{Action, ActionFilter, Card};

/// Where the resolved activity timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivitySource {
    CardActions,
    ListCreation,
    ReportedLastActivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedActivity {
    pub at: DateTime<Utc>,
    pub source: ActivitySource,
}

/// Latest qualifying action on `card_id`, ignoring actions attributed to
/// other cards and kinds that do not reset the staleness clock.
pub fn latest_qualifying(card_id: &str, actions: &[Action]) -> Option<DateTime<Utc>> {
    actions
        .iter()
        .filter(|a| a.belongs_to(card_id) && a.kind.is_qualifying())
        .map(|a| a.date)
        .max()
}

/// Resolve the most recent meaningful activity on `card`.
///
/// The card's own history is consulted first. When it is empty, the
/// containing list is asked for the card's creation action, since Trello
/// sometimes attributes creation to the list only. When neither yields a
/// qualifying action, the board-reported last activity is used.
pub async fn resolve_last_activity(board: &dyn Board, card: &Card) -> Result<ResolvedActivity> {
    let mut actions = board
        .card_actions(&card.id)
        .await
        .map_err(|e| JanitorError::fetch(format!("actions of card '{}'", card.name), e))?;
    let mut source = ActivitySource::CardActions;

    if actions.is_empty() {
        actions = board
            .list_actions(&card.list_id, &ActionFilter::creation_of(&card.id))
            .await
            .map_err(|e| {
                JanitorError::fetch(
                    format!("creation action of card '{}' from list {}", card.name, card.list_id),
                    e,
                )
            })?;
        source = ActivitySource::ListCreation;
    }

    let resolved = match latest_qualifying(&card.id, &actions) {
        Some(at) => ResolvedActivity { at, source },
        None => ResolvedActivity {
            at: card.reported_activity(),
            source: ActivitySource::ReportedLastActivity,
        },
    };
    tracing::debug!(
        card = %card.name,
        at = %resolved.at,
        source = ?resolved.source,
        "resolved last activity"
    );
    Ok(resolved)
}
