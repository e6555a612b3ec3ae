use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::resolve_last_activity;
use crate::board::Board;
use crate::error::Result;
use crate::model::Card;
use crate::policy::MutationPolicy;
use crate::report::{CardOutcome, Pass};

/// What happens to a stale card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleAction {
    Archive,
    Delete,
}

impl StaleAction {
    pub fn pass(self) -> Pass {
        match self {
            StaleAction::Archive => Pass::Archive,
            StaleAction::Delete => Pass::Delete,
        }
    }
}

/// Strictly older than `threshold`; an age equal to it is not stale.
pub fn is_stale(last_activity: DateTime<Utc>, now: DateTime<Utc>, threshold: TimeDelta) -> bool {
    now - last_activity > threshold
}

fn hours(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 3_600_000.0
}

/// Resolve the card's activity clock and apply `action` when it is stale.
pub async fn evaluate_staleness(
    board: &dyn Board,
    card: &Card,
    action: StaleAction,
    now: DateTime<Utc>,
    threshold: TimeDelta,
    policy: MutationPolicy,
) -> Result<CardOutcome> {
    let resolved = resolve_last_activity(board, card).await?;
    let elapsed = now - resolved.at;
    let idle_hours = hours(elapsed);

    if !is_stale(resolved.at, now, threshold) {
        tracing::debug!(card = %card.name, idle_hours, "card is fresh");
        return Ok(CardOutcome::Fresh { idle_hours });
    }

    let pass = action.pass();
    tracing::info!(card = %card.name, idle_hours, %pass, "card is stale");
    let planned = match action {
        StaleAction::Archive => CardOutcome::Archived { idle_hours },
        StaleAction::Delete => CardOutcome::Deleted { idle_hours },
    };
    if policy.dry_run {
        return Ok(CardOutcome::WouldMutate {
            pass,
            planned: Box::new(planned),
        });
    }

    let result = match action {
        StaleAction::Archive => board.archive_card(&card.id).await,
        StaleAction::Delete => board.delete_card(&card.id).await,
    };
    policy.settle(pass, card, result, planned)
}
