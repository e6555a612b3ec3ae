//! Ordering cards by the similarity score at the end of their description.
//!
//! A score `s` in `[0, 1]` maps to position `(1 - s) * 1e7`, so the most
//! similar cards sort first. A card is only moved when its current position
//! has drifted more than [`POSITION_TOLERANCE`] (in score units) from the one
//! its score implies.

use crate::board::Board;
use crate::error::Result;
use crate::model::Card;
use crate::policy::MutationPolicy;
use crate::report::{CardOutcome, Pass};

/// Scale between a score and the board's position axis.
pub const POSITION_SCALE: f64 = 1e7;

pub const POSITION_TOLERANCE: f64 = 1e-2;

/// Parse the token after the last space of `desc` as a score.
pub fn extract_similarity(desc: &str) -> Option<f64> {
    let (_, token) = desc.rsplit_once(' ')?;
    token.parse::<f64>().ok().filter(|s| s.is_finite())
}

pub fn target_position(similarity: f64) -> f64 {
    (1.0 - similarity) * POSITION_SCALE
}

/// Signed difference between the score implied by `pos` and `similarity`.
pub fn position_drift(pos: f64, similarity: f64) -> f64 {
    1.0 - pos / POSITION_SCALE - similarity
}

pub fn needs_reposition(pos: f64, similarity: f64) -> bool {
    position_drift(pos, similarity).abs() > POSITION_TOLERANCE
}

/// Move `card` to the position its similarity score implies, if needed.
pub async fn reorder_card(
    board: &dyn Board,
    card: &Card,
    policy: MutationPolicy,
) -> Result<CardOutcome> {
    let Some(similarity) = extract_similarity(&card.desc) else {
        tracing::info!(card = %card.name, "no similarity score in description, skipping");
        return Ok(CardOutcome::NoScore);
    };

    if !needs_reposition(card.pos, similarity) {
        tracing::debug!(card = %card.name, similarity, pos = card.pos, "position already in place");
        return Ok(CardOutcome::InPlace);
    }

    let target = target_position(similarity);
    tracing::info!(
        card = %card.name,
        similarity,
        from = card.pos,
        to = target,
        "repositioning card"
    );
    let planned = CardOutcome::Repositioned {
        from: card.pos,
        to: target,
    };
    if policy.dry_run {
        return Ok(CardOutcome::WouldMutate {
            pass: Pass::Reorder,
            planned: Box::new(planned),
        });
    }

    let result = board.set_card_position(&card.id, target).await;
    policy.settle(Pass::Reorder, card, result, planned)
}
