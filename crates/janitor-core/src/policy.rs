use crate::error::{BoardError, JanitorError, Result};
use crate::model::Card;
use crate::report::{CardOutcome, Pass};

/// How mutations are sent and how their failures are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationPolicy {
    /// Mutation failures abort the run instead of being logged.
    pub strict: bool,
    /// Decide and report, but never send a mutation.
    pub dry_run: bool,
}

impl MutationPolicy {
    /// Turn the result of a sent mutation into the card's outcome.
    pub fn settle(
        &self,
        pass: Pass,
        card: &Card,
        result: std::result::Result<(), BoardError>,
        applied: CardOutcome,
    ) -> Result<CardOutcome> {
        match result {
            Ok(()) => Ok(applied),
            Err(source) if self.strict => Err(JanitorError::Mutation {
                pass,
                card: card.name.clone(),
                source,
            }),
            Err(e) => {
                tracing::warn!(card = %card.name, %pass, error = %e, "mutation failed");
                Ok(CardOutcome::Failed {
                    error: e.to_string(),
                })
            }
        }
    }
}
