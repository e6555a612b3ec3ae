use serde::Serialize;
use std::fmt;

/// One of the three sequential processing groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Archive,
    Delete,
    Reorder,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Archive => write!(f, "archive"),
            Pass::Delete => write!(f, "delete"),
            Pass::Reorder => write!(f, "reorder"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CardOutcome {
    /// Recent enough to keep.
    Fresh { idle_hours: f64 },
    Archived { idle_hours: f64 },
    Deleted { idle_hours: f64 },
    Repositioned { from: f64, to: f64 },
    /// Position already matches the similarity score.
    InPlace,
    /// No similarity score in the description.
    NoScore,
    /// Dry run: the mutation that would have been sent and the outcome it
    /// would have produced.
    WouldMutate { pass: Pass, planned: Box<CardOutcome> },
    /// Mutation failed and was not escalated.
    Failed { error: String },
}

impl CardOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CardOutcome::Fresh { .. } => "fresh",
            CardOutcome::Archived { .. } => "archived",
            CardOutcome::Deleted { .. } => "deleted",
            CardOutcome::Repositioned { .. } => "repositioned",
            CardOutcome::InPlace => "in_place",
            CardOutcome::NoScore => "no_score",
            CardOutcome::WouldMutate { .. } => "would_mutate",
            CardOutcome::Failed { .. } => "failed",
        }
    }

    /// `true` when a mutation was sent and accepted.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            CardOutcome::Archived { .. } | CardOutcome::Deleted { .. } | CardOutcome::Repositioned { .. }
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CardReport {
    pub card_id: String,
    pub card_name: String,
    #[serde(flatten)]
    pub outcome: CardOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListReport {
    pub list_id: String,
    pub list_name: String,
    pub cards: Vec<CardReport>,
}

impl ListReport {
    pub fn count(&self, label: &str) -> usize {
        self.cards.iter().filter(|c| c.outcome.label() == label).count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub pass: Pass,
    pub lists: Vec<ListReport>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub groups: Vec<GroupReport>,
}

impl RunReport {
    pub fn cards(&self) -> impl Iterator<Item = (Pass, &CardReport)> {
        self.groups
            .iter()
            .flat_map(|g| g.lists.iter().flat_map(move |l| l.cards.iter().map(move |c| (g.pass, c))))
    }

    pub fn outcome_of(&self, pass: Pass, card_id: &str) -> Option<&CardOutcome> {
        self.cards()
            .find(|(p, c)| *p == pass && c.card_id == card_id)
            .map(|(_, c)| &c.outcome)
    }

    pub fn mutation_count(&self) -> usize {
        self.cards().filter(|(_, c)| c.outcome.is_mutation()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.cards()
            .filter(|(_, c)| matches!(c.outcome, CardOutcome::Failed { .. }))
            .count()
    }
}
