use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Card / BoardList
// ---------------------------------------------------------------------------

/// The subset of a Trello card the janitor reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    /// Board ordering key. Not an index.
    pub pos: f64,
    /// Board-reported last activity; absent on some cards.
    #[serde(default)]
    pub date_last_activity: Option<DateTime<Utc>>,
    pub list_id: String,
}

impl Card {
    /// Last activity as reported by the board, or the epoch when absent.
    pub fn reported_activity(&self) -> DateTime<Utc> {
        self.date_last_activity.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// Action types that count as the creation of a card.
pub const CREATION_ACTION_TYPES: &[&str] = &[
    "createCard",
    "copyCard",
    "emailCard",
    "convertToCardFromCheckItem",
    "moveCardToBoard",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Creation,
    MembershipChange,
    ListChange,
    Comment,
    Other(String),
}

impl ActionKind {
    /// Classify a raw Trello action type. `moved_list` is true when the
    /// action data carries a destination list (`listAfter`).
    pub fn classify(action_type: &str, moved_list: bool) -> Self {
        if CREATION_ACTION_TYPES.contains(&action_type) {
            return ActionKind::Creation;
        }
        match action_type {
            "addMemberToCard" | "removeMemberFromCard" => ActionKind::MembershipChange,
            "commentCard" => ActionKind::Comment,
            _ if moved_list => ActionKind::ListChange,
            other => ActionKind::Other(other.to_string()),
        }
    }

    /// Whether this kind resets the staleness clock. Position and
    /// description edits never do.
    pub fn is_qualifying(&self) -> bool {
        !matches!(self, ActionKind::Other(_))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Creation => write!(f, "creation"),
            ActionKind::MembershipChange => write!(f, "membership_change"),
            ActionKind::ListChange => write!(f, "list_change"),
            ActionKind::Comment => write!(f, "comment"),
            ActionKind::Other(t) => write!(f, "{t}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub kind: ActionKind,
    pub date: DateTime<Utc>,
    /// Card the action pertains to, when the board reports one.
    pub card_id: Option<String>,
}

impl Action {
    pub fn belongs_to(&self, card_id: &str) -> bool {
        self.card_id.as_deref() == Some(card_id)
    }
}

/// Narrowing applied to a list's action history.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionFilter {
    /// Raw Trello action types to request.
    pub action_types: Vec<String>,
    /// Only actions on this card are kept.
    pub card_id: String,
}

impl ActionFilter {
    /// Creation actions for a single card.
    pub fn creation_of(card_id: &str) -> Self {
        Self {
            action_types: CREATION_ACTION_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            card_id: card_id.to_string(),
        }
    }
}
