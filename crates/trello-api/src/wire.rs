//! JSON shapes returned by the Trello REST API, and their conversion into
//! janitor-core model types.

use chrono::{DateTime, Utc};
use janitor_core::model::{Action, ActionKind, BoardList, Card};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListJson {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardJson {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub pos: f64,
    #[serde(default)]
    pub date_last_activity: Option<DateTime<Utc>>,
    pub id_list: String,
}

#[derive(Debug, Deserialize)]
pub struct ActionJson {
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub data: ActionData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    #[serde(default)]
    pub card: Option<IdRef>,
    #[serde(default)]
    pub list_after: Option<IdRef>,
}

#[derive(Debug, Deserialize)]
pub struct IdRef {
    pub id: String,
}

impl From<ListJson> for BoardList {
    fn from(l: ListJson) -> Self {
        BoardList {
            id: l.id,
            name: l.name,
        }
    }
}

impl From<CardJson> for Card {
    fn from(c: CardJson) -> Self {
        Card {
            id: c.id,
            name: c.name,
            desc: c.desc,
            pos: c.pos,
            date_last_activity: c.date_last_activity,
            list_id: c.id_list,
        }
    }
}

impl From<ActionJson> for Action {
    fn from(a: ActionJson) -> Self {
        Action {
            kind: ActionKind::classify(&a.action_type, a.data.list_after.is_some()),
            id: a.id,
            date: a.date,
            card_id: a.data.card.map(|c| c.id),
        }
    }
}
