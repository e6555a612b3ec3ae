use async_trait::async_trait;
use janitor_core::board::{Board, BoardResult};
use janitor_core::model::{Action, ActionFilter, BoardList, Card};
use janitor_core::BoardError;
use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::wire::{ActionJson, CardJson, ListJson};

/// Maximum page size Trello allows for action queries.
const ACTION_LIMIT: &str = "1000";

const CARD_FIELDS: &str = "id,name,desc,pos,dateLastActivity,idList";

/// Trello REST client authenticated with an API key and token.
///
/// Cheap to share: wrap in an `Arc` and hand to every task.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    http: reqwest::Client,
    base_url: String,
    key: String,
    token: String,
}

impl TrelloClient {
    pub fn new(
        base_url: impl Into<String>,
        key: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("trello-janitor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.into(),
            token: token.into(),
        })
    }

    /// Send a request and return the response body of a 2xx reply.
    ///
    /// `path` is used verbatim in error messages; credentials are only ever
    /// added as query parameters and never appear there.
    async fn send(&self, method: Method, path: &str, query: &[(&str, &str)]) -> BoardResult<String> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::trace!(%method, path, "trello request");
        let resp = self
            .http
            .request(method, &url)
            .query(&[("key", self.key.as_str()), ("token", self.token.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| BoardError::Transport(format!("{path}: {}", e.without_url())))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| BoardError::Transport(format!("{path}: {}", e.without_url())))?;
        if !status.is_success() {
            return Err(BoardError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> BoardResult<T> {
        let body = self.send(Method::GET, path, query).await?;
        serde_json::from_str(&body).map_err(|e| BoardError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Board for TrelloClient {
    async fn get_list(&self, list_id: &str) -> BoardResult<BoardList> {
        let list: ListJson = self
            .get_json(&format!("lists/{list_id}"), &[("fields", "id,name")])
            .await?;
        Ok(list.into())
    }

    async fn list_cards(&self, list_id: &str) -> BoardResult<Vec<Card>> {
        let cards: Vec<CardJson> = self
            .get_json(&format!("lists/{list_id}/cards"), &[("fields", CARD_FIELDS)])
            .await?;
        Ok(cards.into_iter().map(Card::from).collect())
    }

    async fn card_actions(&self, card_id: &str) -> BoardResult<Vec<Action>> {
        let actions: Vec<ActionJson> = self
            .get_json(
                &format!("cards/{card_id}/actions"),
                &[("filter", "all"), ("limit", ACTION_LIMIT)],
            )
            .await?;
        Ok(actions.into_iter().map(Action::from).collect())
    }

    async fn list_actions(
        &self,
        list_id: &str,
        filter: &ActionFilter,
    ) -> BoardResult<Vec<Action>> {
        let types = filter.action_types.join(",");
        let actions: Vec<ActionJson> = self
            .get_json(
                &format!("lists/{list_id}/actions"),
                &[("filter", types.as_str()), ("limit", ACTION_LIMIT)],
            )
            .await?;
        Ok(actions
            .into_iter()
            .map(Action::from)
            .filter(|a| a.belongs_to(&filter.card_id))
            .collect())
    }

    async fn archive_card(&self, card_id: &str) -> BoardResult<()> {
        self.send(Method::PUT, &format!("cards/{card_id}"), &[("closed", "true")])
            .await
            .map(|_| ())
    }

    async fn delete_card(&self, card_id: &str) -> BoardResult<()> {
        self.send(Method::DELETE, &format!("cards/{card_id}"), &[])
            .await
            .map(|_| ())
    }

    async fn set_card_position(&self, card_id: &str, pos: f64) -> BoardResult<()> {
        let pos = pos.to_string();
        self.send(Method::PUT, &format!("cards/{card_id}"), &[("pos", pos.as_str())])
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use janitor_core::model::ActionKind;
    use mockito::Matcher;

    fn auth() -> Vec<Matcher> {
        vec![
            Matcher::UrlEncoded("key".into(), "test-key".into()),
            Matcher::UrlEncoded("token".into(), "test-token".into()),
        ]
    }

    fn with_auth(extra: Vec<Matcher>) -> Matcher {
        let mut all = auth();
        all.extend(extra);
        Matcher::AllOf(all)
    }

    fn client(server: &mockito::ServerGuard) -> TrelloClient {
        TrelloClient::new(server.url(), "test-key", "test-token").unwrap()
    }

    #[test]
    fn rejects_base_url_without_scheme() {
        let err = TrelloClient::new("api.trello.com/1", "k", "t").unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl(_)));
    }

    #[tokio::test]
    async fn fetches_list_and_cards() {
        let mut server = mockito::Server::new_async().await;
        let list_mock = server
            .mock("GET", "/lists/l1")
            .match_query(with_auth(vec![]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "l1", "name": "Inbox"}"#)
            .create_async()
            .await;
        let cards_mock = server
            .mock("GET", "/lists/l1/cards")
            .match_query(with_auth(vec![Matcher::UrlEncoded(
                "fields".into(),
                CARD_FIELDS.into(),
            )]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": "c1", "name": "First", "desc": "about 0.9", "pos": 16384,
                     "dateLastActivity": "2024-03-01T10:00:00.000Z", "idList": "l1"},
                    {"id": "c2", "name": "Second", "desc": "", "pos": 32768.5,
                     "dateLastActivity": null, "idList": "l1"}
                ]"#,
            )
            .create_async()
            .await;

        let client = client(&server);
        let list = client.get_list("l1").await.unwrap();
        let cards = client.list_cards("l1").await.unwrap();

        assert_eq!(list.name, "Inbox");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].desc, "about 0.9");
        assert!(cards[0].date_last_activity.is_some());
        assert_eq!(cards[1].pos, 32768.5);
        list_mock.assert_async().await;
        cards_mock.assert_async().await;
    }

    #[tokio::test]
    async fn card_actions_are_classified() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/cards/c1/actions")
            .match_query(with_auth(vec![
                Matcher::UrlEncoded("filter".into(), "all".into()),
                Matcher::UrlEncoded("limit".into(), "1000".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"[
                    {"id": "a1", "type": "commentCard", "date": "2024-03-02T00:00:00Z",
                     "data": {"card": {"id": "c1"}, "text": "hi"}},
                    {"id": "a2", "type": "updateCard", "date": "2024-03-03T00:00:00Z",
                     "data": {"card": {"id": "c1"}, "old": {"desc": ""}}}
                ]"#,
            )
            .create_async()
            .await;

        let actions = client(&server).card_actions("c1").await.unwrap();
        assert_eq!(actions[0].kind, ActionKind::Comment);
        assert_eq!(actions[1].kind, ActionKind::Other("updateCard".into()));
    }

    #[tokio::test]
    async fn list_actions_are_narrowed_to_the_card() {
        let mut server = mockito::Server::new_async().await;
        let filter = ActionFilter::creation_of("c1");
        let _mock = server
            .mock("GET", "/lists/l1/actions")
            .match_query(with_auth(vec![Matcher::UrlEncoded(
                "filter".into(),
                filter.action_types.join(","),
            )]))
            .with_status(200)
            .with_body(
                r#"[
                    {"id": "a1", "type": "createCard", "date": "2024-03-02T00:00:00Z",
                     "data": {"card": {"id": "c9"}}},
                    {"id": "a2", "type": "createCard", "date": "2024-03-01T00:00:00Z",
                     "data": {"card": {"id": "c1"}}}
                ]"#,
            )
            .create_async()
            .await;

        let actions = client(&server).list_actions("l1", &filter).await.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, "a2");
        assert_eq!(actions[0].kind, ActionKind::Creation);
    }

    #[tokio::test]
    async fn mutations_hit_card_endpoints() {
        let mut server = mockito::Server::new_async().await;
        let archive = server
            .mock("PUT", "/cards/c1")
            .match_query(with_auth(vec![Matcher::UrlEncoded(
                "closed".into(),
                "true".into(),
            )]))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;
        let reposition = server
            .mock("PUT", "/cards/c2")
            .match_query(with_auth(vec![Matcher::UrlEncoded(
                "pos".into(),
                "1266000".into(),
            )]))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/cards/c3")
            .match_query(with_auth(vec![]))
            .with_status(200)
            .with_body(r#"{"limits": {}}"#)
            .create_async()
            .await;

        let client = client(&server);
        client.archive_card("c1").await.unwrap();
        client.set_card_position("c2", 1_266_000.0).await.unwrap();
        client.delete_card("c3").await.unwrap();

        archive.assert_async().await;
        reposition.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_reported_without_credentials() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/lists/nope")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("invalid token")
            .create_async()
            .await;

        let err = client(&server).get_list("nope").await.unwrap_err();
        match &err {
            BoardError::Status {
                endpoint,
                status,
                body,
            } => {
                assert_eq!(endpoint, "lists/nope");
                assert_eq!(*status, 401);
                assert_eq!(body, "invalid token");
            }
            other => panic!("expected Status, got {other:?}"),
        }
        assert!(!err.to_string().contains("test-token"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/lists/l1/cards")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client(&server).list_cards("l1").await.unwrap_err();
        assert!(matches!(err, BoardError::Decode { .. }));
    }
}
