//! HTTP client for the score board REST and event-stream endpoints.

use std::time::Duration;

use reqwest::{Client, Response};
use scoreboard_core::{AdminToken, Match, MatchId, MatchPatch, NewMatch, Role, ADMIN_TOKEN_HEADER};
use scoreboard_settings::ClientSettings;
use serde::Deserialize;
use tracing::instrument;

use crate::error::ClientError;
use crate::sse::SnapshotStream;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for one [`ScoreboardClient`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub role: Role,
    pub admin_token: Option<AdminToken>,
    pub reconnect_delay: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            role: Role::User,
            admin_token: None,
            reconnect_delay: Duration::from_secs(3),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_admin_token(mut self, token: Option<AdminToken>) -> Self {
        self.admin_token = token;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

impl From<&ClientSettings> for ClientConfig {
    fn from(settings: &ClientSettings) -> Self {
        Self::new(settings.server_url.clone())
            .with_role(settings.role)
            .with_admin_token(settings.admin_token())
            .with_reconnect_delay(Duration::from_secs(settings.reconnect_delay_secs))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to one score board server. Mutating calls are refused locally
/// unless the configured role is admin.
#[derive(Clone, Debug)]
pub struct ScoreboardClient {
    http: Client,
    config: ClientConfig,
}

impl ScoreboardClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    fn require_admin(&self) -> Result<(), ClientError> {
        if self.config.role.is_admin() {
            Ok(())
        } else {
            Err(ClientError::AdminRoleRequired)
        }
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.admin_token {
            Some(token) => req.header(ADMIN_TOKEN_HEADER, token.expose()),
            None => req,
        }
    }

    /// `GET /matches`
    pub async fn list(&self) -> Result<Vec<Match>, ClientError> {
        let resp = self.http.get(self.url("/matches")).send().await?;
        let resp = check(resp, "List").await?;
        Ok(resp.json().await?)
    }

    /// `POST /matches`
    #[instrument(skip(self, new))]
    pub async fn create(&self, new: &NewMatch) -> Result<Match, ClientError> {
        self.require_admin()?;
        let req = self.http.post(self.url("/matches")).json(new);
        let resp = check(self.authorized(req).send().await?, "Create").await?;
        Ok(resp.json().await?)
    }

    /// `PUT /matches/{id}`
    #[instrument(skip(self, patch), fields(match_id = %id))]
    pub async fn update(&self, id: MatchId, patch: &MatchPatch) -> Result<Match, ClientError> {
        self.require_admin()?;
        let req = self.http.put(self.url(&format!("/matches/{id}"))).json(patch);
        let resp = check(self.authorized(req).send().await?, "Update").await?;
        Ok(resp.json().await?)
    }

    /// `DELETE /matches/{id}`
    #[instrument(skip(self), fields(match_id = %id))]
    pub async fn delete(&self, id: MatchId) -> Result<(), ClientError> {
        self.require_admin()?;
        let req = self.http.delete(self.url(&format!("/matches/{id}")));
        let _ = check(self.authorized(req).send().await?, "Delete").await?;
        Ok(())
    }

    /// Open `GET /events`. The first item is the current list.
    pub async fn subscribe(&self) -> Result<SnapshotStream, ClientError> {
        let resp = self
            .http
            .get(self.url("/events"))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;
        let resp = check(resp, "Subscribe").await?;
        Ok(SnapshotStream::new(resp.bytes_stream()))
    }
}

/// Pass success through; otherwise turn the body's `error` field into
/// [`ClientError::Api`].
async fn check(resp: Response, op: &str) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let code = status.as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("{op} failed ({code})"));
    Err(ClientError::Api {
        status: code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use scoreboard_server::{start, ServerConfig, ServerHandle};

    use crate::sse::SnapshotEvent;

    async fn spawn_server(admin_token: Option<&str>) -> ServerHandle {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            admin_token: AdminToken::from_config(admin_token),
            ..ServerConfig::default()
        };
        start(config).await.unwrap()
    }

    fn admin(handle: &ServerHandle, token: Option<&str>) -> ScoreboardClient {
        let config = ClientConfig::new(format!("http://127.0.0.1:{}", handle.port))
            .with_role(Role::Admin)
            .with_admin_token(AdminToken::from_config(token));
        ScoreboardClient::new(config).unwrap()
    }

    #[test]
    fn config_from_settings() {
        let settings = ClientSettings {
            server_url: "http://scores:8080/".into(),
            role: Role::Admin,
            admin_token: Some("s3cret".into()),
            reconnect_delay_secs: 7,
        };
        let config = ClientConfig::from(&settings);
        assert_eq!(config.role, Role::Admin);
        assert_eq!(config.admin_token.unwrap().expose(), "s3cret");
        assert_eq!(config.reconnect_delay, Duration::from_secs(7));

        let client = ScoreboardClient::new(ClientConfig::from(&settings)).unwrap();
        assert_eq!(client.base_url(), "http://scores:8080");
    }

    #[tokio::test]
    async fn viewer_cannot_mutate() {
        let client = ScoreboardClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let err = client.create(&NewMatch::new("A", "B")).await.unwrap_err();
        assert!(matches!(err, ClientError::AdminRoleRequired));
        let err = client.delete(MatchId::FIRST).await.unwrap_err();
        assert!(matches!(err, ClientError::AdminRoleRequired));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let client = ScoreboardClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        assert!(matches!(client.list().await, Err(ClientError::Network(_))));
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let handle = spawn_server(None).await;
        let client = admin(&handle, None);

        assert!(client.list().await.unwrap().is_empty());

        let created = client.create(&NewMatch::new("Arsenal", "Chelsea")).await.unwrap();
        assert_eq!(created.id, MatchId::FIRST);
        assert_eq!(created.score.to_string(), "0 : 0");

        let updated = client
            .update(created.id, &MatchPatch::default().with_score("3:1"))
            .await
            .unwrap();
        assert_eq!(updated.score.to_string(), "3 : 1");
        assert_eq!(client.list().await.unwrap(), vec![updated]);

        client.delete(created.id).await.unwrap();
        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_errors_carry_message() {
        let handle = spawn_server(None).await;
        let client = admin(&handle, None);

        let err = client.delete(MatchId::new(42)).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Match not found");

        let _ = client.create(&NewMatch::new("A", "B")).await.unwrap();
        let err = client
            .update(MatchId::FIRST, &MatchPatch::default().with_score("1-0"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Score must be: number : number (e.g. 3 : 2)");

        let err = client.create(&NewMatch::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "team1 and team2 are required");
    }

    #[tokio::test]
    async fn admin_token_is_sent() {
        let handle = spawn_server(Some("s3cret")).await;

        let err = admin(&handle, Some("wrong"))
            .create(&NewMatch::new("A", "B"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Unauthorized");

        let created = admin(&handle, Some("s3cret"))
            .create(&NewMatch::new("A", "B"))
            .await
            .unwrap();
        assert_eq!(created.team1, "A");
    }

    #[tokio::test]
    async fn subscribe_receives_initial_and_updates() {
        let handle = spawn_server(None).await;
        let client = admin(&handle, None);
        let _ = client.create(&NewMatch::new("Arsenal", "Chelsea")).await.unwrap();

        let mut stream = client.subscribe().await.unwrap();
        match stream.next().await {
            Some(SnapshotEvent::Snapshot(list)) => assert_eq!(list.len(), 1),
            other => panic!("expected initial snapshot, got: {other:?}"),
        }

        let _ = client
            .update(MatchId::FIRST, &MatchPatch::default().with_score("1:0"))
            .await
            .unwrap();
        match stream.next().await {
            Some(SnapshotEvent::Snapshot(list)) => {
                assert_eq!(list, client.list().await.unwrap());
                assert_eq!(list[0].score.to_string(), "1 : 0");
            }
            other => panic!("expected update snapshot, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fallback_message_uses_operation_and_status() {
        let handle = spawn_server(None).await;
        // Unknown routes answer 404 with an empty body.
        let resp = reqwest::get(format!("http://127.0.0.1:{}/nope", handle.port))
            .await
            .unwrap();
        let err = check(resp, "Delete").await.unwrap_err();
        assert_eq!(err.to_string(), "Delete failed (404)");
    }
}
