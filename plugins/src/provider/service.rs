//! HTTP client for a remote LTI Advantage provider.
//!
//! The provider owns the LTI handshake, the platform trust store and the AGS
//! access tokens; this client only forwards the launch key and the payloads.
use std::time::Duration;

use async_trait::async_trait;
use lti_grade_core::api::{
    GradeService, LaunchToken, LaunchVerifier, LineItem, LineItemQuery, NewLineItem,
    PlatformRegistration, PlatformStore, ProviderError, Score, SubmissionReceipt,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Header carrying the launch key on grade-service calls.
pub const LAUNCH_HEADER: &str = "x-ltik";

const SNIPPET_MAX: usize = 200;

pub struct ProviderClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LineItemsBody {
    Wrapped {
        #[serde(rename = "lineItems")]
        line_items: Vec<LineItem>,
    },
    Bare(Vec<LineItem>),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreSubmission<'a> {
    line_item_id: &'a str,
    score: &'a Score,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    ltik: &'a str,
}

impl ProviderClient {
    pub fn new(base_url: String, api_key: String, timeout_ms: u64) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ProviderError::Transport(e.into()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn request(&self, method: Method, path: &str, token: Option<&LaunchToken>) -> RequestBuilder {
        let mut rb = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json");
        if !self.api_key.is_empty() {
            rb = rb.bearer_auth(&self.api_key);
        }
        if let Some(ltik) = token.and_then(|t| t.ltik.as_deref()) {
            rb = rb.header(LAUNCH_HEADER, ltik);
        }
        rb
    }

    async fn send<T: DeserializeOwned>(&self, rb: RequestBuilder) -> Result<T, ProviderError> {
        self.send_optional(rb, &[])
            .await?
            .ok_or_else(|| ProviderError::Decode(anyhow::anyhow!("empty response")))
    }

    /// Statuses in `absent` mean "no such resource" and map to `Ok(None)`.
    async fn send_optional<T: DeserializeOwned>(
        &self,
        rb: RequestBuilder,
        absent: &[StatusCode],
    ) -> Result<Option<T>, ProviderError> {
        let resp = rb.send().await.map_err(map_send_error)?;
        let status = resp.status();
        if absent.contains(&status) {
            return Ok(None);
        }
        let body = resp.text().await.map_err(map_send_error)?;
        if !status.is_success() {
            return Err(map_status(status, &body));
        }
        serde_json::from_str::<T>(&body)
            .map(Some)
            .map_err(|e| ProviderError::Decode(e.into()))
    }
}

fn map_send_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else if e.is_connect() {
        ProviderError::Unavailable
    } else {
        ProviderError::Transport(e.into())
    }
}

fn map_status(status: StatusCode, body: &str) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED => ProviderError::Unauthorized,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ProviderError::BadRequest {
            message: body_snippet(body),
        },
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => ProviderError::Unavailable,
        StatusCode::GATEWAY_TIMEOUT => ProviderError::Timeout,
        _ => ProviderError::HttpStatus {
            status: status.as_u16(),
            body_snippet: body_snippet(body),
        },
    }
}

fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= SNIPPET_MAX {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(SNIPPET_MAX).collect();
    out.push('…');
    out
}

#[async_trait]
impl LaunchVerifier for ProviderClient {
    fn name(&self) -> &str {
        "lti_provider"
    }

    async fn verify(&self, ltik: &str) -> Result<Option<LaunchToken>, ProviderError> {
        let rb = self
            .request(Method::POST, "/launch/verify", None)
            .json(&VerifyRequest { ltik });
        let token: Option<LaunchToken> = self
            .send_optional(rb, &[StatusCode::UNAUTHORIZED, StatusCode::NOT_FOUND])
            .await?;
        Ok(token.map(|mut t| {
            t.ltik = Some(ltik.to_string());
            t
        }))
    }
}

#[async_trait]
impl GradeService for ProviderClient {
    fn name(&self) -> &str {
        "lti_provider"
    }

    async fn get_line_items(
        &self,
        token: &LaunchToken,
        query: &LineItemQuery,
    ) -> Result<Vec<LineItem>, ProviderError> {
        let rb = self
            .request(Method::GET, "/grade/lineitems", Some(token))
            .query(query);
        let body: LineItemsBody = self.send(rb).await?;
        Ok(match body {
            LineItemsBody::Wrapped { line_items } => line_items,
            LineItemsBody::Bare(items) => items,
        })
    }

    async fn create_line_item(
        &self,
        token: &LaunchToken,
        spec: &NewLineItem,
    ) -> Result<LineItem, ProviderError> {
        let rb = self
            .request(Method::POST, "/grade/lineitems", Some(token))
            .json(spec);
        self.send(rb).await
    }

    async fn submit_score(
        &self,
        token: &LaunchToken,
        line_item_id: &str,
        score: &Score,
    ) -> Result<SubmissionReceipt, ProviderError> {
        let rb = self
            .request(Method::POST, "/grade/scores", Some(token))
            .json(&ScoreSubmission {
                line_item_id,
                score,
            });
        let body: Option<serde_json::Value> = self.send_optional(rb, &[StatusCode::NO_CONTENT]).await?;
        Ok(SubmissionReceipt {
            body: body.unwrap_or(serde_json::Value::Null),
        })
    }
}

#[async_trait]
impl PlatformStore for ProviderClient {
    fn name(&self) -> &str {
        "lti_provider"
    }

    async fn get_platform(&self, url: &str) -> Result<Option<PlatformRegistration>, ProviderError> {
        let rb = self
            .request(Method::GET, "/platforms", None)
            .query(&[("url", url)]);
        self.send_optional(rb, &[StatusCode::NOT_FOUND]).await
    }

    async fn register_platform(
        &self,
        spec: &PlatformRegistration,
    ) -> Result<PlatformRegistration, ProviderError> {
        let rb = self.request(Method::POST, "/platforms", None).json(spec);
        self.send(rb).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lti_grade_core::api::PlatformSpec;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    fn client(server: &mockito::ServerGuard) -> ProviderClient {
        ProviderClient::new(server.url(), "tool-key".into(), 2_000).unwrap()
    }

    fn token() -> LaunchToken {
        LaunchToken {
            user: "u-1".into(),
            ltik: Some("ltik-abc".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn get_line_items_sends_filter_and_launch_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/grade/lineitems")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("resourceLinkId".into(), "rl-1".into()),
                Matcher::UrlEncoded("tag".into(), "visual-search".into()),
            ]))
            .match_header("authorization", "Bearer tool-key")
            .match_header(LAUNCH_HEADER, "ltik-abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"lineItems":[{"id":"https://lms.test/li/1","label":"Visual Search Game Score","scoreMaximum":10000,"resourceLinkId":"rl-1","tag":"visual-search"}]}"#,
            )
            .create_async()
            .await;

        let items = client(&server)
            .get_line_items(
                &token(),
                &LineItemQuery {
                    resource_link_id: Some("rl-1".into()),
                    tag: Some("visual-search".into()),
                },
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "https://lms.test/li/1");
        assert_eq!(items[0].score_maximum, 10_000.0);
    }

    #[tokio::test]
    async fn get_line_items_accepts_a_bare_array() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/grade/lineitems")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[]"#)
            .create_async()
            .await;

        let items = client(&server)
            .get_line_items(&token(), &LineItemQuery::default())
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn submit_score_posts_line_item_and_score() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/grade/scores")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "lineItemId": "li-1",
                "score": {
                    "userId": "u-1",
                    "scoreGiven": 9000.0,
                    "scoreMaximum": 10000.0,
                    "activityProgress": "Completed",
                    "gradingProgress": "FullyGraded"
                }
            })))
            .with_status(200)
            .with_body(r#"{"resultUrl":"https://lms.test/results/9"}"#)
            .create_async()
            .await;

        let score = Score::completed("u-1", 9000.0, 10_000.0).unwrap();
        let receipt = client(&server)
            .submit_score(&token(), "li-1", &score)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(receipt.body["resultUrl"], "https://lms.test/results/9");
    }

    #[tokio::test]
    async fn submit_score_maps_upstream_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/grade/scores")
            .with_status(422)
            .with_body("scoreGiven exceeds maximum")
            .create_async()
            .await;

        let score = Score::completed("u-1", 1.0, 10.0).unwrap();
        let err = client(&server)
            .submit_score(&token(), "li-1", &score)
            .await
            .unwrap_err();

        match err {
            ProviderError::BadRequest { message } => assert_eq!(message, "scoreGiven exceeds maximum"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn verify_maps_unauthorized_to_no_launch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/launch/verify")
            .match_body(Matcher::Json(serde_json::json!({ "ltik": "stale" })))
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("POST", "/launch/verify")
            .match_body(Matcher::Json(serde_json::json!({ "ltik": "fresh" })))
            .with_status(200)
            .with_body(r#"{"user":"u-9","platformContext":{"resource":{"id":"rl-9"}}}"#)
            .create_async()
            .await;

        let c = client(&server);
        assert!(c.verify("stale").await.unwrap().is_none());
        let token = c.verify("fresh").await.unwrap().unwrap();
        assert_eq!(token.user, "u-9");
        assert_eq!(token.resource_link_id(), Some("rl-9"));
        assert_eq!(token.ltik.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn platform_lookup_and_registration() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/platforms")
            .match_query(Matcher::UrlEncoded("url".into(), "https://moodle.test".into()))
            .with_status(404)
            .create_async()
            .await;
        let register = server
            .mock("POST", "/platforms")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "url": "https://moodle.test",
                "clientId": "cid",
                "authConfig": { "method": "JWK_SET", "key": "https://moodle.test/jwks" }
            })))
            .with_status(201)
            .with_body(
                r#"{"url":"https://moodle.test","name":"Moodle","clientId":"cid","authenticationEndpoint":"","accesstokenEndpoint":"","authConfig":{"method":"JWK_SET","key":"https://moodle.test/jwks"}}"#,
            )
            .create_async()
            .await;

        let c = client(&server);
        assert!(c.get_platform("https://moodle.test").await.unwrap().is_none());

        let spec = PlatformSpec {
            name: "Moodle".into(),
            url: "https://moodle.test".into(),
            client_id: "cid".into(),
            jwks_key: "https://moodle.test/jwks".into(),
            ..Default::default()
        };
        let stored = c.register_platform(&spec.to_registration()).await.unwrap();
        register.assert_async().await;
        assert_eq!(stored.client_id, "cid");
    }

    #[tokio::test]
    async fn connection_refused_is_unavailable() {
        let c = ProviderClient::new("http://127.0.0.1:9".into(), String::new(), 500).unwrap();
        let err = c.get_platform("https://x.test").await.unwrap_err();
        assert!(
            matches!(err, ProviderError::Unavailable | ProviderError::Timeout),
            "{err:?}"
        );
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let snippet = body_snippet(&body);
        assert_eq!(snippet.chars().count(), SNIPPET_MAX + 1);
        assert!(snippet.ends_with('…'));
    }
}
