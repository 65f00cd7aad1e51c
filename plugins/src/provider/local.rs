//! In-process provider for development and tests. Nothing survives a restart.
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use lti_grade_core::api::{
    GradeService, LaunchToken, LaunchVerifier, LineItem, LineItemQuery, LocalProviderConfig,
    NewLineItem, PlatformRegistration, PlatformStore, ProviderError, Score, SubmissionReceipt,
};
use lti_grade_core::lti::{EndpointClaim, PlatformContext, ResourceClaim};
use uuid::Uuid;

#[derive(Default)]
pub struct LocalProvider {
    launches: RwLock<HashMap<String, LaunchToken>>,
    line_items: RwLock<Vec<LineItem>>,
    scores: RwLock<Vec<(String, Score)>>,
    platforms: RwLock<HashMap<String, PlatformRegistration>>,
}

fn poisoned<T>(_: T) -> ProviderError {
    ProviderError::Transport(anyhow::anyhow!("local provider lock poisoned"))
}

impl LocalProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: &LocalProviderConfig) -> Self {
        let provider = Self::new();
        for launch in &cfg.launches {
            let token = LaunchToken {
                user: launch.user.clone(),
                platform_context: PlatformContext {
                    resource: launch.resource_link_id.as_ref().map(|id| ResourceClaim {
                        id: Some(id.clone()),
                        ..Default::default()
                    }),
                    endpoint: launch.line_item.as_ref().map(|li| EndpointClaim {
                        lineitem: Some(li.clone()),
                        ..Default::default()
                    }),
                    context: None,
                },
                ltik: None,
            };
            provider.insert_launch(&launch.ltik, token);
        }
        provider
    }

    pub fn insert_launch(&self, ltik: &str, token: LaunchToken) {
        if let Ok(mut launches) = self.launches.write() {
            launches.insert(ltik.to_string(), token);
        }
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        self.line_items.read().map(|v| v.clone()).unwrap_or_default()
    }

    /// Submitted scores with the line item they were posted to.
    pub fn scores(&self) -> Vec<(String, Score)> {
        self.scores.read().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn platforms(&self) -> Vec<PlatformRegistration> {
        self.platforms
            .read()
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LaunchVerifier for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn verify(&self, ltik: &str) -> Result<Option<LaunchToken>, ProviderError> {
        let launches = self.launches.read().map_err(poisoned)?;
        Ok(launches.get(ltik).cloned().map(|mut t| {
            t.ltik = Some(ltik.to_string());
            t
        }))
    }
}

#[async_trait]
impl GradeService for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn get_line_items(
        &self,
        _token: &LaunchToken,
        query: &LineItemQuery,
    ) -> Result<Vec<LineItem>, ProviderError> {
        let items = self.line_items.read().map_err(poisoned)?;
        Ok(items.iter().filter(|i| query.matches(i)).cloned().collect())
    }

    async fn create_line_item(
        &self,
        _token: &LaunchToken,
        spec: &NewLineItem,
    ) -> Result<LineItem, ProviderError> {
        let item = LineItem {
            id: format!("local://lineitems/{}", Uuid::new_v4()),
            label: spec.label.clone(),
            score_maximum: spec.score_maximum,
            resource_link_id: Some(spec.resource_link_id.clone()),
            tag: Some(spec.tag.clone()),
        };
        self.line_items.write().map_err(poisoned)?.push(item.clone());
        Ok(item)
    }

    async fn submit_score(
        &self,
        _token: &LaunchToken,
        line_item_id: &str,
        score: &Score,
    ) -> Result<SubmissionReceipt, ProviderError> {
        self.scores
            .write()
            .map_err(poisoned)?
            .push((line_item_id.to_string(), score.clone()));
        Ok(SubmissionReceipt {
            body: serde_json::json!({
                "lineItem": line_item_id,
                "userId": score.user_id,
                "scoreGiven": score.score_given,
                "scoreMaximum": score.score_maximum,
            }),
        })
    }
}

#[async_trait]
impl PlatformStore for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn get_platform(&self, url: &str) -> Result<Option<PlatformRegistration>, ProviderError> {
        Ok(self.platforms.read().map_err(poisoned)?.get(url).cloned())
    }

    async fn register_platform(
        &self,
        spec: &PlatformRegistration,
    ) -> Result<PlatformRegistration, ProviderError> {
        let mut platforms = self.platforms.write().map_err(poisoned)?;
        Ok(platforms
            .entry(spec.url.clone())
            .or_insert_with(|| spec.clone())
            .clone())
    }
}
