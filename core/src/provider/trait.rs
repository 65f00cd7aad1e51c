// core/src/provider/trait.rs
use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::lti::{
    LaunchToken, LineItem, LineItemQuery, NewLineItem, PlatformRegistration, Score,
    SubmissionReceipt,
};

/// Resolves a launch key into the token produced by the LTI handshake.
#[async_trait]
pub trait LaunchVerifier: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` when the key does not belong to a valid launch.
    async fn verify(&self, ltik: &str) -> Result<Option<LaunchToken>, ProviderError>;
}

/// Assignment and Grade Services operations, scoped to one launch.
#[async_trait]
pub trait GradeService: Send + Sync {
    fn name(&self) -> &str;

    async fn get_line_items(
        &self,
        token: &LaunchToken,
        query: &LineItemQuery,
    ) -> Result<Vec<LineItem>, ProviderError>;

    async fn create_line_item(
        &self,
        token: &LaunchToken,
        spec: &NewLineItem,
    ) -> Result<LineItem, ProviderError>;

    async fn submit_score(
        &self,
        token: &LaunchToken,
        line_item_id: &str,
        score: &Score,
    ) -> Result<SubmissionReceipt, ProviderError>;
}

/// Trust store of registered platforms, keyed by platform URL.
#[async_trait]
pub trait PlatformStore: Send + Sync {
    fn name(&self) -> &str;

    async fn get_platform(&self, url: &str) -> Result<Option<PlatformRegistration>, ProviderError>;

    async fn register_platform(
        &self,
        spec: &PlatformRegistration,
    ) -> Result<PlatformRegistration, ProviderError>;
}
