//! Recording grade service used by the component tests.
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::lti::{
    LaunchToken, LineItem, LineItemQuery, NewLineItem, PlatformContext, ResourceClaim, Score,
    SubmissionReceipt,
};
use crate::provider::GradeService;

#[derive(Debug, Clone, PartialEq)]
pub enum GradeCall {
    Query(LineItemQuery),
    Create(NewLineItem),
    Submit { line_item_id: String, score: Score },
}

#[derive(Default)]
pub struct RecordingGrades {
    pub items: Mutex<Vec<LineItem>>,
    pub log: Mutex<Vec<GradeCall>>,
    pub fail_query: bool,
    pub fail_submit: bool,
}

impl RecordingGrades {
    pub fn with_items(items: Vec<LineItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<GradeCall> {
        self.log.lock().unwrap().clone()
    }

    pub fn items(&self) -> Vec<LineItem> {
        self.items.lock().unwrap().clone()
    }

    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, GradeCall::Create(_)))
            .count()
    }

    pub fn submitted(&self) -> Vec<(String, Score)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GradeCall::Submit { line_item_id, score } => Some((line_item_id, score)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl GradeService for RecordingGrades {
    fn name(&self) -> &str {
        "recording"
    }

    async fn get_line_items(
        &self,
        _token: &LaunchToken,
        query: &LineItemQuery,
    ) -> Result<Vec<LineItem>, ProviderError> {
        self.log.lock().unwrap().push(GradeCall::Query(query.clone()));
        if self.fail_query {
            return Err(ProviderError::Unavailable);
        }
        let items = self.items.lock().unwrap();
        Ok(items.iter().filter(|i| query.matches(i)).cloned().collect())
    }

    async fn create_line_item(
        &self,
        _token: &LaunchToken,
        spec: &NewLineItem,
    ) -> Result<LineItem, ProviderError> {
        self.log.lock().unwrap().push(GradeCall::Create(spec.clone()));
        let mut items = self.items.lock().unwrap();
        let item = LineItem {
            id: format!("li-created-{}", items.len() + 1),
            label: spec.label.clone(),
            score_maximum: spec.score_maximum,
            resource_link_id: Some(spec.resource_link_id.clone()),
            tag: Some(spec.tag.clone()),
        };
        items.push(item.clone());
        Ok(item)
    }

    async fn submit_score(
        &self,
        _token: &LaunchToken,
        line_item_id: &str,
        score: &Score,
    ) -> Result<SubmissionReceipt, ProviderError> {
        self.log.lock().unwrap().push(GradeCall::Submit {
            line_item_id: line_item_id.to_string(),
            score: score.clone(),
        });
        if self.fail_submit {
            return Err(ProviderError::HttpStatus {
                status: 403,
                body_snippet: "scope not granted".into(),
            });
        }
        Ok(SubmissionReceipt {
            body: serde_json::json!({ "lineItem": line_item_id, "userId": score.user_id }),
        })
    }
}

pub fn launch(user: &str, resource_id: Option<&str>) -> LaunchToken {
    LaunchToken {
        user: user.to_string(),
        platform_context: PlatformContext {
            resource: resource_id.map(|id| ResourceClaim {
                id: Some(id.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        },
        ltik: Some("ltik-test".into()),
    }
}

pub fn line_item(id: &str, resource_link_id: &str, tag: &str) -> LineItem {
    LineItem {
        id: id.to_string(),
        label: "Visual Search Game Score".into(),
        score_maximum: 10_000.0,
        resource_link_id: Some(resource_link_id.to_string()),
        tag: Some(tag.to_string()),
    }
}
