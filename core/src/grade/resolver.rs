use std::sync::Arc;

use tracing::{debug, info};

use crate::config::GradeConfig;
use crate::errors::GradeError;
use crate::lti::{LaunchToken, LineItemOrigin, LineItemQuery, NewLineItem, ResolvedLineItem};
use crate::provider::GradeService;

/// Which launch field yields the resource link id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLinkSource {
    /// `resource.id`, then `resource.resourceLink.id`.
    PreferResourceId,
    /// `resource.id` only.
    ResourceIdOnly,
}

/// How a route locates its line item.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemPolicy {
    pub tag: String,
    pub label: String,
    /// Narrow the lookup by `tag` as well as by resource link.
    pub filter_by_tag: bool,
    pub resource_link: ResourceLinkSource,
    /// Use `endpoint.lineitem` from the launch when present.
    pub use_launch_lineitem: bool,
}

impl LineItemPolicy {
    /// `POST /api/grade`.
    pub fn current(cfg: &GradeConfig) -> Self {
        Self {
            tag: cfg.tag.clone(),
            label: cfg.label.clone(),
            filter_by_tag: true,
            resource_link: ResourceLinkSource::PreferResourceId,
            use_launch_lineitem: cfg.use_launch_lineitem,
        }
    }

    /// `POST /grade`.
    pub fn legacy(cfg: &GradeConfig) -> Self {
        Self {
            tag: cfg.legacy_tag.clone(),
            label: cfg.label.clone(),
            filter_by_tag: false,
            resource_link: ResourceLinkSource::ResourceIdOnly,
            use_launch_lineitem: cfg.use_launch_lineitem,
        }
    }

    pub fn resource_link_id<'a>(&self, token: &'a LaunchToken) -> Option<&'a str> {
        match self.resource_link {
            ResourceLinkSource::PreferResourceId => token.resource_link_id(),
            ResourceLinkSource::ResourceIdOnly => token.resource_id(),
        }
    }
}

/// Locate-or-create for the single line item behind a launch.
///
/// Query-then-create is not atomic: two resolvers racing on the same
/// `(resourceLinkId, tag)` can both create. Reuse is always preferred once an
/// item is visible.
#[derive(Clone)]
pub struct LineItemResolver {
    grades: Arc<dyn GradeService>,
}

impl LineItemResolver {
    pub fn new(grades: Arc<dyn GradeService>) -> Self {
        Self { grades }
    }

    pub async fn resolve(
        &self,
        token: &LaunchToken,
        policy: &LineItemPolicy,
        score_maximum: f64,
    ) -> Result<ResolvedLineItem, GradeError> {
        if policy.use_launch_lineitem {
            if let Some(url) = token.launch_line_item() {
                debug!(line_item = url, "using line item supplied at launch");
                return Ok(ResolvedLineItem::from_launch(url));
            }
        }

        let resource_link_id = policy
            .resource_link_id(token)
            .ok_or(GradeError::MissingResourceLink)?;

        let query = LineItemQuery {
            resource_link_id: Some(resource_link_id.to_string()),
            tag: policy.filter_by_tag.then(|| policy.tag.clone()),
        };
        let items = self
            .grades
            .get_line_items(token, &query)
            .await
            .map_err(GradeError::LineItemResolution)?;

        // Providers that ignore the filter still get a deterministic pick.
        let pick = items.iter().position(|i| query.matches(i)).unwrap_or(0);
        if let Some(item) = items.into_iter().nth(pick) {
            debug!(
                line_item = %item.id,
                resource_link_id,
                "reusing existing line item"
            );
            return Ok(ResolvedLineItem::from_item(item, LineItemOrigin::Existing));
        }

        let spec = NewLineItem {
            label: policy.label.clone(),
            score_maximum,
            resource_link_id: resource_link_id.to_string(),
            tag: policy.tag.clone(),
        };
        let created = self
            .grades
            .create_line_item(token, &spec)
            .await
            .map_err(GradeError::LineItemResolution)?;

        info!(
            line_item = %created.id,
            resource_link_id,
            tag = %spec.tag,
            score_maximum,
            "created line item"
        );
        Ok(ResolvedLineItem::from_item(created, LineItemOrigin::Created))
    }
}
